//! Conversion between authored form text, normalized records and store rows.
//!
//! Paragraph fields are separated by blank lines, bullet fields hold one item
//! per line, skills are comma separated and field-ops groups are JSON text.
//! The same rules apply to every listing kind; the kind's schema only decides
//! which fields exist.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::form::ListingForm;
use super::record::{
    FieldOpsGroup, ListingFlags, ListingId, ListingMedia, ListingRecord, RecordTimestamps,
};
use super::schema::{ListingFlag, ListingKind, ListingSchema};
use crate::portal::store::StoreRow;

pub const SHORT_SUMMARY_COLUMN: &str = "short_description";
pub const PARAGRAPHS_COLUMN: &str = "description_paragraphs";
pub const GROUPS_COLUMN: &str = "field_ops_groups";
pub const SKILLS_COLUMN: &str = "skills";
pub const IMAGE_URL_COLUMN: &str = "image_url";
pub const APPLICATION_URL_COLUMN: &str = "application_url";

/// Splits on blank lines; lines inside a paragraph are kept as authored.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs
}

pub fn join_paragraphs(paragraphs: &[String]) -> String {
    paragraphs.join("\n\n")
}

/// One item per line; whitespace-only lines are dropped.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_lines(items: &[String]) -> String {
    items.join("\n")
}

pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Lenient parse used at submit time: blank or malformed text yields no groups.
pub fn parse_groups(text: &str) -> Vec<FieldOpsGroup> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<FieldOpsGroup>>(text) {
        Ok(groups) => groups,
        Err(err) => {
            debug!(error = %err, "field ops groups text is not valid JSON, treating as empty");
            Vec::new()
        }
    }
}

/// Two-space indented JSON, or an empty string when there are no groups.
pub fn render_groups(groups: &[FieldOpsGroup]) -> Result<String, serde_json::Error> {
    if groups.is_empty() {
        return Ok(String::new());
    }
    serde_json::to_string_pretty(groups)
}

/// Every group keeps at least one (possibly empty) item to edit.
pub fn normalize_groups_for_edit(mut groups: Vec<FieldOpsGroup>) -> Vec<FieldOpsGroup> {
    for group in &mut groups {
        if group.items.is_empty() {
            group.items.push(String::new());
        }
    }
    groups
}

/// Drops blank items and trailing groups left with nothing in them.
pub fn normalize_groups_for_persist(groups: Vec<FieldOpsGroup>) -> Vec<FieldOpsGroup> {
    let mut groups: Vec<FieldOpsGroup> = groups
        .into_iter()
        .map(|group| FieldOpsGroup {
            heading: group.heading.trim().to_string(),
            items: group
                .items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        })
        .collect();

    while groups.last().is_some_and(FieldOpsGroup::is_blank) {
        groups.pop();
    }
    groups
}

pub fn short_summary(paragraphs: &[String]) -> String {
    paragraphs.first().cloned().unwrap_or_default()
}

/// Record to editable form text. Absent values become empty strings.
pub fn decode(record: &ListingRecord) -> ListingForm {
    let schema = record.kind.schema();
    let mut form = ListingForm::empty(schema);

    form.id = record.id.clone();
    form.title = record.title.clone();
    form.organization = record.organization.clone();
    for spec in schema.scalar_fields {
        let value = record.scalar(spec.field).unwrap_or_default().to_string();
        form.scalars.insert(spec.field, value);
    }
    form.description = join_paragraphs(&record.description_paragraphs);
    for section in schema.bullet_sections {
        form.bullets
            .insert(*section, join_lines(record.bullets(*section)));
    }
    if schema.grouped_sections {
        let groups = normalize_groups_for_edit(record.field_ops_groups.clone());
        form.field_ops_groups = match render_groups(&groups) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "could not render field ops groups for editing");
                String::new()
            }
        };
    }
    if schema.skills {
        form.skills = join_tags(&record.skills);
    }
    form.flags = schema_flags(schema, record.flags);
    form.image_url = record.media.image_url.clone().unwrap_or_default();
    form.application_url = record.media.application_url.clone().unwrap_or_default();

    form
}

/// Form text to a record of `schema`'s kind; the short summary is recomputed.
pub fn encode(schema: &ListingSchema, form: &ListingForm) -> ListingRecord {
    let mut record = ListingRecord::empty(schema.kind);

    record.id = form.id.clone();
    record.title = form.title.trim().to_string();
    record.organization = form.organization.trim().to_string();
    for spec in schema.scalar_fields {
        let value = form.scalar(spec.field).trim();
        if !value.is_empty() {
            record.scalars.insert(spec.field, value.to_string());
        }
    }
    record.description_paragraphs = split_paragraphs(&form.description);
    record.short_summary = short_summary(&record.description_paragraphs);
    for section in schema.bullet_sections {
        record
            .bullet_sections
            .insert(*section, split_lines(form.bullet_text(*section)));
    }
    if schema.grouped_sections {
        record.field_ops_groups = normalize_groups_for_persist(parse_groups(&form.field_ops_groups));
    }
    if schema.skills {
        record.skills = split_tags(&form.skills);
    }
    record.flags = schema_flags(schema, form.flags);
    record.media = ListingMedia {
        image_url: non_empty(&form.image_url),
        application_url: non_empty(&form.application_url),
    };

    record
}

/// Store columns for insert or update. Store-managed columns are never written.
pub fn record_to_row(record: &ListingRecord) -> StoreRow {
    let schema = record.kind.schema();
    let mut row = StoreRow::new();

    row.insert("title".to_string(), Value::String(record.title.clone()));
    row.insert(
        schema.organization_column.to_string(),
        Value::String(record.organization.clone()),
    );
    for spec in schema.scalar_fields {
        let value = record
            .scalar(spec.field)
            .map(|value| Value::String(value.to_string()))
            .unwrap_or(Value::Null);
        row.insert(spec.field.column().to_string(), value);
    }
    row.insert(
        SHORT_SUMMARY_COLUMN.to_string(),
        Value::String(record.short_summary.clone()),
    );
    row.insert(
        PARAGRAPHS_COLUMN.to_string(),
        string_array(&record.description_paragraphs),
    );
    for section in schema.bullet_sections {
        row.insert(
            section.column().to_string(),
            string_array(record.bullets(*section)),
        );
    }
    if schema.grouped_sections {
        let groups = match serde_json::to_value(&record.field_ops_groups) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "could not serialize field ops groups for the store");
                Value::Array(Vec::new())
            }
        };
        row.insert(GROUPS_COLUMN.to_string(), groups);
    }
    if schema.skills {
        row.insert(SKILLS_COLUMN.to_string(), string_array(&record.skills));
    }
    for flag in schema.flags {
        let value = match flag {
            ListingFlag::Verified => record.flags.verified,
            ListingFlag::Featured => record.flags.featured,
        };
        row.insert(flag.column().to_string(), Value::Bool(value));
    }
    row.insert(
        IMAGE_URL_COLUMN.to_string(),
        optional_string(record.media.image_url.as_deref()),
    );
    row.insert(
        APPLICATION_URL_COLUMN.to_string(),
        optional_string(record.media.application_url.as_deref()),
    );

    row
}

/// Lenient row decoding: absent or mistyped columns decode to empty values.
pub fn record_from_row(kind: ListingKind, row: &StoreRow) -> ListingRecord {
    let schema = kind.schema();
    let mut record = ListingRecord::empty(kind);

    record.id = row.get("id").and_then(id_value).map(ListingId);
    record.title = string_column(row, "title");
    record.organization = string_column(row, schema.organization_column);
    for spec in schema.scalar_fields {
        let value = string_column(row, spec.field.column());
        if !value.trim().is_empty() {
            record.scalars.insert(spec.field, value);
        }
    }

    record.description_paragraphs = list_column(row, PARAGRAPHS_COLUMN, split_paragraphs);
    if record.description_paragraphs.is_empty() {
        // Rows written before paragraphs existed only carry the summary text.
        record.description_paragraphs = split_paragraphs(&string_column(row, SHORT_SUMMARY_COLUMN));
    }
    record.short_summary = short_summary(&record.description_paragraphs);

    for section in schema.bullet_sections {
        record
            .bullet_sections
            .insert(*section, list_column(row, section.column(), split_lines));
    }
    if schema.grouped_sections {
        record.field_ops_groups = groups_column(row);
    }
    if schema.skills {
        record.skills = list_column(row, SKILLS_COLUMN, split_tags);
    }
    let flags = ListingFlags {
        verified: bool_column(row, ListingFlag::Verified.column()),
        featured: bool_column(row, ListingFlag::Featured.column()),
    };
    record.flags = schema_flags(schema, flags);
    record.media = ListingMedia {
        image_url: non_empty(&string_column(row, IMAGE_URL_COLUMN)),
        application_url: non_empty(&string_column(row, APPLICATION_URL_COLUMN)),
    };
    record.timestamps = timestamps(row);

    record
}

fn schema_flags(schema: &ListingSchema, flags: ListingFlags) -> ListingFlags {
    ListingFlags {
        verified: flags.verified && schema.has_flag(ListingFlag::Verified),
        featured: flags.featured && schema.has_flag(ListingFlag::Featured),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

fn optional_string(value: Option<&str>) -> Value {
    value
        .map(|value| Value::String(value.to_string()))
        .unwrap_or(Value::Null)
}

fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn string_column(row: &StoreRow, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Number(value)) => value.to_string(),
        _ => String::new(),
    }
}

fn bool_column(row: &StoreRow, column: &str) -> bool {
    match row.get(column) {
        Some(Value::Bool(value)) => *value,
        Some(Value::String(value)) => value.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Arrays are taken item by item; text columns go through `split`.
fn list_column(row: &StoreRow, column: &str, split: fn(&str) -> Vec<String>) -> Vec<String> {
    match row.get(column) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|item| !item.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(text)) => split(text),
        _ => Vec::new(),
    }
}

fn groups_column(row: &StoreRow) -> Vec<FieldOpsGroup> {
    match row.get(GROUPS_COLUMN) {
        Some(Value::String(text)) => parse_groups(text),
        Some(value @ Value::Array(_)) => {
            serde_json::from_value(value.clone()).unwrap_or_else(|err| {
                debug!(error = %err, "stored field ops groups are malformed, treating as empty");
                Vec::new()
            })
        }
        _ => Vec::new(),
    }
}

fn timestamp_column(row: &StoreRow, column: &str) -> Option<DateTime<Utc>> {
    let raw = row.get(column)?.as_str()?;
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|value| value.with_timezone(&Utc))
}

fn timestamps(row: &StoreRow) -> Option<RecordTimestamps> {
    let created_at = timestamp_column(row, "created_at")?;
    let updated_at = timestamp_column(row, "updated_at").unwrap_or(created_at);
    Some(RecordTimestamps {
        created_at,
        updated_at,
    })
}

