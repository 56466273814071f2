use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::codec::{normalize_groups_for_edit, render_groups, split_paragraphs};
use super::record::{FieldOpsGroup, ListingFlags, ListingId};
use super::schema::{BulletSection, ListingSchema, ScalarField};

/// Flat, text-only editing state for one listing.
///
/// The authored strings are the single source of truth while editing; list
/// and group helpers split, mutate and rejoin them rather than keeping a
/// parallel structured copy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListingForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ListingId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub scalars: BTreeMap<ScalarField, String>,
    /// Paragraphs separated by blank lines.
    #[serde(default)]
    pub description: String,
    /// One item per line, per section.
    #[serde(default)]
    pub bullets: BTreeMap<BulletSection, String>,
    /// Hand-authored JSON array of `{ heading, items }`.
    #[serde(default)]
    pub field_ops_groups: String,
    /// Comma separated.
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub flags: ListingFlags,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub application_url: String,
}

impl ListingForm {
    /// Blank form with an entry for every field `schema` declares.
    pub fn empty(schema: &ListingSchema) -> Self {
        Self {
            scalars: schema
                .scalar_fields
                .iter()
                .map(|spec| (spec.field, String::new()))
                .collect(),
            bullets: schema
                .bullet_sections
                .iter()
                .map(|section| (*section, String::new()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn scalar(&self, field: ScalarField) -> &str {
        self.scalars.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set_scalar(&mut self, field: ScalarField, value: impl Into<String>) {
        self.scalars.insert(field, value.into());
    }

    pub fn bullet_text(&self, section: BulletSection) -> &str {
        self.bullets.get(&section).map(String::as_str).unwrap_or("")
    }

    pub fn set_bullet_text(&mut self, section: BulletSection, text: impl Into<String>) {
        self.bullets.insert(section, text.into());
    }

    /// Lines as currently authored, including empty ones being typed into.
    pub fn list_items(&self, section: BulletSection) -> Vec<&str> {
        self.bullet_text(section).split('\n').collect()
    }

    pub fn append_list_item(&mut self, section: BulletSection) {
        let mut text = self.bullet_text(section).to_string();
        text.push('\n');
        self.bullets.insert(section, text);
    }

    pub fn remove_list_item(&mut self, section: BulletSection, index: usize) -> Result<(), FormError> {
        self.rewrite_lines(section, |items| {
            check_index(index, items.len(), FormError::ItemOutOfRange)?;
            items.remove(index);
            Ok(())
        })
    }

    pub fn update_list_item(
        &mut self,
        section: BulletSection,
        index: usize,
        value: &str,
    ) -> Result<(), FormError> {
        // A newline would silently split one item into two.
        let value = value.replace(['\r', '\n'], " ");
        self.rewrite_lines(section, |items| {
            check_index(index, items.len(), FormError::ItemOutOfRange)?;
            items[index] = value;
            Ok(())
        })
    }

    fn rewrite_lines<F>(&mut self, section: BulletSection, edit: F) -> Result<(), FormError>
    where
        F: FnOnce(&mut Vec<String>) -> Result<(), FormError>,
    {
        let mut items: Vec<String> = self
            .bullet_text(section)
            .split('\n')
            .map(str::to_string)
            .collect();
        edit(&mut items)?;
        self.bullets.insert(section, items.join("\n"));
        Ok(())
    }

    /// Strict parse of the authored groups for editing.
    ///
    /// Unlike submit-time encoding, malformed text is reported so that edits
    /// never overwrite what the author is still fixing.
    pub fn groups(&self) -> Result<Vec<FieldOpsGroup>, FormError> {
        if self.field_ops_groups.trim().is_empty() {
            return Ok(Vec::new());
        }
        let groups: Vec<FieldOpsGroup> = serde_json::from_str(&self.field_ops_groups)
            .map_err(|err| FormError::MalformedGroups(err.to_string()))?;
        Ok(normalize_groups_for_edit(groups))
    }

    pub fn add_group(&mut self) -> Result<(), FormError> {
        self.edit_groups(|groups| {
            groups.push(FieldOpsGroup {
                heading: String::new(),
                items: vec![String::new()],
            });
            Ok(())
        })
    }

    pub fn remove_group(&mut self, group: usize) -> Result<(), FormError> {
        self.edit_groups(|groups| {
            check_index(group, groups.len(), FormError::GroupOutOfRange)?;
            groups.remove(group);
            Ok(())
        })
    }

    pub fn set_group_heading(&mut self, group: usize, heading: &str) -> Result<(), FormError> {
        self.edit_groups(|groups| {
            check_index(group, groups.len(), FormError::GroupOutOfRange)?;
            groups[group].heading = heading.to_string();
            Ok(())
        })
    }

    pub fn add_group_item(&mut self, group: usize) -> Result<(), FormError> {
        self.edit_groups(|groups| {
            check_index(group, groups.len(), FormError::GroupOutOfRange)?;
            groups[group].items.push(String::new());
            Ok(())
        })
    }

    pub fn remove_group_item(&mut self, group: usize, item: usize) -> Result<(), FormError> {
        self.edit_groups(|groups| {
            check_index(group, groups.len(), FormError::GroupOutOfRange)?;
            let items = &mut groups[group].items;
            check_index(item, items.len(), FormError::ItemOutOfRange)?;
            items.remove(item);
            if items.is_empty() {
                items.push(String::new());
            }
            Ok(())
        })
    }

    pub fn update_group_item(
        &mut self,
        group: usize,
        item: usize,
        value: &str,
    ) -> Result<(), FormError> {
        self.edit_groups(|groups| {
            check_index(group, groups.len(), FormError::GroupOutOfRange)?;
            let items = &mut groups[group].items;
            check_index(item, items.len(), FormError::ItemOutOfRange)?;
            items[item] = value.to_string();
            Ok(())
        })
    }

    /// Parses the current text, applies `edit`, and re-serializes. The
    /// authored text is only replaced once rendering succeeds.
    fn edit_groups<F>(&mut self, edit: F) -> Result<(), FormError>
    where
        F: FnOnce(&mut Vec<FieldOpsGroup>) -> Result<(), FormError>,
    {
        let mut groups = self.groups()?;
        edit(&mut groups)?;
        self.field_ops_groups =
            render_groups(&groups).map_err(|err| FormError::Unrenderable(err.to_string()))?;
        Ok(())
    }

    /// Fields that must be filled before the save action is enabled.
    pub fn missing_requirements(&self, schema: &ListingSchema) -> Vec<Requirement> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(Requirement::Title);
        }
        if schema.organization_required && self.organization.trim().is_empty() {
            missing.push(Requirement::Organization);
        }
        for field in schema.required_scalars() {
            if self.scalar(field).trim().is_empty() {
                missing.push(Requirement::Scalar(field));
            }
        }
        if split_paragraphs(&self.description).is_empty() {
            missing.push(Requirement::Description);
        }
        missing
    }

    pub fn is_complete(&self, schema: &ListingSchema) -> bool {
        self.missing_requirements(schema).is_empty()
    }
}

fn check_index(
    index: usize,
    len: usize,
    error: fn(usize, usize) -> FormError,
) -> Result<(), FormError> {
    if index < len {
        Ok(())
    } else {
        Err(error(index, len))
    }
}

/// A field blocking the save action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Title,
    Organization,
    Scalar(ScalarField),
    Description,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Title => f.write_str("title"),
            Requirement::Organization => f.write_str("organization"),
            Requirement::Scalar(field) => f.write_str(field.column()),
            Requirement::Description => f.write_str("description"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("item {0} is out of range for {1} items")]
    ItemOutOfRange(usize, usize),
    #[error("group {0} is out of range for {1} groups")]
    GroupOutOfRange(usize, usize),
    #[error("field ops groups are not valid JSON: {0}")]
    MalformedGroups(String),
    #[error("field ops groups could not be rendered: {0}")]
    Unrenderable(String),
}
