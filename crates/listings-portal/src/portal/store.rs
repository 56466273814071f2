use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One stored row, keyed by flattened snake_case column names.
pub type StoreRow = Map<String, Value>;

/// Named collections reachable through the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Jobs,
    Internships,
    GraduatePrograms,
    NssPrograms,
    YeaPrograms,
    Hospitals,
}

impl Collection {
    pub const fn all() -> [Self; 6] {
        [
            Self::Jobs,
            Self::Internships,
            Self::GraduatePrograms,
            Self::NssPrograms,
            Self::YeaPrograms,
            Self::Hospitals,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Jobs => "jobs",
            Self::Internships => "internships",
            Self::GraduatePrograms => "graduate_programs",
            Self::NssPrograms => "nss_programs",
            Self::YeaPrograms => "yea_programs",
            Self::Hospitals => "hospitals",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .into_iter()
            .find(|collection| collection.name() == normalized)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column ordering requested from `select`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// Where the currently held snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    /// Nothing loaded yet.
    Empty,
    Store,
    /// Built-in sample data after a failed load.
    Fallback,
}

impl SnapshotSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "not loaded",
            Self::Store => "record store",
            Self::Fallback => "sample data",
        }
    }
}

/// Narrow contract over the remote record store.
pub trait RecordStore: Send + Sync {
    fn select(
        &self,
        collection: Collection,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoreRow>, StoreError>;
    fn insert(&self, collection: Collection, row: StoreRow) -> Result<StoreRow, StoreError>;
    fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: StoreRow,
    ) -> Result<StoreRow, StoreError>;
    fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store rejected the request: {0}")]
    Rejected(String),
}

/// Columns owned by the store; clients never write them.
const STORE_MANAGED_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

/// In-process record store used by the host and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rows: Arc<Mutex<HashMap<Collection, Vec<StoreRow>>>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds rows exactly as given; missing ids are assigned. Later generated
    /// ids never reuse a seeded `<collection>-NNNNNN` id.
    pub fn seed(&self, collection: Collection, rows: impl IntoIterator<Item = StoreRow>) {
        let mut guard = self.lock_rows();
        let bucket = guard.entry(collection).or_default();
        for mut row in rows {
            match generated_sequence(collection, &row) {
                Some(sequence) => {
                    self.sequence.fetch_max(sequence, Ordering::Relaxed);
                }
                None if !row.contains_key("id") => {
                    row.insert("id".to_string(), Value::String(self.next_id(collection)));
                }
                None => {}
            }
            bucket.push(row);
        }
    }

    /// Loads a JSON document mapping collection names to arrays of rows.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_seed_json(&raw)
    }

    pub fn from_seed_json(raw: &str) -> Result<Self, SeedError> {
        let document: HashMap<String, Vec<StoreRow>> = serde_json::from_str(raw)?;
        let store = Self::new();
        for (name, rows) in document {
            let collection =
                Collection::from_name(&name).ok_or(SeedError::UnknownCollection(name))?;
            store.seed(collection, rows);
        }
        Ok(store)
    }

    pub fn len(&self, collection: Collection) -> usize {
        let guard = self.lock_rows();
        guard.get(&collection).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    fn lock_rows(&self) -> MutexGuard<'_, HashMap<Collection, Vec<StoreRow>>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(&self, collection: Collection) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{id:06}", collection.name())
    }
}

fn now_timestamp() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn strip_managed_columns(row: &mut StoreRow) {
    for column in STORE_MANAGED_COLUMNS {
        row.remove(column);
    }
}

/// Seeded ids may be strings or numbers; both compare by their text.
fn has_id(row: &StoreRow, id: &str) -> bool {
    match row.get("id") {
        Some(Value::String(value)) => value == id,
        Some(Value::Number(value)) => value.to_string() == id,
        _ => false,
    }
}

fn generated_sequence(collection: Collection, row: &StoreRow) -> Option<u64> {
    row.get("id")?
        .as_str()?
        .strip_prefix(collection.name())?
        .strip_prefix('-')?
        .parse()
        .ok()
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> CmpOrdering {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Null) | None, Some(Value::Null) | None) => CmpOrdering::Equal,
        (Some(Value::Null) | None, Some(_)) => CmpOrdering::Greater,
        (Some(_), Some(Value::Null) | None) => CmpOrdering::Less,
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

impl RecordStore for MemoryStore {
    fn select(
        &self,
        collection: Collection,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoreRow>, StoreError> {
        let guard = self.lock_rows();
        let mut rows = guard.get(&collection).cloned().unwrap_or_default();
        if let Some(order) = order_by {
            // Absent values sort last in either direction.
            rows.sort_by(|a, b| {
                let left = a.get(&order.column);
                let right = b.get(&order.column);
                let missing = |value: Option<&Value>| matches!(value, None | Some(Value::Null));
                match (missing(left), missing(right)) {
                    (false, false) if order.descending => compare_values(right, left),
                    _ => compare_values(left, right),
                }
            });
        }
        Ok(rows)
    }

    fn insert(&self, collection: Collection, mut row: StoreRow) -> Result<StoreRow, StoreError> {
        strip_managed_columns(&mut row);
        let timestamp = now_timestamp();
        row.insert("id".to_string(), Value::String(self.next_id(collection)));
        row.insert("created_at".to_string(), timestamp.clone());
        row.insert("updated_at".to_string(), timestamp);

        let mut guard = self.lock_rows();
        guard.entry(collection).or_default().push(row.clone());
        Ok(row)
    }

    fn update(
        &self,
        collection: Collection,
        id: &str,
        mut patch: StoreRow,
    ) -> Result<StoreRow, StoreError> {
        strip_managed_columns(&mut patch);
        let mut guard = self.lock_rows();
        let row = guard
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|row| has_id(row, id)))
            .ok_or(StoreError::NotFound)?;

        for (column, value) in patch {
            row.insert(column, value);
        }
        row.insert("updated_at".to_string(), now_timestamp());
        Ok(row.clone())
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut guard = self.lock_rows();
        let rows = guard.get_mut(&collection).ok_or(StoreError::NotFound)?;
        let before = rows.len();
        rows.retain(|row| !has_id(row, id));
        if rows.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Failure while seeding the in-process store.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("seed document names unknown collection '{0}'")]
    UnknownCollection(String),
}
