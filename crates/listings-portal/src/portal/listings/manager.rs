use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::codec::{decode, encode, record_from_row, record_to_row};
use super::form::{ListingForm, Requirement};
use super::record::{ListingFacet, ListingId, ListingRecord};
use super::samples::sample_listings;
use super::schema::{ListingKind, ListingSchema};
use crate::portal::notify::{Notice, Notifier};
use crate::portal::query::{apply_filters, clamp_page, paginate, ListingQuery, PageInfo, Selection};
use crate::portal::store::{OrderBy, RecordStore, SnapshotSource, StoreError};

/// Admin back-office state for one listing kind.
///
/// Holds the last loaded snapshot plus the current search, facets and page.
/// Writes go straight to the store and are followed by a full reload; the
/// snapshot is never patched locally.
pub struct ListingManager<S, N> {
    schema: &'static ListingSchema,
    store: Arc<S>,
    notifier: Arc<N>,
    saving: Arc<AtomicBool>,
    records: Vec<ListingRecord>,
    source: SnapshotSource,
    query: ListingQuery<ListingFacet>,
    page: usize,
    page_size: usize,
}

impl<S, N> ListingManager<S, N>
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(kind: ListingKind, store: Arc<S>, notifier: Arc<N>, page_size: usize) -> Self {
        Self {
            schema: kind.schema(),
            store,
            notifier,
            saving: Arc::new(AtomicBool::new(false)),
            records: Vec::new(),
            source: SnapshotSource::Empty,
            query: ListingQuery::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Shares the in-flight flag with other managers of the same kind.
    pub fn with_saving_flag(mut self, saving: Arc<AtomicBool>) -> Self {
        self.saving = saving;
        self
    }

    pub fn kind(&self) -> ListingKind {
        self.schema.kind
    }

    pub fn schema(&self) -> &'static ListingSchema {
        self.schema
    }

    /// Replaces the snapshot from the store, or with built-in samples when the
    /// store is unreachable.
    pub fn load(&mut self) -> SnapshotSource {
        let kind = self.kind();
        let order = OrderBy::descending("created_at");
        match self.store.select(kind.collection(), Some(&order)) {
            Ok(rows) => {
                self.records = rows.iter().map(|row| record_from_row(kind, row)).collect();
                self.source = SnapshotSource::Store;
            }
            Err(err) => {
                warn!(collection = %kind.collection(), error = %err, "listing load failed, using samples");
                self.records = sample_listings(kind);
                self.source = SnapshotSource::Fallback;
                self.notifier.notify(Notice::error(format!(
                    "Could not load {} listings; showing sample data",
                    kind.label()
                )));
            }
        }
        self.source
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    pub fn query(&self) -> &ListingQuery<ListingFacet> {
        &self.query
    }

    /// Leaves the page number as is.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.set_text(text);
    }

    /// Leaves the page number as is.
    pub fn set_facet(&mut self, facet: ListingFacet, selection: Selection) {
        self.query.set_facet(facet, selection);
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
    }

    pub fn filtered(&self) -> Vec<&ListingRecord> {
        apply_filters(&self.records, &self.query)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Moves to `page`, clamped to the pages of the current filtered set.
    pub fn set_page(&mut self, page: usize) -> usize {
        let total = self.filtered().len();
        self.page = clamp_page(page, total, self.page_size);
        self.page
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.page, self.page_size, self.filtered().len())
    }

    /// Current page of the filtered set. A page left past the end by a filter
    /// change yields an empty page until the caller moves.
    pub fn visible(&self) -> Vec<&ListingRecord> {
        let filtered = self.filtered();
        paginate(&filtered, self.page_size, self.page).to_vec()
    }

    pub fn find(&self, id: &ListingId) -> Option<&ListingRecord> {
        self.records
            .iter()
            .find(|record| record.id.as_ref() == Some(id))
    }

    pub fn new_form(&self) -> ListingForm {
        ListingForm::empty(self.schema)
    }

    pub fn edit_form(&self, id: &ListingId) -> Option<ListingForm> {
        self.find(id).map(decode)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Whether the save action is enabled for `form`.
    pub fn can_submit(&self, form: &ListingForm) -> bool {
        !self.is_saving() && form.is_complete(self.schema)
    }

    /// Inserts a new listing or updates an existing one, then reloads.
    pub fn save(&mut self, form: &ListingForm) -> Result<ListingRecord, ManagerError> {
        let missing = form.missing_requirements(self.schema);
        if !missing.is_empty() {
            return Err(ManagerError::Incomplete(missing));
        }

        let kind = self.kind();
        let record = encode(self.schema, form);
        let row = record_to_row(&record);
        let result = {
            let _in_flight = InFlight::acquire(&self.saving).ok_or(ManagerError::Busy)?;
            match &record.id {
                Some(id) => self.store.update(kind.collection(), id.as_str(), row),
                None => self.store.insert(kind.collection(), row),
            }
        };

        match result {
            Ok(stored) => {
                let saved = record_from_row(kind, &stored);
                info!(collection = %kind.collection(), id = ?saved.id, "listing saved");
                self.notifier
                    .notify(Notice::success(format!("{} saved", kind.label())));
                self.load();
                Ok(saved)
            }
            Err(err) => {
                warn!(collection = %kind.collection(), error = %err, "listing save failed");
                self.notifier.notify(Notice::error(format!(
                    "Could not save {}: {err}",
                    kind.label()
                )));
                Err(ManagerError::Store(err))
            }
        }
    }

    pub fn delete(&mut self, id: &ListingId) -> Result<(), ManagerError> {
        let kind = self.kind();
        let result = {
            let _in_flight = InFlight::acquire(&self.saving).ok_or(ManagerError::Busy)?;
            self.store.delete(kind.collection(), id.as_str())
        };

        match result {
            Ok(()) => {
                info!(collection = %kind.collection(), %id, "listing deleted");
                self.notifier
                    .notify(Notice::success(format!("{} deleted", kind.label())));
                self.load();
                Ok(())
            }
            Err(err) => {
                warn!(collection = %kind.collection(), %id, error = %err, "listing delete failed");
                self.notifier.notify(Notice::error(format!(
                    "Could not delete {}: {err}",
                    kind.label()
                )));
                Err(ManagerError::Store(err))
            }
        }
    }
}

/// Holds the saving flag for the duration of one store call.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("missing required fields: {}", join_requirements(.0))]
    Incomplete(Vec<Requirement>),
    #[error("a save is already in progress")]
    Busy,
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn join_requirements(missing: &[Requirement]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
