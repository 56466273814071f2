use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{json, Value};

use crate::config::PortalConfig;
use crate::portal::listings::form::ListingForm;
use crate::portal::listings::manager::ListingManager;
use crate::portal::listings::schema::{BulletSection, ListingKind, ScalarField};
use crate::portal::notify::{Notice, NoticeLevel, Notifier};
use crate::portal::service::PortalService;
use crate::portal::store::{
    Collection, MemoryStore, OrderBy, RecordStore, StoreError, StoreRow,
};

#[derive(Default)]
pub(super) struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub(super) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("lock").clone()
    }

    pub(super) fn levels(&self) -> Vec<NoticeLevel> {
        self.notices().into_iter().map(|notice| notice.level).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("lock").push(notice);
    }
}

pub(super) struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn select(
        &self,
        _collection: Collection,
        _order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoreRow>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn insert(&self, _collection: Collection, _row: StoreRow) -> Result<StoreRow, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn update(
        &self,
        _collection: Collection,
        _id: &str,
        _patch: StoreRow,
    ) -> Result<StoreRow, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn delete(&self, _collection: Collection, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Reads succeed from an inner store; every write is rejected.
pub(super) struct ReadOnlyStore(pub(super) MemoryStore);

impl RecordStore for ReadOnlyStore {
    fn select(
        &self,
        collection: Collection,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoreRow>, StoreError> {
        self.0.select(collection, order_by)
    }

    fn insert(&self, _collection: Collection, _row: StoreRow) -> Result<StoreRow, StoreError> {
        Err(StoreError::Rejected("read-only".to_string()))
    }

    fn update(
        &self,
        _collection: Collection,
        _id: &str,
        _patch: StoreRow,
    ) -> Result<StoreRow, StoreError> {
        Err(StoreError::Rejected("read-only".to_string()))
    }

    fn delete(&self, _collection: Collection, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Rejected("read-only".to_string()))
    }
}

pub(super) fn row(value: Value) -> StoreRow {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

pub(super) fn job_row(id: &str, title: &str, location: &str, created_at: &str) -> StoreRow {
    row(json!({
        "id": id,
        "title": title,
        "company": "Acme Health",
        "location": location,
        "contract_type": "Full-time",
        "description_paragraphs": [format!("{title} at Acme Health.")],
        "created_at": created_at,
        "updated_at": created_at,
    }))
}

pub(super) fn seeded_jobs() -> MemoryStore {
    let store = MemoryStore::new();
    store.seed(
        Collection::Jobs,
        vec![
            job_row("job-1", "Nurse", "Accra", "2025-01-01T09:00:00.000Z"),
            job_row("job-2", "Pharmacist", "Kumasi", "2025-02-01T09:00:00.000Z"),
            job_row("job-3", "Accountant", "Accra Central", "2025-03-01T09:00:00.000Z"),
        ],
    );
    store
}

pub(super) fn complete_job_form() -> ListingForm {
    let mut form = ListingForm::empty(ListingKind::Job.schema());
    form.title = "Midwife".to_string();
    form.organization = "Ridge Hospital".to_string();
    form.set_scalar(ScalarField::Location, "Accra");
    form.set_scalar(ScalarField::ContractType, "Full-time");
    form.description = "Support safe deliveries.\n\nWork with a team of twelve.".to_string();
    form.set_bullet_text(BulletSection::Responsibilities, "Monitor labour\nEducate mothers\n");
    form.skills = "Midwifery, Counselling".to_string();
    form
}

pub(super) fn job_manager<S: RecordStore + 'static>(
    store: Arc<S>,
) -> (ListingManager<S, RecordingNotifier>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let manager = ListingManager::new(ListingKind::Job, store, Arc::clone(&notifier), 2);
    (manager, notifier)
}

pub(super) fn portal_service<S: RecordStore + 'static>(
    store: S,
) -> Arc<PortalService<S, RecordingNotifier>> {
    let config = PortalConfig {
        page_size: 2,
        ..PortalConfig::default()
    };
    Arc::new(PortalService::new(
        Arc::new(store),
        Arc::new(RecordingNotifier::default()),
        config,
    ))
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
