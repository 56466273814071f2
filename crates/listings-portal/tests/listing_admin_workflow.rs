//! End-to-end listing administration through the public manager and router
//! facades, backed by the in-process store.

mod common {
    use std::sync::{Arc, Mutex};

    use listings_portal::config::PortalConfig;
    use listings_portal::portal::listings::{BulletSection, ListingForm, ListingKind, ScalarField};
    use listings_portal::portal::{MemoryStore, Notice, Notifier, PortalService};

    #[derive(Default)]
    pub(super) struct MemoryNotices {
        notices: Mutex<Vec<Notice>>,
    }

    impl MemoryNotices {
        pub(super) fn messages(&self) -> Vec<String> {
            self.notices
                .lock()
                .expect("lock")
                .iter()
                .map(|notice| notice.message.clone())
                .collect()
        }
    }

    impl Notifier for MemoryNotices {
        fn notify(&self, notice: Notice) {
            self.notices.lock().expect("lock").push(notice);
        }
    }

    pub(super) const SEED: &str = r#"{
        "graduate_programs": [
            {
                "id": "grad-1",
                "title": "Engineering Graduate Scheme",
                "company": "Volta River Authority",
                "location": "Akosombo",
                "duration": "24 months",
                "description_paragraphs": ["Rotate through generation and transmission."],
                "created_at": "2025-05-01T08:00:00.000Z"
            }
        ],
        "hospitals": []
    }"#;

    pub(super) fn service() -> (
        Arc<PortalService<MemoryStore, MemoryNotices>>,
        MemoryStore,
        Arc<MemoryNotices>,
    ) {
        let store = MemoryStore::from_seed_json(SEED).expect("seed parses");
        let notices = Arc::new(MemoryNotices::default());
        let service = PortalService::new(
            Arc::new(store.clone()),
            Arc::clone(&notices),
            PortalConfig::default(),
        );
        (Arc::new(service), store, notices)
    }

    pub(super) fn graduate_form() -> ListingForm {
        let mut form = ListingForm::empty(ListingKind::GraduateProgram.schema());
        form.title = "Finance Graduate Trainee".to_string();
        form.organization = "Ecobank Ghana".to_string();
        form.set_scalar(ScalarField::Location, "Accra");
        form.set_scalar(ScalarField::Duration, "18 months");
        form.description = "Learn treasury operations.\n\nRotate across three desks.".to_string();
        form.set_bullet_text(BulletSection::Qualifications, "BSc Finance\n\nCGPA 3.0+\n");
        form.field_ops_groups = r#"[{ "heading": "Rotations", "items": ["Treasury", " ", "Audit"] }]"#
            .to_string();
        form
    }
}

use axum::body::Body;
use axum::http::{Request, StatusCode};
use listings_portal::portal::listings::{
    listing_router, BulletSection, ListingId, ListingKind, ManagerError,
};
use listings_portal::portal::{Collection, SnapshotSource};
use tower::ServiceExt;

use common::*;

#[test]
fn authoring_a_graduate_program_round_trips_through_the_store() {
    let (service, store, notices) = service();
    let mut manager = service.listing_manager(ListingKind::GraduateProgram);
    assert_eq!(manager.load(), SnapshotSource::Store);
    assert_eq!(manager.records().len(), 1);

    let saved = manager.save(&graduate_form()).expect("save succeeds");

    assert_eq!(store.len(Collection::GraduatePrograms), 2);
    assert_eq!(saved.short_summary, "Learn treasury operations.");
    assert_eq!(
        saved.bullets(BulletSection::Qualifications),
        ["BSc Finance", "CGPA 3.0+"]
    );
    assert_eq!(saved.field_ops_groups[0].items, vec!["Treasury", "Audit"]);
    assert_eq!(notices.messages(), vec!["Graduate Program saved".to_string()]);

    let id = saved.id.clone().expect("id assigned");
    let mut form = manager.edit_form(&id).expect("reloaded after save");
    assert_eq!(form.description, "Learn treasury operations.\n\nRotate across three desks.");
    form.description = "Shadow the CFO office.".to_string();
    let updated = manager.save(&form).expect("update succeeds");

    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.short_summary, "Shadow the CFO office.");
    assert_eq!(store.len(Collection::GraduatePrograms), 2);
}

#[test]
fn searching_the_loaded_snapshot_is_case_insensitive() {
    let (service, _, _) = service();
    let mut manager = service.listing_manager(ListingKind::GraduateProgram);
    manager.load();

    manager.set_search("AKOSOMBO");
    assert_eq!(manager.filtered().len(), 1);

    manager.set_search("kumasi");
    assert!(manager.filtered().is_empty());
}

#[test]
fn deleting_an_unknown_listing_surfaces_not_found() {
    let (service, _, notices) = service();
    let mut manager = service.listing_manager(ListingKind::GraduateProgram);

    let error = manager
        .delete(&ListingId("grad-404".to_string()))
        .expect_err("nothing to delete");

    assert!(matches!(
        error,
        ManagerError::Store(listings_portal::portal::StoreError::NotFound)
    ));
    assert_eq!(notices.messages().len(), 1);
}

#[tokio::test]
async fn router_lists_seeded_programs() {
    let (service, _, _) = service();

    let response = listing_router(service)
        .oneshot(
            Request::get("/api/v1/listings/graduate-programs?location=Akosombo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["items"][0]["id"], serde_json::json!("grad-1"));
    assert_eq!(body["items"][0]["organization"], serde_json::json!("Volta River Authority"));
}
