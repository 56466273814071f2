use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::form::{ListingForm, Requirement};
use super::manager::{ListingManager, ManagerError};
use super::record::{ListingFacet, ListingId, ListingRecord};
use super::schema::ListingKind;
use crate::portal::notify::Notifier;
use crate::portal::query::{PageInfo, Selection};
use crate::portal::service::PortalService;
use crate::portal::store::{RecordStore, SnapshotSource, StoreError};

/// Admin endpoints for browsing, editing and persisting listings.
pub fn listing_router<S, N>(service: Arc<PortalService<S, N>>) -> Router
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/listings/:kind",
            get(list_handler::<S, N>).post(create_handler::<S, N>),
        )
        .route(
            "/api/v1/listings/:kind/:id",
            axum::routing::put(update_handler::<S, N>).delete(delete_handler::<S, N>),
        )
        .route(
            "/api/v1/forms/:kind",
            get(new_form_handler::<S, N>).post(form_status_handler::<S, N>),
        )
        .route("/api/v1/forms/:kind/:id", get(edit_form_handler::<S, N>))
        .with_state(service)
}

/// One page of a manager's filtered snapshot.
#[derive(Debug, Serialize)]
pub struct ListingPageView {
    pub kind: ListingKind,
    pub source: SnapshotSource,
    pub query: String,
    pub page: PageInfo,
    pub items: Vec<ListingRecord>,
}

impl ListingPageView {
    pub fn from_manager<S, N>(manager: &ListingManager<S, N>) -> Self
    where
        S: RecordStore + 'static,
        N: Notifier + 'static,
    {
        Self {
            kind: manager.kind(),
            source: manager.source(),
            query: manager.query().text().to_string(),
            page: manager.page_info(),
            items: manager.visible().into_iter().cloned().collect(),
        }
    }
}

/// Whether the save action is enabled for a form.
#[derive(Debug, Serialize)]
pub struct FormStatusView {
    pub can_submit: bool,
    pub saving: bool,
    pub missing: Vec<Requirement>,
}

/// Applies `q`, facet and `page` parameters. The page is applied last so it
/// is clamped against the filtered set.
pub fn apply_listing_params<S, N>(
    manager: &mut ListingManager<S, N>,
    params: &HashMap<String, String>,
) where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    if let Some(text) = params.get("q") {
        manager.set_search(text.clone());
    }
    for facet in ListingFacet::ordered() {
        if let Some(raw) = params.get(facet.param()) {
            manager.set_facet(facet, Selection::parse(raw));
        }
    }
    if let Some(page) = params.get("page").and_then(|raw| raw.trim().parse::<usize>().ok()) {
        manager.set_page(page);
    }
}

fn unknown_kind(raw: &str) -> Response {
    let payload = json!({ "error": format!("unknown listing kind '{raw}'") });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn manager_error_response(error: ManagerError) -> Response {
    match error {
        ManagerError::Incomplete(missing) => {
            let payload = json!({
                "error": "missing required fields",
                "missing": missing,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        ManagerError::Busy => {
            let payload = json!({ "error": ManagerError::Busy.to_string() });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        ManagerError::Store(StoreError::NotFound) => {
            let payload = json!({ "error": "listing not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        ManagerError::Store(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_handler<S, N>(
    State(service): State<Arc<PortalService<S, N>>>,
    Path(kind): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let Some(listing_kind) = ListingKind::from_slug(&kind) else {
        return unknown_kind(&kind);
    };

    let mut manager = service.listing_manager(listing_kind);
    manager.load();
    apply_listing_params(&mut manager, &params);
    (StatusCode::OK, Json(ListingPageView::from_manager(&manager))).into_response()
}

pub(crate) async fn create_handler<S, N>(
    State(service): State<Arc<PortalService<S, N>>>,
    Path(kind): Path<String>,
    Json(form): Json<ListingForm>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let Some(listing_kind) = ListingKind::from_slug(&kind) else {
        return unknown_kind(&kind);
    };

    let status = if form.id.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let mut manager = service.listing_manager(listing_kind);
    match manager.save(&form) {
        Ok(record) => (status, Json(record)).into_response(),
        Err(error) => manager_error_response(error),
    }
}

pub(crate) async fn update_handler<S, N>(
    State(service): State<Arc<PortalService<S, N>>>,
    Path((kind, id)): Path<(String, String)>,
    Json(mut form): Json<ListingForm>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let Some(listing_kind) = ListingKind::from_slug(&kind) else {
        return unknown_kind(&kind);
    };

    form.id = Some(ListingId(id));
    let mut manager = service.listing_manager(listing_kind);
    match manager.save(&form) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => manager_error_response(error),
    }
}

pub(crate) async fn delete_handler<S, N>(
    State(service): State<Arc<PortalService<S, N>>>,
    Path((kind, id)): Path<(String, String)>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let Some(listing_kind) = ListingKind::from_slug(&kind) else {
        return unknown_kind(&kind);
    };

    let mut manager = service.listing_manager(listing_kind);
    match manager.delete(&ListingId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => manager_error_response(error),
    }
}

pub(crate) async fn new_form_handler<S, N>(
    State(service): State<Arc<PortalService<S, N>>>,
    Path(kind): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let Some(listing_kind) = ListingKind::from_slug(&kind) else {
        return unknown_kind(&kind);
    };

    let manager = service.listing_manager(listing_kind);
    (StatusCode::OK, Json(manager.new_form())).into_response()
}

pub(crate) async fn form_status_handler<S, N>(
    State(service): State<Arc<PortalService<S, N>>>,
    Path(kind): Path<String>,
    Json(form): Json<ListingForm>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let Some(listing_kind) = ListingKind::from_slug(&kind) else {
        return unknown_kind(&kind);
    };

    let manager = service.listing_manager(listing_kind);
    let view = FormStatusView {
        can_submit: manager.can_submit(&form),
        saving: manager.is_saving(),
        missing: form.missing_requirements(manager.schema()),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn edit_form_handler<S, N>(
    State(service): State<Arc<PortalService<S, N>>>,
    Path((kind, id)): Path<(String, String)>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let Some(listing_kind) = ListingKind::from_slug(&kind) else {
        return unknown_kind(&kind);
    };

    let mut manager = service.listing_manager(listing_kind);
    manager.load();
    match manager.edit_form(&ListingId(id.clone())) {
        Some(form) => (StatusCode::OK, Json(form)).into_response(),
        None => {
            let payload = json!({ "error": format!("listing '{id}' not found") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}
