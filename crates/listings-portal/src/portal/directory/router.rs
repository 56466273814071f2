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

use super::browser::DirectoryBrowser;
use super::domain::{DirectoryEntry, DirectoryFacet};
use crate::portal::notify::Notifier;
use crate::portal::query::{PageInfo, Selection};
use crate::portal::service::PortalService;
use crate::portal::store::{RecordStore, SnapshotSource};

/// Public, read-only facility directory endpoints.
pub fn directory_router<S, N>(service: Arc<PortalService<S, N>>) -> Router
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/v1/directory", get(directory_handler::<S, N>))
        .route("/api/v1/directory/regions", get(regions_handler::<S, N>))
        .route(
            "/api/v1/directory/regions/:region/districts",
            get(districts_handler::<S, N>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub struct DirectoryPageView {
    pub source: SnapshotSource,
    pub query: String,
    pub filters: HashMap<&'static str, String>,
    pub district_options: Vec<&'static str>,
    pub page: PageInfo,
    pub items: Vec<DirectoryEntry>,
}

impl DirectoryPageView {
    pub fn from_browser<S, N>(browser: &DirectoryBrowser<S, N>) -> Self
    where
        S: RecordStore + 'static,
        N: Notifier + 'static,
    {
        let filters = browser
            .filters()
            .query()
            .active_facets()
            .filter_map(|(facet, selection)| {
                selection.value().map(|value| (facet.param(), value.to_string()))
            })
            .collect();

        Self {
            source: browser.source(),
            query: browser.filters().search_text().to_string(),
            filters,
            district_options: browser.district_options().to_vec(),
            page: browser.page_info(),
            items: browser.visible().into_iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegionView {
    pub region: &'static str,
    pub districts: &'static [&'static str],
}

/// Applies `q`, facet and `page` parameters. Region is visited before
/// district, so a district given alongside a region survives the cascade.
pub fn apply_directory_params<S, N>(
    browser: &mut DirectoryBrowser<S, N>,
    params: &HashMap<String, String>,
) where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    if let Some(text) = params.get("q") {
        browser.set_search(text.clone());
    }
    for facet in DirectoryFacet::ordered() {
        if let Some(raw) = params.get(facet.param()) {
            browser.set_facet(facet, Selection::parse(raw));
        }
    }
    if let Some(page) = params.get("page").and_then(|raw| raw.trim().parse::<usize>().ok()) {
        browser.set_page(page);
    }
}

pub(crate) async fn directory_handler<S, N>(
    State(service): State<Arc<PortalService<S, N>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let mut browser = service.directory();
    browser.load();
    apply_directory_params(&mut browser, &params);
    (StatusCode::OK, Json(DirectoryPageView::from_browser(&browser))).into_response()
}

pub(crate) async fn regions_handler<S, N>(
    State(service): State<Arc<PortalService<S, N>>>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let regions = service.regions();
    let views: Vec<RegionView> = regions
        .regions()
        .map(|region| RegionView {
            region,
            districts: regions.districts_for(region),
        })
        .collect();
    (StatusCode::OK, Json(views)).into_response()
}

pub(crate) async fn districts_handler<S, N>(
    State(service): State<Arc<PortalService<S, N>>>,
    Path(region): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let districts = service.regions().districts_for(&region);
    if districts.is_empty() {
        let payload = json!({ "error": format!("unknown region '{region}'") });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    }
    (StatusCode::OK, Json(districts)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::PortalConfig;
    use crate::portal::notify::Notice;
    use crate::portal::store::{Collection, MemoryStore, OrderBy, StoreError, StoreRow};

    struct Silent;

    impl Notifier for Silent {
        fn notify(&self, _notice: Notice) {}
    }

    struct Offline;

    impl RecordStore for Offline {
        fn select(&self, _: Collection, _: Option<&OrderBy>) -> Result<Vec<StoreRow>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn insert(&self, _: Collection, _: StoreRow) -> Result<StoreRow, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn update(&self, _: Collection, _: &str, _: StoreRow) -> Result<StoreRow, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }

        fn delete(&self, _: Collection, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
    }

    fn router<S: RecordStore + 'static>(store: S) -> Router {
        let config = PortalConfig {
            directory_page_size: 4,
            ..PortalConfig::default()
        };
        directory_router(Arc::new(PortalService::new(
            Arc::new(store),
            Arc::new(Silent),
            config,
        )))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn directory_route_filters_by_region_and_district() {
        let (status, body) = get_json(
            router(Offline),
            "/api/v1/directory?region=Greater%20Accra&district=Accra%20Metropolitan",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], json!("fallback"));
        assert_eq!(body["page"]["total"], json!(2));
        assert_eq!(body["filters"]["district"], json!("Accra Metropolitan"));
        assert!(body["district_options"]
            .as_array()
            .is_some_and(|options| options.contains(&json!("Tema Metropolitan"))));
    }

    #[tokio::test]
    async fn directory_route_searches_and_pages() {
        let (_, body) = get_json(router(Offline), "/api/v1/directory?q=teaching&page=2").await;

        assert_eq!(body["query"], json!("teaching"));
        assert_eq!(body["page"]["total"], json!(5));
        assert_eq!(body["page"]["page"], json!(2));
        assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn directory_route_reads_the_store() {
        let (_, body) = get_json(router(MemoryStore::new()), "/api/v1/directory").await;

        assert_eq!(body["source"], json!("store"));
        assert_eq!(body["items"], json!([]));
        assert_eq!(body["district_options"], json!([]));
    }

    #[tokio::test]
    async fn regions_route_lists_all_regions() {
        let (status, body) = get_json(router(Offline), "/api/v1/directory/regions").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(16));
    }

    #[tokio::test]
    async fn districts_route_rejects_unknown_regions() {
        let (status, body) =
            get_json(router(Offline), "/api/v1/directory/regions/northern/districts").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body
            .as_array()
            .is_some_and(|districts| districts.contains(&json!("Tamale Metropolitan"))));

        let (status, _) =
            get_json(router(Offline), "/api/v1/directory/regions/Atlantis/districts").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
