use crate::cli::ServeArgs;
use crate::infra::{build_store, AppState, TracingNotifier};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use listings_portal::config::AppConfig;
use listings_portal::error::AppError;
use listings_portal::portal::PortalService;
use listings_portal::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(build_store(&config.portal)?);
    let portal_service = Arc::new(PortalService::new(
        store,
        Arc::new(TracingNotifier),
        config.portal.clone(),
    ));

    let app = with_portal_routes(portal_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        page_size = config.portal.page_size,
        "listings portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
