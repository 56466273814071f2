use listings_portal::config::PortalConfig;
use listings_portal::error::AppError;
use listings_portal::portal::listings::{ListingFacet, ListingKind};
use listings_portal::portal::{
    Collection, MemoryStore, Notice, NoticeLevel, Notifier, OrderBy, RecordStore, Selection,
    StoreError, StoreRow,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Routes portal notices into the service log.
#[derive(Default, Clone, Copy)]
pub(crate) struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => error!(notice = %notice.message, "portal notice"),
            NoticeLevel::Info | NoticeLevel::Success => {
                info!(level = notice.level.label(), notice = %notice.message, "portal notice")
            }
        }
    }
}

/// Prints notices to stderr for command-line sessions.
#[derive(Default, Clone, Copy)]
pub(crate) struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("[{}] {}", notice.level.label(), notice.message);
    }
}

/// A store that is never reachable; exercises the sample-data fallback.
#[derive(Default, Clone, Copy)]
pub(crate) struct OfflineStore;

impl OfflineStore {
    fn unavailable() -> StoreError {
        StoreError::Unavailable("record store is offline".to_string())
    }
}

impl RecordStore for OfflineStore {
    fn select(
        &self,
        _collection: Collection,
        _order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoreRow>, StoreError> {
        Err(Self::unavailable())
    }

    fn insert(&self, _collection: Collection, _row: StoreRow) -> Result<StoreRow, StoreError> {
        Err(Self::unavailable())
    }

    fn update(
        &self,
        _collection: Collection,
        _id: &str,
        _patch: StoreRow,
    ) -> Result<StoreRow, StoreError> {
        Err(Self::unavailable())
    }

    fn delete(&self, _collection: Collection, _id: &str) -> Result<(), StoreError> {
        Err(Self::unavailable())
    }
}

/// In-process store, seeded from `PORTAL_SEED_PATH` when one is configured.
pub(crate) fn build_store(config: &PortalConfig) -> Result<MemoryStore, AppError> {
    match &config.seed_path {
        Some(path) => {
            let store = MemoryStore::from_seed_file(path)?;
            info!(path = %path.display(), "seeded record store");
            Ok(store)
        }
        None => Ok(MemoryStore::new()),
    }
}

pub(crate) fn parse_kind(raw: &str) -> Result<ListingKind, String> {
    ListingKind::from_slug(raw).ok_or_else(|| {
        let known: Vec<&str> = ListingKind::ordered()
            .into_iter()
            .map(ListingKind::slug)
            .collect();
        format!("unknown listing kind '{raw}' (expected one of {})", known.join(", "))
    })
}

/// Parses `facet=value`, e.g. `contract_type=Full-time`.
pub(crate) fn parse_facet(raw: &str) -> Result<(ListingFacet, Selection), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FACET=VALUE, got '{raw}'"))?;
    let facet =
        ListingFacet::from_param(name).ok_or_else(|| format!("unknown listing facet '{name}'"))?;
    Ok((facet, Selection::parse(value)))
}
