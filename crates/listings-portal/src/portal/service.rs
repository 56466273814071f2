use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::directory::{DirectoryBrowser, RegionDirectory};
use super::listings::{ListingKind, ListingManager};
use super::notify::Notifier;
use super::store::RecordStore;
use crate::config::PortalConfig;

/// Shared collaborators handed to every manager and directory session.
pub struct PortalService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    config: PortalConfig,
    regions: &'static RegionDirectory,
    saving: HashMap<ListingKind, Arc<AtomicBool>>,
}

impl<S, N> PortalService<S, N>
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, config: PortalConfig) -> Self {
        let saving = ListingKind::ordered()
            .into_iter()
            .map(|kind| (kind, Arc::new(AtomicBool::new(false))))
            .collect();

        Self {
            store,
            notifier,
            config,
            regions: RegionDirectory::ghana(),
            saving,
        }
    }

    pub fn with_regions(mut self, regions: &'static RegionDirectory) -> Self {
        self.regions = regions;
        self
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn regions(&self) -> &'static RegionDirectory {
        self.regions
    }

    /// Fresh, unloaded manager sharing the kind's saving flag.
    pub fn listing_manager(&self, kind: ListingKind) -> ListingManager<S, N> {
        let manager = ListingManager::new(
            kind,
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            self.config.page_size,
        );
        match self.saving.get(&kind) {
            Some(flag) => manager.with_saving_flag(Arc::clone(flag)),
            None => manager,
        }
    }

    pub fn directory(&self) -> DirectoryBrowser<S, N> {
        DirectoryBrowser::new(
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            self.regions,
            self.config.directory_page_size,
        )
    }
}
