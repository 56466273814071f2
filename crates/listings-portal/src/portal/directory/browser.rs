use std::sync::Arc;

use serde_json::Value;
use tracing::{error, warn};

use super::domain::{DirectoryEntry, DirectoryFacet};
use super::filters::DirectoryFilters;
use super::regions::RegionDirectory;
use super::samples::sample_directory;
use crate::portal::notify::{Notice, Notifier};
use crate::portal::query::{apply_filters, clamp_page, paginate, PageInfo, Selection};
use crate::portal::store::{Collection, OrderBy, RecordStore, SnapshotSource};

/// Public directory page state: loaded entries, filters and page.
pub struct DirectoryBrowser<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    regions: &'static RegionDirectory,
    entries: Vec<DirectoryEntry>,
    source: SnapshotSource,
    filters: DirectoryFilters,
    page: usize,
    page_size: usize,
}

impl<S, N> DirectoryBrowser<S, N>
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        regions: &'static RegionDirectory,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            notifier,
            regions,
            entries: Vec::new(),
            source: SnapshotSource::Empty,
            filters: DirectoryFilters::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn load(&mut self) -> SnapshotSource {
        let order = OrderBy::ascending("name");
        match self.store.select(Collection::Hospitals, Some(&order)) {
            Ok(rows) => {
                self.entries = rows
                    .into_iter()
                    .filter_map(|row| {
                        match serde_json::from_value::<DirectoryEntry>(Value::Object(row)) {
                            Ok(entry) => Some(entry),
                            Err(err) => {
                                warn!(error = %err, "skipping malformed directory row");
                                None
                            }
                        }
                    })
                    .collect();
                self.source = SnapshotSource::Store;
            }
            Err(err) => {
                warn!(error = %err, "directory load failed, using samples");
                self.entries = sample_directory().unwrap_or_else(|err| {
                    error!(error = %err, "built-in directory samples are unreadable");
                    Vec::new()
                });
                self.source = SnapshotSource::Fallback;
                self.notifier.notify(Notice::error(
                    "Could not load the facility directory; showing sample data",
                ));
            }
        }
        self.source
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    pub fn regions(&self) -> &'static RegionDirectory {
        self.regions
    }

    pub fn filters(&self) -> &DirectoryFilters {
        &self.filters
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filters.set_search(text);
    }

    pub fn select_region(&mut self, region: Selection) {
        self.filters.select_region(region);
    }

    pub fn select_district(&mut self, district: Selection) {
        self.filters.select_district(district);
    }

    pub fn set_facet(&mut self, facet: DirectoryFacet, selection: Selection) {
        self.filters.set_facet(facet, selection);
    }

    pub fn district_options(&self) -> &'static [&'static str] {
        self.filters.district_options(self.regions)
    }

    pub fn filtered(&self) -> Vec<&DirectoryEntry> {
        apply_filters(&self.entries, self.filters.query())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) -> usize {
        let total = self.filtered().len();
        self.page = clamp_page(page, total, self.page_size);
        self.page
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.page, self.page_size, self.filtered().len())
    }

    pub fn visible(&self) -> Vec<&DirectoryEntry> {
        let filtered = self.filtered();
        paginate(&filtered, self.page_size, self.page).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::{json, Map};

    use super::*;
    use crate::portal::notify::NoticeLevel;
    use crate::portal::store::{MemoryStore, StoreError, StoreRow};

    #[derive(Default)]
    struct Notices(Mutex<Vec<Notice>>);

    impl Notifier for Notices {
        fn notify(&self, notice: Notice) {
            self.0.lock().expect("lock").push(notice);
        }
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

    fn hospital(name: &str, region: &str, district: &str) -> StoreRow {
        match json!({
            "name": name,
            "region": region,
            "district": district,
            "facility_type": "Clinic",
            "services": "Outpatient;Laboratory",
        }) {
            Value::Object(row) => row,
            _ => unreachable!(),
        }
    }

    fn browser_with<S: RecordStore + 'static>(
        store: S,
        page_size: usize,
    ) -> (DirectoryBrowser<S, Notices>, Arc<Notices>) {
        let notices = Arc::new(Notices::default());
        let browser = DirectoryBrowser::new(
            Arc::new(store),
            Arc::clone(&notices),
            RegionDirectory::ghana(),
            page_size,
        );
        (browser, notices)
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.seed(
            Collection::Hospitals,
            vec![
                hospital("Tema General", "Greater Accra", "Tema Metropolitan"),
                hospital("Agogo Presbyterian", "Ashanti", "Asante Akim North Municipal"),
                hospital("Achimota Clinic", "Greater Accra", "Okaikwei North Municipal"),
                Map::from_iter([("region".to_string(), json!("Volta"))]),
            ],
        );
        store
    }

    #[test]
    fn load_sorts_by_name_and_skips_malformed_rows() {
        let (mut browser, notices) = browser_with(seeded(), 20);

        assert_eq!(browser.load(), SnapshotSource::Store);

        let names: Vec<&str> = browser.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Achimota Clinic", "Agogo Presbyterian", "Tema General"]);
        assert_eq!(browser.entries()[0].services, vec!["Outpatient", "Laboratory"]);
        assert!(notices.0.lock().expect("lock").is_empty());
    }

    #[test]
    fn load_failure_shows_sample_facilities() {
        let (mut browser, notices) = browser_with(Offline, 20);

        assert_eq!(browser.load(), SnapshotSource::Fallback);

        assert_eq!(browser.entries().len(), 8);
        let levels: Vec<NoticeLevel> = notices
            .0
            .lock()
            .expect("lock")
            .iter()
            .map(|notice| notice.level)
            .collect();
        assert_eq!(levels, vec![NoticeLevel::Error]);
    }

    #[test]
    fn region_and_district_narrow_the_results() {
        let (mut browser, _) = browser_with(seeded(), 20);
        browser.load();

        browser.select_region(Selection::parse("Greater Accra"));
        assert_eq!(browser.filtered().len(), 2);
        assert!(browser.district_options().contains(&"Tema Metropolitan"));

        browser.select_district(Selection::parse("Tema Metropolitan"));
        assert_eq!(browser.filtered().len(), 1);

        browser.select_region(Selection::parse("Ashanti"));
        assert!(browser
            .filters()
            .selection(DirectoryFacet::District)
            .is_all());
        assert_eq!(browser.filtered()[0].name, "Agogo Presbyterian");
    }

    #[test]
    fn lower_case_region_and_district_still_match_entries() {
        let (mut browser, _) = browser_with(Offline, 20);
        browser.load();

        browser.select_region(Selection::parse("greater accra"));
        assert_eq!(browser.district_options().len(), 6);
        assert_eq!(browser.filtered().len(), 3);

        browser.select_district(Selection::parse("accra metropolitan"));
        let names: Vec<&str> = browser.filtered().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Korle Bu Teaching Hospital", "Ridge Hospital"]);
    }

    #[test]
    fn pages_follow_the_configured_size() {
        let (mut browser, _) = browser_with(Offline, 3);
        browser.load();

        assert_eq!(browser.visible().len(), 3);
        assert_eq!(browser.set_page(3), 3);
        assert_eq!(browser.visible().len(), 2);
        assert_eq!(browser.page_info().page_count, 3);
        assert_eq!(browser.set_page(10), 3);
    }
}
