//! Listing admin and public directory core for the jobs and healthcare portal.
//!
//! Listings move between a form shape (`listings::ListingForm`) and a stored
//! shape (`listings::ListingRecord`) through the codec; both the admin
//! managers and the public directory filter and page their snapshots through
//! the shared query engine in [`query`].

pub mod directory;
pub mod listings;
pub mod notify;
pub mod query;
pub mod service;
pub mod store;

pub use notify::{Notice, NoticeLevel, Notifier};
pub use query::{apply_filters, paginate, Filterable, ListingQuery, PageInfo, Selection};
pub use service::PortalService;
pub use store::{
    Collection, MemoryStore, OrderBy, RecordStore, SeedError, SnapshotSource, StoreError, StoreRow,
};
