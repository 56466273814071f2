//! Public facility directory with the region/district cascade.

pub mod browser;
pub mod domain;
pub mod filters;
pub mod regions;
pub mod router;
pub mod samples;

pub use browser::DirectoryBrowser;
pub use domain::{DirectoryEntry, DirectoryFacet};
pub use filters::DirectoryFilters;
pub use regions::RegionDirectory;
pub use router::{directory_router, DirectoryPageView};
pub use samples::{sample_directory, SampleError};
