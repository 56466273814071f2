//! Admin-side listing kinds: schemas, the form/record codec and managers.

pub mod codec;
pub mod form;
pub mod manager;
pub mod record;
pub mod router;
pub mod samples;
pub mod schema;

#[cfg(test)]
mod tests;

pub use form::{FormError, ListingForm, Requirement};
pub use manager::{ListingManager, ManagerError};
pub use record::{
    FieldOpsGroup, ListingFacet, ListingFlags, ListingId, ListingMedia, ListingRecord,
    RecordTimestamps,
};
pub use router::{listing_router, ListingPageView};
pub use samples::sample_listings;
pub use schema::{BulletSection, ListingFlag, ListingKind, ListingSchema, ScalarField};
