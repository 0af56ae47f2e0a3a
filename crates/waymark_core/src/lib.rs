//! Core domain logic for Waymark.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod location;
pub mod logging;
pub mod model;
pub mod projection;
pub mod registry;
pub mod store;

pub use location::{LocationFeed, LocationStatus, LocationSubscription};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::place::{
    Coordinates, PlaceDraft, PlacePatch, PlaceValidationError, SavedPlace,
};
pub use model::region::{MapRegion, RegionBounds};
pub use projection::{place_markers, project_offset, MapScale, PixelOffset, PlaceMarker};
pub use registry::offline::{
    find_region, region_catalog, DownloadOutcome, OfflineRegionRegistry, OfflineRegistryError,
    OfflineResult, SIMULATED_DOWNLOAD_DELAY, STORAGE_CAPACITY_MB,
};
pub use registry::places::{PlaceRegistryError, PlacesResult, SavedPlaceRegistry};
pub use store::{CollectionStore, SqliteCollectionStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
