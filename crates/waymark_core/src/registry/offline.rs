//! Offline map region registry.
//!
//! # Responsibility
//! - Expose the built-in region catalog and track which regions are
//!   downloaded on this device.
//! - Simulate region downloads with a fixed delay and deduplicate
//!   concurrent requests per region id.
//!
//! # Invariants
//! - The downloaded list mirrors the last durably persisted state; failed
//!   saves roll back before the error surfaces.
//! - At most one simulated fetch runs per region id at a time; concurrent
//!   callers for the same id share its outcome.
//! - The state lock is never held across an await point.

use crate::model::region::{MapRegion, RegionBounds};
use crate::store::{CollectionStore, StoreError};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Well-known collection key for the offline-region document.
const STORAGE_KEY: &str = "offlineMapsData";

/// Fixed delay standing in for a real tile fetch.
pub const SIMULATED_DOWNLOAD_DELAY: Duration = Duration::from_millis(1500);

/// Nominal device storage budget for offline maps, in megabytes.
pub const STORAGE_CAPACITY_MB: f64 = 5000.0;

static REGION_CATALOG: [MapRegion; 5] = [
    MapRegion {
        id: "sf",
        name: "San Francisco",
        size_mb: 120.0,
        bounds: RegionBounds {
            lat: [37.7, 37.8],
            lng: [-122.5, -122.3],
        },
    },
    MapRegion {
        id: "tokyo",
        name: "Tokyo",
        size_mb: 250.0,
        bounds: RegionBounds {
            lat: [35.6, 35.8],
            lng: [139.6, 139.9],
        },
    },
    MapRegion {
        id: "london",
        name: "London",
        size_mb: 180.0,
        bounds: RegionBounds {
            lat: [51.4, 51.6],
            lng: [-0.2, 0.0],
        },
    },
    MapRegion {
        id: "paris",
        name: "Paris",
        size_mb: 150.0,
        bounds: RegionBounds {
            lat: [48.8, 48.9],
            lng: [2.2, 2.4],
        },
    },
    MapRegion {
        id: "sydney",
        name: "Sydney",
        size_mb: 190.0,
        bounds: RegionBounds {
            lat: [-33.9, -33.8],
            lng: [151.1, 151.3],
        },
    },
];

/// The built-in catalog of downloadable regions, in display order.
pub fn region_catalog() -> &'static [MapRegion] {
    &REGION_CATALOG
}

/// Looks up a catalog region by id.
pub fn find_region(region_id: &str) -> Option<&'static MapRegion> {
    REGION_CATALOG.iter().find(|region| region.id == region_id)
}

pub type OfflineResult<T> = Result<T, OfflineRegistryError>;

/// Error for offline-region registry operations.
#[derive(Debug)]
pub enum OfflineRegistryError {
    /// Region id is not part of the built-in catalog.
    UnknownRegion(String),
    /// Underlying persistence error.
    Store(StoreError),
    /// The in-flight download this call joined did not commit.
    DownloadInterrupted(String),
}

impl Display for OfflineRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRegion(region_id) => write!(f, "unknown map region `{region_id}`"),
            Self::Store(err) => write!(f, "{err}"),
            Self::DownloadInterrupted(region_id) => write!(
                f,
                "download for region `{region_id}` was interrupted before commit"
            ),
        }
    }
}

impl Error for OfflineRegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownRegion(_) => None,
            Self::Store(err) => Some(err),
            Self::DownloadInterrupted(_) => None,
        }
    }
}

impl From<StoreError> for OfflineRegistryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// How a successful download call resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// This call ran the simulated fetch and committed the region.
    Downloaded,
    /// The region was already downloaded; resolved without persisting.
    AlreadyDownloaded,
    /// A concurrent download of the same region committed while this call
    /// waited on it.
    JoinedInFlight,
}

/// Persisted document shape for the offline-region collection.
#[derive(Debug, Default, Serialize, Deserialize)]
struct OfflineMapsData {
    #[serde(default)]
    downloaded: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlight {
    Pending,
    Committed,
    Failed,
}

enum Role {
    Lead(watch::Sender<InFlight>),
    Join(watch::Receiver<InFlight>),
}

struct OfflineState {
    downloaded: Vec<String>,
    in_flight: HashMap<String, watch::Receiver<InFlight>>,
}

/// In-memory owner of the offline-region collection.
pub struct OfflineRegionRegistry<S: CollectionStore> {
    store: S,
    state: Mutex<OfflineState>,
}

impl<S: CollectionStore> OfflineRegionRegistry<S> {
    /// Loads the persisted downloaded list into memory.
    ///
    /// Ids persisted by older builds that no longer match the catalog stay
    /// in the list; they contribute nothing to storage accounting.
    pub fn load(store: S) -> Self {
        let data: OfflineMapsData = store.load(STORAGE_KEY).unwrap_or_default();
        info!(
            "event=offline_load module=offline status=ok downloaded={}",
            data.downloaded.len()
        );
        Self {
            store,
            state: Mutex::new(OfflineState {
                downloaded: data.downloaded,
                in_flight: HashMap::new(),
            }),
        }
    }

    /// Ids of downloaded regions in completion order.
    pub fn downloaded_ids(&self) -> Vec<String> {
        self.state.lock().downloaded.clone()
    }

    /// Catalog entries for the downloaded regions, skipping ids the catalog
    /// no longer knows.
    pub fn downloaded_regions(&self) -> Vec<&'static MapRegion> {
        let state = self.state.lock();
        state
            .downloaded
            .iter()
            .filter_map(|id| find_region(id))
            .collect()
    }

    pub fn is_downloaded(&self, region_id: &str) -> bool {
        self.state.lock().downloaded.iter().any(|id| id == region_id)
    }

    /// Sum of catalog sizes for all downloaded regions, in megabytes.
    pub fn storage_usage_mb(&self) -> f64 {
        let state = self.state.lock();
        state
            .downloaded
            .iter()
            .filter_map(|id| find_region(id))
            .map(|region| region.size_mb)
            .sum()
    }

    /// Downloads a catalog region, waiting out the simulated fetch delay.
    ///
    /// Concurrent calls for the same region share one fetch: the first
    /// caller runs it, later callers wait for its outcome. Calls for an
    /// already-downloaded region resolve immediately.
    ///
    /// # Errors
    /// - [`OfflineRegistryError::UnknownRegion`] when the id is not in the
    ///   catalog; nothing is persisted.
    /// - [`OfflineRegistryError::Store`] when persisting the grown list
    ///   fails; the mirror rolls back first.
    /// - [`OfflineRegistryError::DownloadInterrupted`] when the fetch this
    ///   call joined failed or was dropped before committing.
    pub async fn download(&self, region_id: &str) -> OfflineResult<DownloadOutcome> {
        if find_region(region_id).is_none() {
            warn!(
                "event=region_download module=offline status=rejected region_id={region_id} reason=unknown_region"
            );
            return Err(OfflineRegistryError::UnknownRegion(region_id.to_string()));
        }

        let role = {
            let mut state = self.state.lock();
            if state.downloaded.iter().any(|id| id == region_id) {
                debug!("event=region_download module=offline status=already region_id={region_id}");
                return Ok(DownloadOutcome::AlreadyDownloaded);
            }
            match state.in_flight.get(region_id) {
                // A download future dropped mid-delay leaves a closed
                // channel behind; replace it and lead a fresh attempt.
                Some(rx) if rx.has_changed().is_ok() => Role::Join(rx.clone()),
                _ => {
                    let (tx, rx) = watch::channel(InFlight::Pending);
                    state.in_flight.insert(region_id.to_string(), rx);
                    Role::Lead(tx)
                }
            }
        };

        match role {
            Role::Lead(tx) => self.lead_download(region_id, tx).await,
            Role::Join(rx) => join_download(region_id, rx).await,
        }
    }

    async fn lead_download(
        &self,
        region_id: &str,
        tx: watch::Sender<InFlight>,
    ) -> OfflineResult<DownloadOutcome> {
        let started_at = Instant::now();
        info!(
            "event=region_download module=offline status=start region_id={region_id} delay_ms={}",
            SIMULATED_DOWNLOAD_DELAY.as_millis()
        );

        tokio::time::sleep(SIMULATED_DOWNLOAD_DELAY).await;

        let saved = {
            let mut state = self.state.lock();
            state.downloaded.push(region_id.to_string());
            let result = self.persist(&state.downloaded);
            if result.is_err() {
                state.downloaded.pop();
            }
            state.in_flight.remove(region_id);
            result
        };

        match saved {
            Ok(()) => {
                let _ = tx.send(InFlight::Committed);
                info!(
                    "event=region_download module=offline status=ok region_id={region_id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(DownloadOutcome::Downloaded)
            }
            Err(err) => {
                let _ = tx.send(InFlight::Failed);
                error!(
                    "event=region_download module=offline status=error region_id={region_id} error={err}"
                );
                Err(OfflineRegistryError::Store(err))
            }
        }
    }

    /// Removes a region from the downloaded list and persists the result.
    ///
    /// Operates on the downloaded list only, so stale ids from older
    /// catalogs can still be deleted. Returns `Ok(false)` without
    /// persisting when the region is not downloaded.
    pub fn delete(&self, region_id: &str) -> OfflineResult<bool> {
        let mut state = self.state.lock();
        let Some(index) = state.downloaded.iter().position(|id| id == region_id) else {
            debug!(
                "event=region_delete module=offline status=skip region_id={region_id} reason=not_downloaded"
            );
            return Ok(false);
        };

        let removed = state.downloaded.remove(index);
        if let Err(err) = self.persist(&state.downloaded) {
            state.downloaded.insert(index, removed);
            error!(
                "event=region_delete module=offline status=rollback region_id={region_id} error={err}"
            );
            return Err(OfflineRegistryError::Store(err));
        }

        info!("event=region_delete module=offline status=ok region_id={region_id}");
        Ok(true)
    }

    fn persist(&self, downloaded: &[String]) -> Result<(), StoreError> {
        self.store.save(
            STORAGE_KEY,
            &OfflineMapsData {
                downloaded: downloaded.to_vec(),
            },
        )
    }
}

async fn join_download(
    region_id: &str,
    mut rx: watch::Receiver<InFlight>,
) -> OfflineResult<DownloadOutcome> {
    debug!("event=region_download module=offline status=join region_id={region_id}");
    loop {
        match *rx.borrow_and_update() {
            InFlight::Committed => return Ok(DownloadOutcome::JoinedInFlight),
            InFlight::Failed => {
                return Err(OfflineRegistryError::DownloadInterrupted(
                    region_id.to_string(),
                ))
            }
            InFlight::Pending => {}
        }

        if rx.changed().await.is_err() {
            return Err(OfflineRegistryError::DownloadInterrupted(
                region_id.to_string(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{find_region, region_catalog, STORAGE_CAPACITY_MB};

    #[test]
    fn catalog_lists_five_known_regions() {
        let ids: Vec<&str> = region_catalog().iter().map(|region| region.id).collect();
        assert_eq!(ids, ["sf", "tokyo", "london", "paris", "sydney"]);
    }

    #[test]
    fn catalog_sizes_fit_storage_capacity() {
        let total: f64 = region_catalog().iter().map(|region| region.size_mb).sum();
        assert!(total < STORAGE_CAPACITY_MB);
    }

    #[test]
    fn find_region_matches_exact_id_only() {
        assert_eq!(find_region("tokyo").map(|region| region.name), Some("Tokyo"));
        assert!(find_region("Tokyo").is_none());
        assert!(find_region("atlantis").is_none());
    }
}
