//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the process-wide store, registries and location feed.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every function degrades to an envelope with a message instead of
//!   throwing.
//! - `init_app` must succeed before any data function is useful.

use log::{error, info};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use waymark_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    place_markers, region_catalog, Coordinates, DownloadOutcome, LocationFeed, LocationStatus,
    MapScale, OfflineRegionRegistry, PlaceDraft, PlacePatch, SavedPlace, SavedPlaceRegistry,
    SqliteCollectionStore, STORAGE_CAPACITY_MB,
};

const DB_FILE_NAME: &str = "waymark.sqlite3";

static APP_STATE: OnceCell<AppState> = OnceCell::new();

struct AppState {
    db_path: PathBuf,
    places: Mutex<SavedPlaceRegistry<Arc<SqliteCollectionStore>>>,
    offline: OfflineRegionRegistry<Arc<SqliteCollectionStore>>,
    location: LocationFeed,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the persisted store and loads both registries once per process.
///
/// Input semantics:
/// - `db_dir`: absolute directory for app data; the SQLite file is created
///   inside it.
///
/// # FFI contract
/// - Sync call; performs file-system and SQLite setup work.
/// - Safe to call repeatedly with the same `db_dir` (idempotent).
/// - Reconfiguration attempts with a different directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_app(db_dir: String) -> String {
    match ensure_app_state(db_dir.as_str()) {
        Ok(_) => String::new(),
        Err(err) => err,
    }
}

/// One saved place as shown to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceView {
    /// Stable opaque id in string form.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional notes; absent when never set or cleared.
    pub notes: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

/// List response envelope for saved places.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceListResponse {
    /// Saved places in insertion order (empty on failure).
    pub places: Vec<PlaceView>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Action response envelope for saved-place mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceActionResponse {
    /// Whether the operation succeeded (silent no-ops count as success).
    pub ok: bool,
    /// Stored record for create/update flows; absent otherwise.
    pub place: Option<PlaceView>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl PlaceActionResponse {
    fn success(message: impl Into<String>, place: Option<PlaceView>) -> Self {
        Self {
            ok: true,
            place,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            place: None,
            message: message.into(),
        }
    }
}

/// Lists all saved places.
///
/// # FFI contract
/// - Sync call, served from the in-memory mirror.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn list_places() -> PlaceListResponse {
    let state = match app_state() {
        Ok(state) => state,
        Err(message) => {
            return PlaceListResponse {
                places: Vec::new(),
                message,
            }
        }
    };

    let places = state.places.lock();
    let views: Vec<PlaceView> = places.list().iter().map(to_place_view).collect();
    let message = if views.is_empty() {
        "No saved places.".to_string()
    } else {
        format!("{} saved place(s).", views.len())
    };
    PlaceListResponse {
        places: views,
        message,
    }
}

/// Saves a new place at the given coordinates.
///
/// # FFI contract
/// - Sync call, persists before returning.
/// - Blank names are rejected; notes are optional.
/// - Never panics; returns the stored record with its generated id.
#[flutter_rust_bridge::frb(sync)]
pub fn add_place(name: String, notes: Option<String>, lat: f64, lng: f64) -> PlaceActionResponse {
    let state = match app_state() {
        Ok(state) => state,
        Err(message) => return PlaceActionResponse::failure(message),
    };

    let mut draft = PlaceDraft::new(name.trim(), Coordinates { lat, lng });
    draft.notes = notes;

    match state.places.lock().add(draft) {
        Ok(place) => PlaceActionResponse::success("Place saved.", Some(to_place_view(&place))),
        Err(err) => PlaceActionResponse::failure(format!("add_place failed: {err}")),
    }
}

/// Updates name and/or notes of an existing place.
///
/// Input semantics:
/// - `name`: `None` keeps the current name.
/// - `notes`: `None` keeps the current notes; blank text clears them.
///
/// # FFI contract
/// - Sync call, persists before returning.
/// - Unknown ids resolve as a silent no-op with `ok = true`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn update_place(
    id: String,
    name: Option<String>,
    notes: Option<String>,
) -> PlaceActionResponse {
    let state = match app_state() {
        Ok(state) => state,
        Err(message) => return PlaceActionResponse::failure(message),
    };

    let patch = PlacePatch {
        name: name.map(|value| value.trim().to_string()),
        notes,
    };

    let mut places = state.places.lock();
    match places.update(&id, &patch) {
        Ok(true) => {
            PlaceActionResponse::success("Place updated.", places.get(&id).map(to_place_view))
        }
        Ok(false) => {
            PlaceActionResponse::success("No place with that id; nothing changed.", None)
        }
        Err(err) => PlaceActionResponse::failure(format!("update_place failed: {err}")),
    }
}

/// Removes a place by id.
///
/// # FFI contract
/// - Sync call, persists before returning.
/// - Unknown ids resolve as a silent no-op with `ok = true`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_place(id: String) -> PlaceActionResponse {
    let state = match app_state() {
        Ok(state) => state,
        Err(message) => return PlaceActionResponse::failure(message),
    };

    match state.places.lock().remove(&id) {
        Ok(true) => PlaceActionResponse::success("Place removed.", None),
        Ok(false) => {
            PlaceActionResponse::success("No place with that id; nothing changed.", None)
        }
        Err(err) => PlaceActionResponse::failure(format!("remove_place failed: {err}")),
    }
}

/// One catalog region with its download state.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionView {
    pub id: String,
    pub name: String,
    /// Nominal download size in megabytes.
    pub size_mb: f64,
    pub downloaded: bool,
}

/// List response envelope for the region catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionListResponse {
    /// Catalog regions in display order (empty on failure).
    pub regions: Vec<RegionView>,
    /// Current storage usage across downloaded regions, in megabytes.
    pub storage_usage_mb: f64,
    /// Nominal device storage budget, in megabytes.
    pub storage_capacity_mb: f64,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Action response envelope for region downloads and deletions.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// How the call resolved:
    /// `downloaded|already_downloaded|joined_in_flight|deleted|not_downloaded`.
    pub resolution: Option<String>,
    /// Storage usage after the operation, in megabytes.
    pub storage_usage_mb: f64,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl RegionActionResponse {
    fn success(
        message: impl Into<String>,
        resolution: &'static str,
        storage_usage_mb: f64,
    ) -> Self {
        Self {
            ok: true,
            resolution: Some(resolution.to_string()),
            storage_usage_mb,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>, storage_usage_mb: f64) -> Self {
        Self {
            ok: false,
            resolution: None,
            storage_usage_mb,
            message: message.into(),
        }
    }
}

/// Lists the region catalog with per-region download state.
///
/// # FFI contract
/// - Sync call, served from the in-memory mirror.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn list_regions() -> RegionListResponse {
    let state = match app_state() {
        Ok(state) => state,
        Err(message) => {
            return RegionListResponse {
                regions: Vec::new(),
                storage_usage_mb: 0.0,
                storage_capacity_mb: STORAGE_CAPACITY_MB,
                message,
            }
        }
    };

    let regions: Vec<RegionView> = region_catalog()
        .iter()
        .map(|region| RegionView {
            id: region.id.to_string(),
            name: region.name.to_string(),
            size_mb: region.size_mb,
            downloaded: state.offline.is_downloaded(region.id),
        })
        .collect();

    RegionListResponse {
        storage_usage_mb: state.offline.storage_usage_mb(),
        storage_capacity_mb: STORAGE_CAPACITY_MB,
        message: format!("{} region(s) available.", regions.len()),
        regions,
    }
}

/// Downloads a catalog region for offline use.
///
/// # FFI contract
/// - Async call; resolves after the simulated fetch delay.
/// - Concurrent calls for the same region share one fetch.
/// - Unknown region ids fail without persisting.
/// - Never panics.
pub async fn download_region(region_id: String) -> RegionActionResponse {
    let state = match app_state() {
        Ok(state) => state,
        Err(message) => return RegionActionResponse::failure(message, 0.0),
    };

    match state.offline.download(&region_id).await {
        Ok(outcome) => RegionActionResponse::success(
            download_message(outcome),
            download_resolution(outcome),
            state.offline.storage_usage_mb(),
        ),
        Err(err) => RegionActionResponse::failure(
            format!("download_region failed: {err}"),
            state.offline.storage_usage_mb(),
        ),
    }
}

/// Deletes a downloaded region.
///
/// # FFI contract
/// - Sync call, persists before returning.
/// - Regions that are not downloaded resolve as a no-op with `ok = true`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_region(region_id: String) -> RegionActionResponse {
    let state = match app_state() {
        Ok(state) => state,
        Err(message) => return RegionActionResponse::failure(message, 0.0),
    };

    match state.offline.delete(&region_id) {
        Ok(true) => RegionActionResponse::success(
            "Region deleted.",
            "deleted",
            state.offline.storage_usage_mb(),
        ),
        Ok(false) => RegionActionResponse::success(
            "Region is not downloaded; nothing changed.",
            "not_downloaded",
            state.offline.storage_usage_mb(),
        ),
        Err(err) => RegionActionResponse::failure(
            format!("delete_region failed: {err}"),
            state.offline.storage_usage_mb(),
        ),
    }
}

/// Current device location as seen by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationResponse {
    /// One of `acquiring|available|unavailable`.
    pub status: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Reason text when status is `unavailable`.
    pub reason: Option<String>,
}

/// Publishes a position fix from the platform location plugin.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn publish_location_fix(lat: f64, lng: f64) -> String {
    match app_state() {
        Ok(state) => {
            state.location.publish_fix(Coordinates { lat, lng });
            String::new()
        }
        Err(message) => message,
    }
}

/// Publishes that fixes are unavailable (permission denied, sensor off).
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn publish_location_unavailable(reason: String) -> String {
    match app_state() {
        Ok(state) => {
            state.location.publish_unavailable(reason);
            String::new()
        }
        Err(message) => message,
    }
}

/// Returns the latest published location status.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; an uninitialized store reads as `unavailable`.
#[flutter_rust_bridge::frb(sync)]
pub fn current_location() -> LocationResponse {
    match app_state() {
        Ok(state) => to_location_response(state.location.current()),
        Err(message) => LocationResponse {
            status: "unavailable".to_string(),
            lat: None,
            lng: None,
            reason: Some(message),
        },
    }
}

/// One saved place positioned relative to the map center.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub place: PlaceView,
    /// Pixels right of center.
    pub offset_x: f64,
    /// Pixels below center; negative is north of center.
    pub offset_y: f64,
}

/// Marker response envelope for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerResponse {
    /// Markers for every saved place, in insertion order.
    pub markers: Vec<MarkerView>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Projects all saved places relative to the given map center.
///
/// # FFI contract
/// - Sync call, pure computation over the in-memory mirror.
/// - Offsets are not clamped; far places project off-screen.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn map_markers(center_lat: f64, center_lng: f64) -> MarkerResponse {
    let state = match app_state() {
        Ok(state) => state,
        Err(message) => {
            return MarkerResponse {
                markers: Vec::new(),
                message,
            }
        }
    };

    let center = Coordinates {
        lat: center_lat,
        lng: center_lng,
    };
    let places = state.places.lock();
    let markers: Vec<MarkerView> = place_markers(center, places.list(), MapScale::default())
        .into_iter()
        .map(|marker| MarkerView {
            place: to_place_view(marker.place),
            offset_x: marker.offset.x,
            offset_y: marker.offset.y,
        })
        .collect();

    MarkerResponse {
        message: format!("{} marker(s).", markers.len()),
        markers,
    }
}

fn ensure_app_state(db_dir: &str) -> Result<&'static AppState, String> {
    let db_path = resolve_db_path(db_dir)?;
    let state = APP_STATE.get_or_try_init(|| open_app_state(db_path.clone()))?;
    if state.db_path != db_path {
        return Err(format!(
            "store already initialized at `{}`; refusing to switch to `{}`",
            state.db_path.display(),
            db_path.display()
        ));
    }
    Ok(state)
}

fn app_state() -> Result<&'static AppState, String> {
    APP_STATE
        .get()
        .ok_or_else(|| "store not initialized; call init_app first".to_string())
}

fn resolve_db_path(db_dir: &str) -> Result<PathBuf, String> {
    let trimmed = db_dir.trim();
    if trimmed.is_empty() {
        return Err("db_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("db_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.join(DB_FILE_NAME))
}

fn open_app_state(db_path: PathBuf) -> Result<AppState, String> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            format!(
                "failed to create data directory `{}`: {err}",
                parent.display()
            )
        })?;
    }

    let store = match SqliteCollectionStore::open(&db_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            error!(
                "event=app_init module=ffi status=error db={} error={err}",
                db_path.display()
            );
            return Err(format!("store open failed: {err}"));
        }
    };

    info!(
        "event=app_init module=ffi status=ok db={}",
        db_path.display()
    );

    Ok(AppState {
        db_path,
        places: Mutex::new(SavedPlaceRegistry::load(store.clone())),
        offline: OfflineRegionRegistry::load(store),
        location: LocationFeed::new(),
    })
}

fn to_place_view(place: &SavedPlace) -> PlaceView {
    PlaceView {
        id: place.id.clone(),
        name: place.name.clone(),
        notes: place.notes.clone(),
        lat: place.coordinates.lat,
        lng: place.coordinates.lng,
    }
}

fn to_location_response(status: LocationStatus) -> LocationResponse {
    match status {
        LocationStatus::Acquiring => LocationResponse {
            status: "acquiring".to_string(),
            lat: None,
            lng: None,
            reason: None,
        },
        LocationStatus::Available(coordinates) => LocationResponse {
            status: "available".to_string(),
            lat: Some(coordinates.lat),
            lng: Some(coordinates.lng),
            reason: None,
        },
        LocationStatus::Unavailable { reason } => LocationResponse {
            status: "unavailable".to_string(),
            lat: None,
            lng: None,
            reason: Some(reason),
        },
    }
}

fn download_resolution(outcome: DownloadOutcome) -> &'static str {
    match outcome {
        DownloadOutcome::Downloaded => "downloaded",
        DownloadOutcome::AlreadyDownloaded => "already_downloaded",
        DownloadOutcome::JoinedInFlight => "joined_in_flight",
    }
}

fn download_message(outcome: DownloadOutcome) -> &'static str {
    match outcome {
        DownloadOutcome::Downloaded => "Region downloaded.",
        DownloadOutcome::AlreadyDownloaded => "Region was already downloaded.",
        DownloadOutcome::JoinedInFlight => "Joined an in-flight download.",
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_place, core_version, current_location, delete_region, download_region, init_app,
        init_logging, list_places, list_regions, map_markers, ping, publish_location_fix,
        publish_location_unavailable, remove_place, update_place,
    };
    use once_cell::sync::OnceCell;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn init_for_tests() {
        static TEST_DIR: OnceCell<PathBuf> = OnceCell::new();
        let dir = TEST_DIR.get_or_init(|| {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system time should be after unix epoch")
                .as_nanos();
            std::env::temp_dir().join(format!("waymark-ffi-{}-{nanos}", std::process::id()))
        });
        let error = init_app(dir.display().to_string());
        assert!(error.is_empty(), "{error}");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_app_rejects_relative_dir() {
        let error = init_app("relative/data".to_string());
        assert!(error.contains("absolute"));
    }

    #[test]
    fn place_flow_roundtrips_through_envelopes() {
        init_for_tests();

        let name = unique_token("place");
        let created = add_place(name.clone(), Some("  first visit  ".to_string()), 37.8, -122.4);
        assert!(created.ok, "{}", created.message);
        let view = created.place.expect("created place should be returned");
        assert_eq!(view.name, name);
        assert_eq!(view.notes.as_deref(), Some("first visit"));

        let listed = list_places();
        assert!(listed.places.iter().any(|place| place.id == view.id));

        let renamed = update_place(view.id.clone(), Some(format!("{name}-renamed")), None);
        assert!(renamed.ok, "{}", renamed.message);
        let renamed_view = renamed.place.expect("updated place should be returned");
        assert_eq!(renamed_view.name, format!("{name}-renamed"));
        assert_eq!(renamed_view.notes.as_deref(), Some("first visit"));

        let removed = remove_place(view.id.clone());
        assert!(removed.ok, "{}", removed.message);
        assert!(!list_places().places.iter().any(|place| place.id == view.id));

        let removed_again = remove_place(view.id);
        assert!(removed_again.ok);
        assert!(removed_again.message.contains("nothing changed"));
    }

    #[test]
    fn add_place_rejects_blank_name() {
        init_for_tests();
        let response = add_place("   ".to_string(), None, 0.0, 0.0);
        assert!(!response.ok);
        assert!(response.message.contains("blank"));
    }

    #[test]
    fn update_unknown_place_is_a_silent_noop() {
        init_for_tests();
        let response = update_place(
            "no-such-id".to_string(),
            Some("Ghost".to_string()),
            None,
        );
        assert!(response.ok);
        assert!(response.place.is_none());
        assert!(response.message.contains("nothing changed"));
    }

    #[test]
    fn region_catalog_lists_five_regions() {
        init_for_tests();
        let response = list_regions();
        assert_eq!(response.regions.len(), 5);
        assert_eq!(response.storage_capacity_mb, 5000.0);
        assert!(response.regions.iter().all(|region| !region.name.is_empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn download_then_delete_region_roundtrip() {
        init_for_tests();

        let downloaded = download_region("sydney".to_string()).await;
        assert!(downloaded.ok, "{}", downloaded.message);
        assert_eq!(downloaded.resolution.as_deref(), Some("downloaded"));
        assert!(downloaded.storage_usage_mb >= 190.0);

        let listed = list_regions();
        let sydney = listed
            .regions
            .iter()
            .find(|region| region.id == "sydney")
            .expect("sydney should be in the catalog");
        assert!(sydney.downloaded);

        let deleted = delete_region("sydney".to_string());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.resolution.as_deref(), Some("deleted"));

        let deleted_again = delete_region("sydney".to_string());
        assert!(deleted_again.ok);
        assert_eq!(deleted_again.resolution.as_deref(), Some("not_downloaded"));
    }

    #[tokio::test(start_paused = true)]
    async fn download_unknown_region_fails() {
        init_for_tests();
        let response = download_region("atlantis".to_string()).await;
        assert!(!response.ok);
        assert!(response.message.contains("unknown map region"));
    }

    #[test]
    fn location_flow_reports_tri_state() {
        init_for_tests();

        assert_eq!(current_location().status, "acquiring");

        let error = publish_location_fix(35.6762, 139.6503);
        assert!(error.is_empty(), "{error}");
        let available = current_location();
        assert_eq!(available.status, "available");
        assert_eq!(available.lat, Some(35.6762));
        assert_eq!(available.lng, Some(139.6503));

        let error = publish_location_unavailable("permission denied".to_string());
        assert!(error.is_empty(), "{error}");
        let unavailable = current_location();
        assert_eq!(unavailable.status, "unavailable");
        assert_eq!(unavailable.reason.as_deref(), Some("permission denied"));
    }

    #[test]
    fn map_markers_project_relative_to_center() {
        init_for_tests();

        let name = unique_token("marker");
        let created = add_place(name, None, 10.01, 20.02);
        assert!(created.ok, "{}", created.message);
        let id = created.place.expect("place should be returned").id;

        let response = map_markers(10.0, 20.0);
        let marker = response
            .markers
            .iter()
            .find(|marker| marker.place.id == id)
            .expect("marker for the added place");
        assert!((marker.offset_x - 10.0).abs() < 1e-9);
        assert!((marker.offset_y - -5.0).abs() < 1e-9);
    }
}
