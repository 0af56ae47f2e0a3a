//! Saved-place registry.
//!
//! # Responsibility
//! - Provide stable CRUD entry points over the persisted saved-place
//!   collection.
//! - Enforce model validation before any mutation is persisted.
//!
//! # Invariants
//! - Mutations persist the whole collection before the mirror changes;
//!   a failed save leaves the mirror at the previous state.
//! - Updating or removing an id that does not exist is a no-op that
//!   triggers no persistence.

use crate::model::place::{
    generate_place_id, normalize_notes, PlaceDraft, PlacePatch, PlaceValidationError, SavedPlace,
};
use crate::store::{CollectionStore, StoreError};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Well-known collection key for the saved-place document.
const STORAGE_KEY: &str = "savedPlacesData";

pub type PlacesResult<T> = Result<T, PlaceRegistryError>;

/// Error for saved-place registry operations.
#[derive(Debug)]
pub enum PlaceRegistryError {
    Validation(PlaceValidationError),
    Store(StoreError),
}

impl Display for PlaceRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlaceRegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<PlaceValidationError> for PlaceRegistryError {
    fn from(value: PlaceValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for PlaceRegistryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// In-memory owner of the saved-place collection.
pub struct SavedPlaceRegistry<S: CollectionStore> {
    store: S,
    places: Vec<SavedPlace>,
}

impl<S: CollectionStore> SavedPlaceRegistry<S> {
    /// Loads the persisted collection into memory.
    ///
    /// Absent or unreadable data starts the registry empty; the store logs
    /// the reason.
    pub fn load(store: S) -> Self {
        let places: Vec<SavedPlace> = store.load(STORAGE_KEY).unwrap_or_default();
        info!(
            "event=places_load module=places status=ok count={}",
            places.len()
        );
        Self { store, places }
    }

    /// All saved places in insertion order.
    pub fn list(&self) -> &[SavedPlace] {
        &self.places
    }

    /// Looks up one place by id.
    pub fn get(&self, id: &str) -> Option<&SavedPlace> {
        self.places.iter().find(|place| place.id == id)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Validates the draft, assigns a fresh id and persists the grown
    /// collection.
    ///
    /// Returns the stored record, including the generated id and
    /// normalized notes.
    pub fn add(&mut self, draft: PlaceDraft) -> PlacesResult<SavedPlace> {
        draft.validate()?;

        let place = SavedPlace {
            id: generate_place_id(),
            name: draft.name,
            notes: normalize_notes(draft.notes),
            coordinates: draft.coordinates,
        };

        self.places.push(place.clone());
        if let Err(err) = self.persist() {
            self.places.pop();
            error!("event=place_add module=places status=rollback error={err}");
            return Err(err.into());
        }

        Ok(place)
    }

    /// Merges the patch into the place with `id` and persists the result.
    ///
    /// Returns `Ok(false)` without persisting when the id is unknown;
    /// concurrent removal must not resurrect records through updates.
    pub fn update(&mut self, id: &str, patch: &PlacePatch) -> PlacesResult<bool> {
        patch.validate()?;

        let Some(index) = self.places.iter().position(|place| place.id == id) else {
            debug!("event=place_update module=places status=skip reason=not_found");
            return Ok(false);
        };

        if patch.is_empty() {
            return Ok(true);
        }

        let previous = self.places[index].clone();
        patch.apply_to(&mut self.places[index]);
        if let Err(err) = self.persist() {
            self.places[index] = previous;
            error!("event=place_update module=places status=rollback error={err}");
            return Err(err.into());
        }

        Ok(true)
    }

    /// Removes the place with `id` and persists the shrunk collection.
    ///
    /// Returns `Ok(false)` without persisting when the id is unknown.
    pub fn remove(&mut self, id: &str) -> PlacesResult<bool> {
        let Some(index) = self.places.iter().position(|place| place.id == id) else {
            debug!("event=place_remove module=places status=skip reason=not_found");
            return Ok(false);
        };

        let removed = self.places.remove(index);
        if let Err(err) = self.persist() {
            self.places.insert(index, removed);
            error!("event=place_remove module=places status=rollback error={err}");
            return Err(err.into());
        }

        Ok(true)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store.save(STORAGE_KEY, &self.places)
    }
}
