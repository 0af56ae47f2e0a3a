//! Saved-place domain model.
//!
//! # Responsibility
//! - Define the persisted record for user-saved geographic points.
//! - Provide draft/patch input shapes with validation and normalization.
//!
//! # Invariants
//! - `id` is opaque, unique within the collection and stable for the record
//!   lifetime; legacy data may carry timestamp-derived ids, newly generated
//!   ids are UUIDv4 strings.
//! - `coordinates` never change after creation; patches cover name/notes
//!   only.
//! - Blank notes are stored as absent, not as empty strings.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Geographic coordinate pair in decimal degrees.
///
/// No range validation is applied; out-of-range values pass through
/// unchanged and render off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Persisted record for one user-saved place.
///
/// The serde shape of this struct is the wire contract for the
/// `savedPlacesData` collection: `{ id, name, notes?, coordinates }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlace {
    /// Opaque unique id in string form.
    pub id: String,
    /// Display name, non-blank.
    pub name: String,
    /// Optional free-form notes; absent when blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Saved position; immutable after creation.
    pub coordinates: Coordinates,
}

/// Input shape for creating a place; the registry assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDraft {
    pub name: String,
    pub notes: Option<String>,
    pub coordinates: Coordinates,
}

impl PlaceDraft {
    /// Creates a draft without notes.
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: name.into(),
            notes: None,
            coordinates,
        }
    }

    /// Returns the draft with notes attached.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validates draft fields before persistence.
    ///
    /// # Errors
    /// - [`PlaceValidationError::BlankName`] when the name is empty after
    ///   trimming.
    pub fn validate(&self) -> Result<(), PlaceValidationError> {
        validate_name(&self.name)
    }
}

/// Partial update for one place; `None` fields keep the current value.
///
/// Setting `notes` to a blank string clears the stored notes (notes
/// normalization), so no nested option is needed to express removal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacePatch {
    pub name: Option<String>,
    pub notes: Option<String>,
}

impl PlacePatch {
    /// Patch that renames the place and leaves notes untouched.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            notes: None,
        }
    }

    /// Patch that replaces the notes and leaves the name untouched.
    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            name: None,
            notes: Some(notes.into()),
        }
    }

    /// Validates patch fields before they are merged.
    ///
    /// # Errors
    /// - [`PlaceValidationError::BlankName`] when a new name is present but
    ///   empty after trimming.
    pub fn validate(&self) -> Result<(), PlaceValidationError> {
        match self.name.as_deref() {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }

    /// Merges the patch into `place`. Coordinates and id are never touched.
    pub fn apply_to(&self, place: &mut SavedPlace) {
        if let Some(name) = &self.name {
            place.name = name.clone();
        }
        if let Some(notes) = &self.notes {
            place.notes = normalize_notes(Some(notes.clone()));
        }
    }

    /// Returns whether the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.notes.is_none()
    }
}

/// Validation error for place drafts and patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceValidationError {
    /// Name is empty or whitespace-only.
    BlankName,
}

impl Display for PlaceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "place name must not be blank"),
        }
    }
}

impl Error for PlaceValidationError {}

/// Generates a fresh opaque place id.
///
/// UUIDv4 keeps ids collision-free under rapid successive calls, unlike the
/// wall-clock timestamp strings found in legacy data.
pub fn generate_place_id() -> String {
    Uuid::new_v4().to_string()
}

/// Normalizes optional notes: trims whitespace, maps blank to absent.
pub fn normalize_notes(notes: Option<String>) -> Option<String> {
    let notes = notes?;
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == notes.len() {
        Some(notes)
    } else {
        Some(trimmed.to_string())
    }
}

fn validate_name(name: &str) -> Result<(), PlaceValidationError> {
    if name.trim().is_empty() {
        return Err(PlaceValidationError::BlankName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        generate_place_id, normalize_notes, Coordinates, PlaceDraft, PlacePatch,
        PlaceValidationError, SavedPlace,
    };

    fn sample_place() -> SavedPlace {
        SavedPlace {
            id: generate_place_id(),
            name: "Ferry Building".to_string(),
            notes: Some("good coffee".to_string()),
            coordinates: Coordinates {
                lat: 37.7955,
                lng: -122.3937,
            },
        }
    }

    #[test]
    fn generated_ids_are_unique_and_non_empty() {
        let first = generate_place_id();
        let second = generate_place_id();
        assert!(!first.is_empty());
        assert_ne!(first, second);
    }

    #[test]
    fn draft_validation_rejects_blank_name() {
        let draft = PlaceDraft::new("   ", Coordinates { lat: 0.0, lng: 0.0 });
        assert_eq!(draft.validate(), Err(PlaceValidationError::BlankName));
    }

    #[test]
    fn patch_validation_accepts_absent_name() {
        assert_eq!(PlacePatch::notes("x").validate(), Ok(()));
        assert_eq!(
            PlacePatch::rename(" ").validate(),
            Err(PlaceValidationError::BlankName)
        );
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut place = sample_place();
        let original_coordinates = place.coordinates;

        PlacePatch::rename("Pier 1").apply_to(&mut place);
        assert_eq!(place.name, "Pier 1");
        assert_eq!(place.notes.as_deref(), Some("good coffee"));
        assert_eq!(place.coordinates, original_coordinates);
    }

    #[test]
    fn patch_with_blank_notes_clears_them() {
        let mut place = sample_place();
        PlacePatch::notes("   ").apply_to(&mut place);
        assert_eq!(place.notes, None);
    }

    #[test]
    fn normalize_notes_trims_and_drops_blank() {
        assert_eq!(normalize_notes(None), None);
        assert_eq!(normalize_notes(Some("  ".to_string())), None);
        assert_eq!(
            normalize_notes(Some("  kept  ".to_string())),
            Some("kept".to_string())
        );
        assert_eq!(
            normalize_notes(Some("unchanged".to_string())),
            Some("unchanged".to_string())
        );
    }

    #[test]
    fn saved_place_serde_shape_matches_wire_contract() {
        let place = SavedPlace {
            id: "2024-01-01T00:00:00.000Z".to_string(),
            name: "Home".to_string(),
            notes: None,
            coordinates: Coordinates { lat: 1.5, lng: -2.5 },
        };

        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "2024-01-01T00:00:00.000Z",
                "name": "Home",
                "coordinates": { "lat": 1.5, "lng": -2.5 }
            })
        );

        let parsed: SavedPlace = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, place);
    }
}
