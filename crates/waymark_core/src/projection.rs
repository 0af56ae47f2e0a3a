//! Map projection engine.
//!
//! # Responsibility
//! - Convert geographic deltas into screen pixel offsets for marker
//!   placement.
//!
//! # Invariants
//! - Pure and deterministic: same inputs always produce the same offsets.
//! - No clamping; points far from the reference project to off-screen
//!   offsets, which are valid results.

use crate::model::place::{Coordinates, SavedPlace};

/// Linear projection scales in pixels per decimal degree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapScale {
    pub lat_pixels_per_degree: f64,
    pub lng_pixels_per_degree: f64,
}

impl Default for MapScale {
    fn default() -> Self {
        Self {
            lat_pixels_per_degree: 500.0,
            lng_pixels_per_degree: 500.0,
        }
    }
}

/// Screen-space offset from the viewport center, in pixels.
///
/// `x` grows to the right, `y` grows downward, so a target north of the
/// reference has a negative `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelOffset {
    pub x: f64,
    pub y: f64,
}

/// One saved place positioned relative to the viewport center.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceMarker<'a> {
    pub place: &'a SavedPlace,
    pub offset: PixelOffset,
}

/// Projects `target` into a pixel offset relative to `reference`.
pub fn project_offset(reference: Coordinates, target: Coordinates, scale: MapScale) -> PixelOffset {
    PixelOffset {
        x: (target.lng - reference.lng) * scale.lng_pixels_per_degree,
        y: -(target.lat - reference.lat) * scale.lat_pixels_per_degree,
    }
}

/// Positions every saved place relative to `reference`, in input order.
///
/// This is the per-render marker-placement pass; it allocates one marker
/// per place and never filters.
pub fn place_markers<'a>(
    reference: Coordinates,
    places: &'a [SavedPlace],
    scale: MapScale,
) -> Vec<PlaceMarker<'a>> {
    places
        .iter()
        .map(|place| PlaceMarker {
            place,
            offset: project_offset(reference, place.coordinates, scale),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{place_markers, project_offset, Coordinates, MapScale, PixelOffset};
    use crate::model::place::{generate_place_id, SavedPlace};

    const CENTER: Coordinates = Coordinates {
        lat: 37.7749,
        lng: -122.4194,
    };

    fn place_at(lat: f64, lng: f64) -> SavedPlace {
        SavedPlace {
            id: generate_place_id(),
            name: "somewhere".to_string(),
            notes: None,
            coordinates: Coordinates { lat, lng },
        }
    }

    #[test]
    fn reference_point_projects_to_origin() {
        let offset = project_offset(CENTER, CENTER, MapScale::default());
        assert_eq!(offset, PixelOffset { x: 0.0, y: 0.0 });
    }

    #[test]
    fn one_degree_deltas_project_to_the_scale_constants() {
        let reference = Coordinates { lat: 10.0, lng: 20.0 };

        let north = Coordinates { lat: 11.0, lng: 20.0 };
        assert_eq!(
            project_offset(reference, north, MapScale::default()),
            PixelOffset { x: 0.0, y: -500.0 }
        );

        let east = Coordinates { lat: 10.0, lng: 21.0 };
        assert_eq!(
            project_offset(reference, east, MapScale::default()),
            PixelOffset { x: 500.0, y: 0.0 }
        );
    }

    #[test]
    fn north_east_target_moves_up_and_right() {
        let target = Coordinates {
            lat: CENTER.lat + 0.1,
            lng: CENTER.lng + 0.2,
        };
        let offset = project_offset(CENTER, target, MapScale::default());
        assert!((offset.x - 100.0).abs() < 1e-9);
        assert!((offset.y - -50.0).abs() < 1e-9);
    }

    #[test]
    fn far_targets_are_not_clamped() {
        let tokyo = Coordinates {
            lat: 35.6762,
            lng: 139.6503,
        };
        let offset = project_offset(CENTER, tokyo, MapScale::default());
        assert!(offset.x > 100_000.0);
        assert!(offset.y > 500.0);
    }

    #[test]
    fn asymmetric_scales_apply_per_axis() {
        let scale = MapScale {
            lat_pixels_per_degree: 100.0,
            lng_pixels_per_degree: 400.0,
        };
        let target = Coordinates {
            lat: CENTER.lat - 0.5,
            lng: CENTER.lng + 0.25,
        };
        let offset = project_offset(CENTER, target, scale);
        assert!((offset.x - 100.0).abs() < 1e-9);
        assert!((offset.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn markers_keep_input_order_and_count() {
        let places = vec![
            place_at(CENTER.lat, CENTER.lng),
            place_at(CENTER.lat + 0.01, CENTER.lng),
            place_at(CENTER.lat, CENTER.lng - 0.01),
        ];

        let markers = place_markers(CENTER, &places, MapScale::default());
        assert_eq!(markers.len(), places.len());
        assert_eq!(markers[0].offset, PixelOffset { x: 0.0, y: 0.0 });
        assert!((markers[1].offset.y - -5.0).abs() < 1e-9);
        assert!((markers[2].offset.x - -5.0).abs() < 1e-9);
        for (marker, place) in markers.iter().zip(places.iter()) {
            assert_eq!(marker.place.id, place.id);
        }
    }
}
