//! Offline map region model.
//!
//! Regions are catalog entries, not user data: the set of downloadable
//! regions ships with the build, so the types borrow their text from
//! static catalog storage.

/// Inclusive latitude/longitude bounding box, `[min, max]` per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub lat: [f64; 2],
    pub lng: [f64; 2],
}

impl RegionBounds {
    /// Returns whether the point lies inside the box, edges included.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.lat[0] && lat <= self.lat[1] && lng >= self.lng[0] && lng <= self.lng[1]
    }
}

/// One downloadable map region from the built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub id: &'static str,
    pub name: &'static str,
    /// Nominal download size used for storage accounting.
    pub size_mb: f64,
    pub bounds: RegionBounds,
}

#[cfg(test)]
mod tests {
    use super::RegionBounds;

    #[test]
    fn bounds_include_edges() {
        let bounds = RegionBounds {
            lat: [37.7, 37.8],
            lng: [-122.5, -122.3],
        };
        assert!(bounds.contains(37.7, -122.5));
        assert!(bounds.contains(37.8, -122.3));
        assert!(bounds.contains(37.75, -122.4));
        assert!(!bounds.contains(37.69, -122.4));
        assert!(!bounds.contains(37.75, -122.2));
    }
}
