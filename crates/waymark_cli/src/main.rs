//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `waymark_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use waymark_core::{
    project_offset, region_catalog, Coordinates, MapScale, PlaceDraft, SavedPlaceRegistry,
    SqliteCollectionStore,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("waymark_core ping={}", waymark_core::ping());
    println!("waymark_core version={}", waymark_core::core_version());

    let catalog = region_catalog();
    println!("regions={}", catalog.len());
    for region in catalog {
        println!("  {} ({}, {} MB)", region.id, region.name, region.size_mb);
    }

    let store = SqliteCollectionStore::open_in_memory()?;
    let mut places = SavedPlaceRegistry::load(store);
    let pier = places.add(PlaceDraft::new(
        "Pier 39",
        Coordinates {
            lat: 37.8087,
            lng: -122.4098,
        },
    ))?;
    println!("saved places={}", places.len());

    let center = Coordinates {
        lat: 37.7749,
        lng: -122.4194,
    };
    let offset = project_offset(center, pier.coordinates, MapScale::default());
    println!("{} offset x={:.1} y={:.1}", pier.name, offset.x, offset.y);

    Ok(())
}
