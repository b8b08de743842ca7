//! Service layer for business logic.
//!
//! Reference-table lookups, profile file I/O, map asset handling, and the
//! generation engine that ties them together.

pub mod airports;
pub mod generator;
pub mod profiles;
pub mod stations;
pub mod video_maps;

// Re-export commonly used types and functions
pub use airports::AirportResolver;
pub use generator::{maps_for_area, GeneratedProfile, GenerationRequest, ProfileGenerator};
pub use profiles::{ProfileFolder, ProfileService};
pub use stations::{Station, StationKind, StationLocator};
pub use video_maps::merge_geojson_files;
