//! Data models for source facility documents and radar-scope profiles.
//!
//! This module contains the core data structures used throughout the application.
//! Models are independent of file formats; parsing lives in [`crate::parser`].

pub mod defaults;
pub mod pref_set;
pub mod source;
pub mod target;

// Re-export all model types
pub use defaults::{ProfileDefaults, WindowLocation, WindowSize};
pub use pref_set::{BrightnessSettings, PrefSetSettings, SettingsError};
pub use source::{
    is_controlled_type, Area, ButtonAssignment, ControlledFacility, Coordinate, SourceProfile,
    VideoMapDescriptor, CONTROLLED_FACILITY_KEYWORDS,
};
pub use target::{DisplaySettings, TargetProfile, VideoMapFileEntry};
