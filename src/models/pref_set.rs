//! Typed display settings applied onto a target profile.
//!
//! [`PrefSetSettings`] covers the root font fields plus the `CurrentPrefSet`
//! subtree of a profile. Values are range-checked by
//! [`PrefSetSettings::validate`] before anything is written.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// A settings value outside its allowed range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Numeric field outside its inclusive range
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// Field name as written in the profile
        field: String,
        /// Rejected value
        value: i64,
        /// Lowest accepted value
        min: i64,
        /// Highest accepted value
        max: i64,
    },
}

fn check(field: &str, value: i32, range: RangeInclusive<i32>) -> Result<(), SettingsError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field: field.to_string(),
            value: i64::from(value),
            min: i64::from(*range.start()),
            max: i64::from(*range.end()),
        })
    }
}

/// Brightness levels for each display element, 0-100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessSettings {
    /// Control bar
    pub dcb: i32,
    /// Scope background
    pub background: i32,
    /// Map group A
    pub map_a: i32,
    /// Map group B
    pub map_b: i32,
    /// Full data blocks
    pub full_data_blocks: i32,
    /// Lists
    pub lists: i32,
    /// Position symbols
    pub position_symbols: i32,
    /// Limited data blocks
    pub limited_data_blocks: i32,
    /// Other facilities' full data blocks
    pub other_fdbs: i32,
    /// Tools
    pub tools: i32,
    /// Range rings
    pub range_rings: i32,
    /// Compass rose
    pub compass: i32,
    /// Beacon targets
    pub beacon_targets: i32,
    /// Primary targets
    pub primary_targets: i32,
    /// History trails
    pub history: i32,
    /// Weather overlay
    pub weather: i32,
    /// Weather contrast
    pub weather_contrast: i32,
}

impl Default for BrightnessSettings {
    fn default() -> Self {
        Self {
            dcb: 100,
            background: 100,
            map_a: 100,
            map_b: 100,
            full_data_blocks: 100,
            lists: 100,
            position_symbols: 100,
            limited_data_blocks: 100,
            other_fdbs: 100,
            tools: 100,
            range_rings: 100,
            compass: 0,
            beacon_targets: 100,
            primary_targets: 100,
            history: 100,
            weather: 30,
            weather_contrast: 100,
        }
    }
}

impl BrightnessSettings {
    /// Element names and values, in the order they are written.
    pub fn fields(&self) -> [(&'static str, i32); 17] {
        [
            ("DCB", self.dcb),
            ("Background", self.background),
            ("MapA", self.map_a),
            ("MapB", self.map_b),
            ("FullDataBlocks", self.full_data_blocks),
            ("Lists", self.lists),
            ("PositionSymbols", self.position_symbols),
            ("LimitedDataBlocks", self.limited_data_blocks),
            ("OtherFDBs", self.other_fdbs),
            ("Tools", self.tools),
            ("RangeRings", self.range_rings),
            ("Compass", self.compass),
            ("BeaconTargets", self.beacon_targets),
            ("PrimaryTargets", self.primary_targets),
            ("History", self.history),
            ("Weather", self.weather),
            ("WeatherContrast", self.weather_contrast),
        ]
    }

    /// Mutable slot for the element `name`, if it is a known brightness field.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut i32> {
        let slot = match name {
            "DCB" => &mut self.dcb,
            "Background" => &mut self.background,
            "MapA" => &mut self.map_a,
            "MapB" => &mut self.map_b,
            "FullDataBlocks" => &mut self.full_data_blocks,
            "Lists" => &mut self.lists,
            "PositionSymbols" => &mut self.position_symbols,
            "LimitedDataBlocks" => &mut self.limited_data_blocks,
            "OtherFDBs" => &mut self.other_fdbs,
            "Tools" => &mut self.tools,
            "RangeRings" => &mut self.range_rings,
            "Compass" => &mut self.compass,
            "BeaconTargets" => &mut self.beacon_targets,
            "PrimaryTargets" => &mut self.primary_targets,
            "History" => &mut self.history,
            "Weather" => &mut self.weather,
            "WeatherContrast" => &mut self.weather_contrast,
            _ => return None,
        };
        Some(slot)
    }

    /// Checks every level is within 0-100.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in self.fields() {
            check(&format!("Brightness.{name}"), value, 0..=100)?;
        }
        Ok(())
    }
}

/// Font, scope, and track-display settings for a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefSetSettings {
    /// Scope font family
    pub font_name: String,
    /// Scope font size
    pub font_size: i32,
    /// Scope font size unit
    pub font_size_unit: String,
    /// Control bar font family
    pub dcb_font_name: String,
    /// Control bar font size
    pub dcb_font_size: i32,
    /// Control bar font size unit
    pub dcb_font_size_unit: String,

    /// Screen center latitude
    pub screen_center_lat: f64,
    /// Screen center longitude
    pub screen_center_lon: f64,
    /// Preview area X
    pub preview_area_x: i32,
    /// Preview area Y
    pub preview_area_y: i32,
    /// Status area X
    pub status_area_x: i32,
    /// Status area Y
    pub status_area_y: i32,

    /// Whether range rings are drawn
    pub range_rings_displayed: bool,
    /// Range ring center latitude
    pub range_ring_lat: f64,
    /// Range ring center longitude
    pub range_ring_lon: f64,
    /// Distance between rings in nautical miles
    pub range_ring_spacing: i32,
    /// Whether rings follow the screen center
    pub range_rings_centered: bool,

    /// Control bar position ("Top", "Bottom", ...)
    pub dcb_location: String,
    /// Owned data block position
    pub owned_data_block_position: String,
    /// Unowned data block position
    pub unowned_data_block_position: String,
    /// Unassociated data block position
    pub unassociated_data_block_position: String,
    /// Whether the control bar is visible
    pub dcb_visible: bool,

    /// Whether the scope is centered on the screen center point
    pub scope_centered: bool,
    /// Display range in nautical miles
    pub range: i32,

    /// Predicted track line length in minutes
    pub ptl_length: i32,
    /// Predicted track lines on owned tracks
    pub ptl_own: bool,
    /// Predicted track lines on all tracks
    pub ptl_all: bool,

    /// History trail count
    pub history_num: i32,
    /// History trail rate in seconds
    pub history_rate: f64,
    /// Leader line length
    pub leader_length: i32,

    /// Associated altitude filter ceiling
    pub altitude_filter_associated_max: i32,
    /// Associated altitude filter floor
    pub altitude_filter_associated_min: i32,
    /// Unassociated altitude filter ceiling
    pub altitude_filter_unassociated_max: i32,
    /// Unassociated altitude filter floor
    pub altitude_filter_unassociated_min: i32,

    /// Per-element brightness
    pub brightness: BrightnessSettings,
}

impl Default for PrefSetSettings {
    fn default() -> Self {
        Self {
            font_name: "FixedDemiBold".to_string(),
            font_size: 10,
            font_size_unit: "Point".to_string(),
            dcb_font_name: "Consolas".to_string(),
            dcb_font_size: 10,
            dcb_font_size_unit: "Point".to_string(),
            screen_center_lat: 40.1967,
            screen_center_lon: -76.7589,
            preview_area_x: 0,
            preview_area_y: 0,
            status_area_x: 0,
            status_area_y: 0,
            range_rings_displayed: false,
            range_ring_lat: 40.1967,
            range_ring_lon: -76.7589,
            range_ring_spacing: 5,
            range_rings_centered: true,
            dcb_location: "Top".to_string(),
            owned_data_block_position: "N".to_string(),
            unowned_data_block_position: "N".to_string(),
            unassociated_data_block_position: "N".to_string(),
            dcb_visible: true,
            scope_centered: false,
            range: 50,
            ptl_length: 1,
            ptl_own: true,
            ptl_all: false,
            history_num: 5,
            history_rate: 4.5,
            leader_length: 1,
            altitude_filter_associated_max: 99_900,
            altitude_filter_associated_min: -9_900,
            altitude_filter_unassociated_max: 99_900,
            altitude_filter_unassociated_min: -9_900,
            brightness: BrightnessSettings::default(),
        }
    }
}

impl PrefSetSettings {
    /// Checks every numeric field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first field found out of range:
    /// - font sizes 4-72
    /// - range 1-250
    /// - history count, PTL length, leader length 0-10
    /// - range ring spacing 1-50
    /// - brightness levels 0-100
    pub fn validate(&self) -> Result<(), SettingsError> {
        check("FontSize", self.font_size, 4..=72)?;
        check("DCBFontSize", self.dcb_font_size, 4..=72)?;
        check("Range", self.range, 1..=250)?;
        check("HistoryNum", self.history_num, 0..=10)?;
        check("PTLLength", self.ptl_length, 0..=10)?;
        check("LeaderLength", self.leader_length, 0..=10)?;
        check("RangeRingSpacing", self.range_ring_spacing, 1..=50)?;
        self.brightness.validate()
    }
}
