//! Radar-scope profile document model.
//!
//! A [`TargetProfile`] keeps the whole parsed document so that edits can be
//! written back without losing nodes the tool does not understand. The flat
//! settings bag and the typed fields are read-only views taken at load time.

use crate::models::defaults::{WindowLocation, WindowSize};
use crate::models::pref_set::PrefSetSettings;
use crate::models::source::Coordinate;
use crate::parser::xml_tree::XmlElement;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One `VideoMapFiles/VideoMapFile` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VideoMapFileEntry {
    /// Path of the map layer file
    pub filepath: String,
    /// Map number referenced by the control bar list
    pub map_number: u32,
    /// Short name
    pub short_name: Option<String>,
    /// Full name
    pub full_name: Option<String>,
    /// Brightness group tag
    pub brightness_group: Option<String>,
    /// 1-based control bar button label
    pub dcb_button: Option<String>,
}

/// Typed view of well-known root settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DisplaySettings {
    /// Scope font family
    pub font_name: Option<String>,
    /// Scope font size
    pub font_size: Option<i32>,
    /// Background color (packed ARGB)
    pub back_color: Option<i64>,
    /// Range ring color
    pub range_ring_color: Option<i64>,
    /// Map line color
    pub video_map_line_color: Option<i64>,
    /// Primary return color
    pub return_color: Option<i64>,
    /// Beacon color
    pub beacon_color: Option<i64>,
    /// Data block color
    pub data_block_color: Option<i64>,
    /// Screen rotation in degrees
    pub screen_rotation: Option<i32>,
    /// Target fade time
    pub fade_time: Option<i32>,
    /// Seconds before a lost target is dropped
    pub lost_target_seconds: Option<i32>,
    /// Aircraft cleanup interval
    pub aircraft_gc_interval: Option<i32>,
    /// Altitude ceiling
    pub max_altitude: Option<i32>,
    /// Altitude floor
    pub min_altitude: Option<i32>,
    /// Range rings shown
    pub show_range_rings: Option<bool>,
    /// ATPA active
    pub atpa_active: Option<bool>,
    /// Window state ("Normal", "Maximized", ...)
    pub window_state: Option<String>,
    /// Vertical sync
    pub vsync: Option<bool>,
    /// Frame rate cap
    pub target_frame_rate: Option<i32>,
}

/// A loaded or generated radar-scope profile.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetProfile {
    /// Profile name (file stem)
    pub name: String,
    /// File the profile lives in
    pub path: Option<PathBuf>,
    /// Every top-level scalar node, as text
    pub settings: BTreeMap<String, String>,
    /// Typed root settings
    pub display: DisplaySettings,
    /// Home location
    pub home: Option<Coordinate>,
    /// Window size
    pub window_size: Option<WindowSize>,
    /// Window location
    pub window_location: Option<WindowLocation>,
    /// Single-file map reference used by older profiles
    pub legacy_video_map: Option<String>,
    /// Map layer entries
    pub video_map_files: Vec<VideoMapFileEntry>,
    /// Control bar map numbers, by slot
    pub dcb_map_list: Vec<u32>,
    /// Altimeter station codes
    pub altimeter_stations: Vec<String>,
    /// Current preference set, read with defaults for missing fields
    pub pref_set: Option<PrefSetSettings>,
    /// The full document
    pub document: XmlElement,
}

impl TargetProfile {
    /// Map entry number assigned to the control bar slot, if any.
    pub fn map_in_slot(&self, slot: usize) -> Option<&VideoMapFileEntry> {
        let number = *self.dcb_map_list.get(slot)?;
        if number == 0 {
            return None;
        }
        self.video_map_files.iter().find(|m| m.map_number == number)
    }
}
