//! Reading and editing radar-scope profile documents.
//!
//! All edits are set-or-create: an existing node is updated where it sits,
//! a missing one is appended to its parent. Nothing the tool does not know
//! about is removed.

use crate::constants::DCB_SLOT_COUNT;
use crate::models::defaults::{WindowLocation, WindowSize};
use crate::models::pref_set::{PrefSetSettings, SettingsError};
use crate::models::source::Coordinate;
use crate::models::target::{DisplaySettings, TargetProfile, VideoMapFileEntry};
use crate::parser::xml_tree::XmlElement;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Complex root nodes that still go into the flat settings bag.
pub const SETTINGS_BAG_ALLOW_LIST: [&str; 3] = ["HomeLocation", "WindowLocation", "WindowSize"];

/// Rewrites legacy `DBCFont*` element names to their `DCBFont*` spelling.
pub fn patch_legacy_names(xml: &str) -> String {
    xml.replace("<DBCFontName>", "<DCBFontName>")
        .replace("</DBCFontName>", "</DCBFontName>")
        .replace("<DBCFontSize>", "<DCBFontSize>")
        .replace("</DBCFontSize>", "</DCBFontSize>")
}

#[allow(clippy::cast_possible_truncation)]
fn parse_int(text: &str) -> Option<i32> {
    let text = text.trim();
    text.parse().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.abs() <= f64::from(i32::MAX))
            .map(|v| v.round() as i32)
    })
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn child_int(node: &XmlElement, name: &str) -> Option<i32> {
    node.child_text(name).and_then(parse_int)
}

fn child_f64(node: &XmlElement, name: &str) -> Option<f64> {
    node.child_text(name).and_then(|t| t.trim().parse().ok())
}

fn child_bool(node: &XmlElement, name: &str) -> Option<bool> {
    node.child_text(name).and_then(parse_bool)
}

fn child_string(node: &XmlElement, name: &str) -> Option<String> {
    node.child_text(name).map(str::to_string)
}

/// Reads a `Latitude`/`Longitude` pair under `node`.
pub fn read_coordinate(node: &XmlElement) -> Option<Coordinate> {
    Coordinate::from_parts(child_f64(node, "Latitude"), child_f64(node, "Longitude"))
}

/// Writes a `Latitude`/`Longitude` pair with 7 decimals under `parent/name`.
pub fn write_coordinate(parent: &mut XmlElement, name: &str, coordinate: Coordinate) {
    let node = parent.ensure_child(name);
    node.set_or_create("Latitude", format!("{:.7}", coordinate.lat));
    node.set_or_create("Longitude", format!("{:.7}", coordinate.lon));
}

/// Builds the profile view of a parsed document.
pub fn read_target_profile(name: &str, path: Option<PathBuf>, document: XmlElement) -> TargetProfile {
    let root = &document;

    let mut settings = BTreeMap::new();
    for child in &root.children {
        if child.is_scalar() || SETTINGS_BAG_ALLOW_LIST.contains(&child.name.as_str()) {
            settings.insert(child.name.clone(), child.text_content());
        }
    }

    let color = |name: &str| root.child_text(name).and_then(|t| t.trim().parse::<i64>().ok());
    let display = DisplaySettings {
        font_name: child_string(root, "FontName"),
        font_size: child_int(root, "FontSize"),
        back_color: color("BackColor"),
        range_ring_color: color("RangeRingColor"),
        video_map_line_color: color("VideoMapLineColor"),
        return_color: color("ReturnColor"),
        beacon_color: color("BeaconColor"),
        data_block_color: color("DataBlockColor"),
        screen_rotation: child_int(root, "ScreenRotation"),
        fade_time: child_int(root, "FadeTime"),
        lost_target_seconds: child_int(root, "LostTargetSeconds"),
        aircraft_gc_interval: child_int(root, "AircraftGCInterval"),
        max_altitude: child_int(root, "MaxAltitude"),
        min_altitude: child_int(root, "MinAltitude"),
        show_range_rings: child_bool(root, "ShowRangeRings"),
        atpa_active: child_bool(root, "ATPAActive"),
        window_state: child_string(root, "WindowState"),
        vsync: child_bool(root, "VSync"),
        target_frame_rate: child_int(root, "TargetFrameRate"),
    };

    let window_size = root.child("WindowSize").and_then(|n| {
        Some(WindowSize {
            width: child_int(n, "Width")?,
            height: child_int(n, "Height")?,
        })
    });
    let window_location = root.child("WindowLocation").and_then(|n| {
        Some(WindowLocation {
            x: child_int(n, "X")?,
            y: child_int(n, "Y")?,
        })
    });

    let video_map_files = root
        .child("VideoMapFiles")
        .map(|list| list.children_named("VideoMapFile").map(read_video_map_file).collect())
        .unwrap_or_default();

    let dcb_map_list = root
        .descend(&["TCP", "DCBMapList"])
        .map(|list| {
            list.children_named("int")
                .map(|n| n.text.as_deref().and_then(|t| t.trim().parse().ok()).unwrap_or(0))
                .collect()
        })
        .unwrap_or_default();

    let altimeter_stations = root
        .child("AltimeterStations")
        .map(|list| {
            list.children_named("string")
                .filter_map(|n| n.text.clone())
                .collect()
        })
        .unwrap_or_default();

    TargetProfile {
        name: name.to_string(),
        path,
        settings,
        display,
        home: root.child("HomeLocation").and_then(read_coordinate),
        window_size,
        window_location,
        legacy_video_map: child_string(root, "VideoMapFilename").filter(|s| !s.is_empty()),
        video_map_files,
        dcb_map_list,
        altimeter_stations,
        pref_set: read_pref_set(root),
        document,
    }
}

fn read_video_map_file(node: &XmlElement) -> VideoMapFileEntry {
    VideoMapFileEntry {
        filepath: node.child_text("Filepath").unwrap_or_default().to_string(),
        map_number: node
            .child_text("MapNumber")
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(0),
        short_name: child_string(node, "ShortName"),
        full_name: child_string(node, "FullName"),
        brightness_group: child_string(node, "BrightnessGroup"),
        dcb_button: child_string(node, "DCBButton"),
    }
}

/// Reads the current preference set, filling gaps with defaults.
///
/// Returns `None` when the document has no `CurrentPrefSet` node.
pub fn read_pref_set(root: &XmlElement) -> Option<PrefSetSettings> {
    let pref = root.child("CurrentPrefSet")?;
    let mut s = PrefSetSettings::default();

    macro_rules! overlay {
        ($node:expr, $name:literal, $reader:ident, $field:expr) => {
            if let Some(value) = $reader($node, $name) {
                $field = value;
            }
        };
    }

    overlay!(root, "FontName", child_string, s.font_name);
    overlay!(root, "FontSize", child_int, s.font_size);
    overlay!(root, "FontSizeUnit", child_string, s.font_size_unit);
    overlay!(root, "DCBFontName", child_string, s.dcb_font_name);
    overlay!(root, "DCBFontSize", child_int, s.dcb_font_size);
    overlay!(root, "DCBFontSizeUnit", child_string, s.dcb_font_size_unit);

    if let Some(center) = pref.child("ScreenCenterPoint") {
        overlay!(center, "Latitude", child_f64, s.screen_center_lat);
        overlay!(center, "Longitude", child_f64, s.screen_center_lon);
    }
    if let Some(preview) = pref.child("PreviewAreaLocation") {
        overlay!(preview, "X", child_int, s.preview_area_x);
        overlay!(preview, "Y", child_int, s.preview_area_y);
    }
    if let Some(status) = pref.child("StatusAreaLocation") {
        overlay!(status, "X", child_int, s.status_area_x);
        overlay!(status, "Y", child_int, s.status_area_y);
    }
    overlay!(pref, "RangeRingsDisplayed", child_bool, s.range_rings_displayed);
    if let Some(rings) = pref.child("RangeRingLocation") {
        overlay!(rings, "Latitude", child_f64, s.range_ring_lat);
        overlay!(rings, "Longitude", child_f64, s.range_ring_lon);
    }
    overlay!(pref, "RangeRingSpacing", child_int, s.range_ring_spacing);
    overlay!(pref, "DCBLocation", child_string, s.dcb_location);
    overlay!(pref, "OwnedDataBlockPosition", child_string, s.owned_data_block_position);
    overlay!(pref, "UnownedDataBlockPosition", child_string, s.unowned_data_block_position);
    overlay!(
        pref,
        "UnassociatedDataBlockPosition",
        child_string,
        s.unassociated_data_block_position
    );
    overlay!(pref, "DCBVisible", child_bool, s.dcb_visible);
    overlay!(pref, "RangeRingsCentered", child_bool, s.range_rings_centered);
    overlay!(pref, "ScopeCentered", child_bool, s.scope_centered);
    overlay!(pref, "Range", child_int, s.range);
    overlay!(pref, "PTLLength", child_int, s.ptl_length);
    overlay!(pref, "PTLOwn", child_bool, s.ptl_own);
    overlay!(pref, "PTLAll", child_bool, s.ptl_all);
    overlay!(pref, "HistoryNum", child_int, s.history_num);
    overlay!(pref, "HistoryRate", child_f64, s.history_rate);
    overlay!(pref, "LeaderLength", child_int, s.leader_length);
    overlay!(pref, "AltitudeFilterAssociatedMax", child_int, s.altitude_filter_associated_max);
    overlay!(pref, "AltitudeFilterAssociatedMin", child_int, s.altitude_filter_associated_min);
    overlay!(pref, "AltitudeFilterUnAssociatedMax", child_int, s.altitude_filter_unassociated_max);
    overlay!(pref, "AltitudeFilterUnAssociatedMin", child_int, s.altitude_filter_unassociated_min);

    if let Some(brightness) = pref.child("Brightness") {
        for node in &brightness.children {
            if let (Some(slot), Some(value)) = (
                s.brightness.field_mut(&node.name),
                node.text.as_deref().and_then(parse_int),
            ) {
                *slot = value;
            }
        }
    }

    Some(s)
}

/// Writes a full settings object onto a profile document.
///
/// The settings are validated first; on failure the document is untouched.
/// Applying the same settings twice leaves the document unchanged the
/// second time.
///
/// # Errors
///
/// Returns the first out-of-range field.
pub fn apply_pref_set(root: &mut XmlElement, s: &PrefSetSettings) -> Result<(), SettingsError> {
    s.validate()?;

    root.set_or_create("FontName", s.font_name.as_str());
    root.set_or_create("FontSize", s.font_size.to_string());
    root.set_or_create("FontSizeUnit", s.font_size_unit.as_str());
    root.set_or_create("DCBFontName", s.dcb_font_name.as_str());
    root.set_or_create("DCBFontSize", s.dcb_font_size.to_string());
    root.set_or_create("DCBFontSizeUnit", s.dcb_font_size_unit.as_str());

    let pref = root.ensure_child("CurrentPrefSet");

    write_coordinate(
        pref,
        "ScreenCenterPoint",
        Coordinate::new(s.screen_center_lat, s.screen_center_lon),
    );
    let preview = pref.ensure_child("PreviewAreaLocation");
    preview.set_or_create("X", s.preview_area_x.to_string());
    preview.set_or_create("Y", s.preview_area_y.to_string());
    let status = pref.ensure_child("StatusAreaLocation");
    status.set_or_create("X", s.status_area_x.to_string());
    status.set_or_create("Y", s.status_area_y.to_string());

    pref.set_or_create("RangeRingsDisplayed", bool_text(s.range_rings_displayed));
    write_coordinate(
        pref,
        "RangeRingLocation",
        Coordinate::new(s.range_ring_lat, s.range_ring_lon),
    );
    pref.set_or_create("RangeRingSpacing", s.range_ring_spacing.to_string());

    pref.set_or_create("DCBLocation", s.dcb_location.as_str());
    pref.set_or_create("OwnedDataBlockPosition", s.owned_data_block_position.as_str());
    pref.set_or_create("UnownedDataBlockPosition", s.unowned_data_block_position.as_str());
    pref.set_or_create(
        "UnassociatedDataBlockPosition",
        s.unassociated_data_block_position.as_str(),
    );
    pref.set_or_create("DCBVisible", bool_text(s.dcb_visible));

    pref.set_or_create("RangeRingsCentered", bool_text(s.range_rings_centered));
    pref.set_or_create("ScopeCentered", bool_text(s.scope_centered));
    pref.set_or_create("Range", s.range.to_string());

    pref.set_or_create("PTLLength", s.ptl_length.to_string());
    pref.set_or_create("PTLOwn", bool_text(s.ptl_own));
    pref.set_or_create("PTLAll", bool_text(s.ptl_all));
    pref.set_or_create("HistoryNum", s.history_num.to_string());
    pref.set_or_create("HistoryRate", format!("{:.1}", s.history_rate));
    pref.set_or_create("LeaderLength", s.leader_length.to_string());

    pref.set_or_create(
        "AltitudeFilterAssociatedMax",
        s.altitude_filter_associated_max.to_string(),
    );
    pref.set_or_create(
        "AltitudeFilterAssociatedMin",
        s.altitude_filter_associated_min.to_string(),
    );
    pref.set_or_create(
        "AltitudeFilterUnAssociatedMax",
        s.altitude_filter_unassociated_max.to_string(),
    );
    pref.set_or_create(
        "AltitudeFilterUnAssociatedMin",
        s.altitude_filter_unassociated_min.to_string(),
    );

    let brightness = pref.ensure_child("Brightness");
    for (name, value) in s.brightness.fields() {
        brightness.set_or_create(name, value.to_string());
    }

    Ok(())
}

/// Builds the control bar list: `list[slot] = map_number`, zero elsewhere.
///
/// `assignments` maps a map number to its 0-based slot; slots past the last
/// button are ignored.
pub fn build_dcb_map_list(assignments: &BTreeMap<u32, usize>) -> [u32; DCB_SLOT_COUNT] {
    let mut list = [0u32; DCB_SLOT_COUNT];
    for (&map_number, &slot) in assignments {
        if let Some(entry) = list.get_mut(slot) {
            *entry = map_number;
        }
    }
    list
}

/// Replaces `TCP/DCBMapList` with one `int` node per slot.
pub fn write_dcb_map_list(root: &mut XmlElement, list: &[u32; DCB_SLOT_COUNT]) {
    let mut node = XmlElement::new("DCBMapList");
    node.children = list
        .iter()
        .map(|n| XmlElement::with_text("int", n.to_string()))
        .collect();
    root.ensure_child("TCP").replace_child(node);
}

/// Replaces the `VideoMapFiles` list and drops the legacy single-map node.
///
/// An empty `entries` removes the list entirely.
pub fn write_video_map_files(root: &mut XmlElement, entries: &[VideoMapFileEntry]) {
    root.remove_children("VideoMapFilename");
    if entries.is_empty() {
        root.remove_children("VideoMapFiles");
        return;
    }

    let mut list = XmlElement::new("VideoMapFiles");
    for entry in entries {
        let mut node = XmlElement::new("VideoMapFile");
        node.children
            .push(XmlElement::with_text("Filepath", entry.filepath.as_str()));
        node.children
            .push(XmlElement::with_text("MapNumber", entry.map_number.to_string()));
        let optional = [
            ("ShortName", &entry.short_name),
            ("FullName", &entry.full_name),
            ("BrightnessGroup", &entry.brightness_group),
            ("DCBButton", &entry.dcb_button),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                node.children.push(XmlElement::with_text(name, value));
            }
        }
        list.children.push(node);
    }
    root.replace_child(list);
}

/// Replaces the `AltimeterStations` list wholesale.
pub fn write_altimeter_stations(root: &mut XmlElement, stations: &[String]) {
    let mut list = XmlElement::new("AltimeterStations");
    list.children = stations
        .iter()
        .map(|s| XmlElement::with_text("string", s.as_str()))
        .collect();
    root.replace_child(list);
}

/// Hands out unique map numbers for one document.
///
/// A declared number is kept when it is still free; otherwise the next
/// unused integer above the highest number seen so far is used.
#[derive(Debug, Clone, Default)]
pub struct MapNumberAllocator {
    used: BTreeSet<u32>,
    max_seen: u32,
}

impl MapNumberAllocator {
    /// Creates an allocator with no numbers in use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the map number for a map declaring `declared`.
    pub fn allocate(&mut self, declared: Option<u32>) -> u32 {
        if let Some(number) = declared.filter(|n| *n > 0) {
            self.max_seen = self.max_seen.max(number);
            if self.used.insert(number) {
                return number;
            }
        }
        let mut candidate = self.max_seen.saturating_add(1);
        while self.used.contains(&candidate) {
            candidate = candidate.saturating_add(1);
        }
        self.used.insert(candidate);
        self.max_seen = self.max_seen.max(candidate);
        candidate
    }
}
