//! Reader for exported facility configuration documents (JSON).
//!
//! The facility tree is flattened through an explicit arena walk: every
//! facility node is recorded with a link to its parent, so the "any
//! descendant has a display configuration" test and the error isolation of
//! malformed subtrees never recurse through the document.

use crate::models::source::{
    is_controlled_type, Area, ButtonAssignment, ControlledFacility, Coordinate, SourceProfile,
    VideoMapDescriptor,
};
use crate::constants::DCB_SLOT_COUNT;
use anyhow::{Context, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// A facility node recorded during the arena walk.
struct FacilityNode<'a> {
    value: &'a Value,
    parent: Option<usize>,
    depth: usize,
}

/// Parses a source document from text.
///
/// `code` becomes the profile's region code.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON or the document root is
/// not shaped like a facility export. Malformed facilities inside an
/// otherwise valid document are skipped and logged instead.
pub fn parse_source_str(code: &str, json: &str) -> Result<SourceProfile> {
    let root: Value = serde_json::from_str(json)
        .with_context(|| format!("Failed to parse source document {code}"))?;
    parse_source_value(code, &root)
}

/// Loads a source document from disk. The region code is the file stem.
pub fn load_source_profile(path: &Path) -> Result<SourceProfile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source document: {}", path.display()))?;
    let code = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut profile = parse_source_str(&code, &content)
        .with_context(|| format!("Failed to load source document: {}", path.display()))?;
    profile.path = Some(path.to_path_buf());
    Ok(profile)
}

/// Loads every `*.json` document in `dir`, sorted by file name.
///
/// A document that fails to parse is logged and left out; the scan goes on.
pub fn scan_source_dir(dir: &Path) -> Result<Vec<SourceProfile>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read source directory: {}", dir.display()))?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    paths.sort();

    let mut profiles = Vec::new();
    for path in paths {
        match load_source_profile(&path) {
            Ok(profile) => profiles.push(profile),
            Err(e) => warn!("Skipping {}: {e:#}", path.display()),
        }
    }
    Ok(profiles)
}

/// Builds a profile from an already parsed document.
pub fn parse_source_value(code: &str, root: &Value) -> Result<SourceProfile> {
    let root = root
        .as_object()
        .context("Source document root must be an object")?;

    let video_maps = parse_video_maps(root)?;
    let lookup: HashMap<&str, &VideoMapDescriptor> =
        video_maps.iter().map(|m| (m.id.as_str(), m)).collect();

    let home = root
        .get("visibilityCenters")
        .and_then(Value::as_array)
        .and_then(|centers| centers.first())
        .and_then(parse_coordinate);

    let top_level = match root.get("facility").and_then(|f| f.get("childFacilities")) {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(children)) => children.as_slice(),
        Some(_) => anyhow::bail!("facility.childFacilities must be an array"),
    };

    let arena = build_arena(top_level);
    let has_config = propagate_radar_config(&arena);

    let mut failed = vec![false; arena.len()];
    let mut facilities = Vec::new();

    for (index, node) in arena.iter().enumerate() {
        if node.parent.is_some_and(|p| failed[p]) {
            failed[index] = true;
            continue;
        }
        match process_node(node.value, has_config[index], &lookup) {
            Ok(Some(facility)) => {
                debug!(
                    "Found controlled facility {} ({}) at depth {}",
                    facility.id, facility.facility_type, node.depth
                );
                facilities.push(facility);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Skipping malformed facility subtree at depth {}: {e:#}", node.depth);
                failed[index] = true;
            }
        }
    }

    Ok(SourceProfile {
        code: code.to_string(),
        path: None,
        video_maps,
        facilities,
        home,
    })
}

fn parse_video_maps(root: &Map<String, Value>) -> Result<Vec<VideoMapDescriptor>> {
    let entries = match root.get("videoMaps") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => anyhow::bail!("videoMaps must be an array"),
    };

    let mut maps: Vec<VideoMapDescriptor> = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let Some(obj) = entry.as_object() else {
            warn!("Skipping video map #{index}: not an object");
            continue;
        };
        let descriptor = match video_map_from(obj) {
            Ok(d) => d,
            Err(e) => {
                warn!("Skipping video map #{index}: {e:#}");
                continue;
            }
        };
        if descriptor.id.is_empty() || descriptor.source_file_name.is_empty() {
            debug!("Skipping video map #{index}: missing id or source file");
            continue;
        }
        if maps.iter().any(|m| m.id == descriptor.id) {
            debug!("Skipping duplicate video map id {}", descriptor.id);
            continue;
        }
        maps.push(descriptor);
    }
    Ok(maps)
}

fn video_map_from(obj: &Map<String, Value>) -> Result<VideoMapDescriptor> {
    let tags = match obj.get("tags") {
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    Ok(VideoMapDescriptor {
        id: str_field(obj, "id")?,
        name: str_field(obj, "name")?,
        short_name: str_field(obj, "shortName")?,
        source_file_name: str_field(obj, "sourceFileName")?,
        brightness_category: str_field(obj, "starsBrightnessCategory")?,
        map_number: obj.get("starsId").and_then(parse_map_number),
        tags,
        buttons: Vec::new(),
    })
}

/// Reads a numeric map id given as a JSON number or an integer string.
fn parse_map_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a text field, accepting numbers as text. Missing or null is empty.
fn str_field(obj: &Map<String, Value>, key: &str) -> Result<String> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => anyhow::bail!("field '{key}' must be text, found {}", kind_of(other)),
    }
}

/// Reads an optional array field. Missing or null is empty.
fn array_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a [Value]> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => anyhow::bail!("field '{key}' must be an array, found {}", kind_of(other)),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Flattens the facility tree into preorder, children after their parent.
///
/// Nodes whose `childFacilities` is not an array are still recorded; the
/// shape error is reported when the node itself is processed.
fn build_arena(top_level: &[Value]) -> Vec<FacilityNode<'_>> {
    let mut arena = Vec::new();
    let mut pending: Vec<(&Value, Option<usize>, usize)> =
        top_level.iter().rev().map(|v| (v, None, 0)).collect();

    while let Some((value, parent, depth)) = pending.pop() {
        let index = arena.len();
        arena.push(FacilityNode {
            value,
            parent,
            depth,
        });
        if let Some(Value::Array(children)) = value.get("childFacilities") {
            pending.extend(children.iter().rev().map(|c| (c, Some(index), depth + 1)));
        }
    }
    arena
}

/// Computes "has display configuration" for every node over its full subtree.
fn propagate_radar_config(arena: &[FacilityNode<'_>]) -> Vec<bool> {
    let mut flags: Vec<bool> = arena.iter().map(|n| has_own_radar_config(n.value)).collect();
    // Preorder puts every child after its parent, so a reverse sweep sees
    // each node's final flag before it is folded into the parent.
    for index in (0..arena.len()).rev() {
        if flags[index] {
            if let Some(parent) = arena[index].parent {
                flags[parent] = true;
            }
        }
    }
    flags
}

fn has_own_radar_config(value: &Value) -> bool {
    if value.get("starsConfiguration").is_some() {
        return true;
    }
    value
        .get("positions")
        .and_then(Value::as_array)
        .is_some_and(|positions| {
            positions
                .iter()
                .any(|p| p.get("starsConfiguration").is_some())
        })
}

fn process_node(
    value: &Value,
    has_radar_config: bool,
    lookup: &HashMap<&str, &VideoMapDescriptor>,
) -> Result<Option<ControlledFacility>> {
    let obj = value
        .as_object()
        .context("facility entry must be an object")?;

    if let Some(children) = obj.get("childFacilities") {
        if !children.is_array() && !children.is_null() {
            anyhow::bail!("field 'childFacilities' must be an array");
        }
    }

    let id = str_field(obj, "id")?;
    let name = str_field(obj, "name")?;
    let facility_type = str_field(obj, "type")?;

    let mut facility = ControlledFacility {
        id,
        name,
        facility_type,
        has_radar_config,
        ..ControlledFacility::default()
    };

    match obj.get("starsConfiguration") {
        None | Some(Value::Null) => {}
        Some(Value::Object(config)) => apply_display_config(&mut facility, config, lookup)?,
        Some(other) => anyhow::bail!(
            "field 'starsConfiguration' must be an object, found {}",
            kind_of(other)
        ),
    }

    let keep = !facility.id.is_empty()
        && !facility.name.is_empty()
        && is_controlled_type(&facility.facility_type);
    Ok(keep.then_some(facility))
}

fn apply_display_config(
    facility: &mut ControlledFacility,
    config: &Map<String, Value>,
    lookup: &HashMap<&str, &VideoMapDescriptor>,
) -> Result<()> {
    // Areas keep their raw position so map group linkage is not shifted by
    // entries that get dropped.
    let mut areas: Vec<(usize, Area)> = Vec::new();
    let mut airports = BTreeSet::new();

    for (index, entry) in array_field(config, "areas")?.iter().enumerate() {
        let area = match entry.as_object().context("area must be an object").and_then(parse_area) {
            Ok(area) => area,
            Err(e) => {
                warn!("Skipping area #{index} of {}: {e:#}", facility.id);
                continue;
            }
        };
        if index == 0 {
            facility.coordinate = area.coordinate;
        }
        airports.extend(area.airports.iter().cloned());
        if area.name.is_empty() {
            debug!("Dropping unnamed area #{index} of {}", facility.id);
            continue;
        }
        areas.push((index, area));
    }

    for entry in array_field(config, "videoMapIds")? {
        let id = match entry {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => continue,
        };
        if facility.available_maps.iter().any(|m| m.id == id) {
            continue;
        }
        match lookup.get(id.as_str()) {
            Some(map) => facility.available_maps.push((*map).clone()),
            None => debug!("Facility {} lists unknown video map {id}", facility.id),
        }
    }

    for (ordinal, group) in array_field(config, "mapGroups")?.iter().enumerate() {
        let Some(group) = group.as_object() else {
            warn!("Skipping map group #{ordinal} of {}: not an object", facility.id);
            continue;
        };
        let group_id = group_identifier(group, ordinal)?;

        if let Some((_, area)) = areas.iter_mut().find(|(raw, _)| *raw == ordinal) {
            area.map_group_id = Some(group_id.clone());
        }

        assign_group_buttons(facility, &group_id, array_field(group, "mapIds")?);
    }

    facility.areas = areas.into_iter().map(|(_, area)| area).collect();
    facility.airports = airports.into_iter().collect();
    Ok(())
}

fn parse_area(obj: &Map<String, Value>) -> Result<Area> {
    let airports = array_field(obj, "ssaAirports")?
        .iter()
        .filter_map(Value::as_str)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Area {
        id: str_field(obj, "id")?,
        name: str_field(obj, "name")?,
        coordinate: obj.get("visibilityCenter").and_then(parse_coordinate),
        airports,
        map_group_id: None,
    })
}

/// Group id, else its name, else its 1-based ordinal.
fn group_identifier(group: &Map<String, Value>, ordinal: usize) -> Result<String> {
    let id = str_field(group, "id")?;
    if !id.is_empty() {
        return Ok(id);
    }
    let name = str_field(group, "name")?;
    if !name.is_empty() {
        return Ok(name);
    }
    Ok((ordinal + 1).to_string())
}

/// Walks a group's map references, one slot per reference.
fn assign_group_buttons(facility: &mut ControlledFacility, group_id: &str, references: &[Value]) {
    for (slot, reference) in references.iter().enumerate() {
        if slot >= DCB_SLOT_COUNT {
            warn!(
                "Map group {group_id} of {} has more than {DCB_SLOT_COUNT} entries; ignoring the rest",
                facility.id
            );
            break;
        }
        if reference.is_null() {
            continue;
        }
        match resolve_reference(&facility.available_maps, reference) {
            Some(index) => {
                let map = &mut facility.available_maps[index];
                if !map.assign(ButtonAssignment::new(slot, group_id)) {
                    debug!(
                        "Map {} already placed by group {group_id}; keeping the first slot",
                        map.id
                    );
                }
            }
            None => debug!(
                "Unresolved map reference {reference} in group {group_id} of {}",
                facility.id
            ),
        }
    }
}

/// Resolves one map reference to an index into `maps`.
///
/// Numbers match a declared map number first, then a 1-based position,
/// then a 0-based position. Text matches a map id.
fn resolve_reference(maps: &[VideoMapDescriptor], reference: &Value) -> Option<usize> {
    match reference {
        Value::Number(n) => {
            let n = n.as_u64()?;
            if let Some(index) = maps
                .iter()
                .position(|m| m.map_number.is_some_and(|number| u64::from(number) == n))
            {
                return Some(index);
            }
            let n = usize::try_from(n).ok()?;
            if (1..=maps.len()).contains(&n) {
                return Some(n - 1);
            }
            (n < maps.len()).then_some(n)
        }
        Value::String(id) => maps.iter().position(|m| &m.id == id),
        _ => None,
    }
}

fn coordinate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(lat|lon)\s*=\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)")
            .unwrap_or_else(|e| unreachable!("coordinate pattern is valid: {e}"))
    })
}

/// Parses a coordinate given as an object or as `"@{lat=..; lon=..}"` text.
///
/// Returns `None` when either half is missing or unparseable.
pub fn parse_coordinate(value: &Value) -> Option<Coordinate> {
    match value {
        Value::Object(obj) => {
            let half = |keys: [&str; 2]| {
                keys.iter()
                    .find_map(|k| obj.get(*k))
                    .and_then(|v| match v {
                        Value::Number(n) => n.as_f64(),
                        Value::String(s) => s.trim().parse().ok(),
                        _ => None,
                    })
            };
            Coordinate::from_parts(half(["lat", "Lat"]), half(["lon", "Lon"]))
        }
        Value::String(text) => parse_coordinate_text(text),
        _ => None,
    }
}

/// Parses `"@{lat=VALUE; lon=VALUE}"`, tolerating missing or extra fields.
pub fn parse_coordinate_text(text: &str) -> Option<Coordinate> {
    let mut lat = None;
    let mut lon = None;
    for caps in coordinate_pattern().captures_iter(text) {
        let value: Option<f64> = caps[2].parse().ok();
        if caps[1].eq_ignore_ascii_case("lat") {
            lat = lat.or(value);
        } else {
            lon = lon.or(value);
        }
    }
    Coordinate::from_parts(lat, lon)
}
