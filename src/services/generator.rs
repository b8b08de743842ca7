//! Radar-scope profile generation.
//!
//! [`ProfileGenerator`] turns one controlled facility (optionally narrowed
//! to an area and a set of maps) into a profile document on disk. Each step
//! only runs when its input is available:
//!
//! 1. pick a template (first `*.xml` in the output folder, else the bundled skeleton)
//! 2. copy map assets and write the map list
//! 3. write home, screen center and range ring location
//! 4. write altimeter stations
//! 5. write the receiver endpoint
//! 6. write the weather radar station
//! 7. overlay font and window defaults
//! 8. save

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::constants::{
    DCB_SLOT_COUNT, RADAR_DOWNLOAD_INTERVAL, RADAR_URL_TEMPLATE, RADAR_WARN_DISTANCE_NM,
    RECEIVER_ASSEMBLY_NAME, RECEIVER_DEFAULT_RANGE, RECEIVER_URL_TEMPLATE,
};
use crate::models::{
    Area, ButtonAssignment, ControlledFacility, Coordinate, ProfileDefaults, SourceProfile,
    VideoMapDescriptor, VideoMapFileEntry,
};
use crate::parser::target_xml::{
    build_dcb_map_list, write_altimeter_stations, write_coordinate, write_dcb_map_list,
    write_video_map_files, MapNumberAllocator,
};
use crate::parser::XmlElement;
use crate::services::airports::AirportResolver;
use crate::services::profiles::{has_xml_extension, sanitize_filename, ProfileService};
use crate::services::stations::StationLocator;
use crate::services::video_maps::materialize_map;

const DEFAULT_PROFILE: &str = include_str!("data/default_profile.xml");

/// Everything needed to generate one profile.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    /// Parsed source document
    pub source: &'a SourceProfile,
    /// Selected controlled facility
    pub facility: Option<&'a ControlledFacility>,
    /// Selected area within the facility
    pub area: Option<&'a Area>,
    /// Selected maps, in the order they should be listed
    pub maps: Vec<VideoMapDescriptor>,
    /// Folder the profile is written to
    pub output_dir: PathBuf,
    /// Optional suffix for the file name (`{code}_{name}.xml`)
    pub profile_name: Option<String>,
    /// Font and window defaults
    pub defaults: Option<ProfileDefaults>,
}

impl<'a> GenerationRequest<'a> {
    /// Creates a request with no facility, area, maps, or defaults selected.
    pub fn new(source: &'a SourceProfile, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            facility: None,
            area: None,
            maps: Vec::new(),
            output_dir: output_dir.into(),
            profile_name: None,
            defaults: None,
        }
    }

    /// Facility id when one is selected, else the region code.
    pub fn profile_code(&self) -> &str {
        self.facility.map_or(self.source.code.as_str(), |f| f.id.as_str())
    }

    /// Output file name.
    pub fn file_name(&self) -> String {
        match self.profile_name.as_deref().map(sanitize_filename) {
            Some(name) if !name.is_empty() => format!("{}_{name}.xml", self.profile_code()),
            _ => format!("{}.xml", self.profile_code()),
        }
    }
}

/// Summary of a generated profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedProfile {
    /// Facility name, or the region code
    pub name: String,
    /// Written profile file
    pub path: PathBuf,
    /// Existing profile used as template, if any
    pub template: Option<PathBuf>,
    /// Map entries written to the profile
    pub video_map_files: Vec<VideoMapFileEntry>,
    /// Ids of maps whose asset could not be copied
    pub missing_assets: Vec<String>,
    /// Control bar map numbers by slot
    pub dcb_map_list: Vec<u32>,
    /// Resolved home location
    pub home: Option<Coordinate>,
    /// Altimeter station codes written
    pub altimeter_stations: Vec<String>,
    /// Weather radar station written
    pub radar_station: Option<String>,
    /// Distance from home to the weather radar station
    pub radar_distance_nm: Option<f64>,
}

/// Builds radar-scope profiles from parsed source documents.
///
/// Reference tables are passed in rather than looked up globally, so tests
/// can run against fixture tables.
pub struct ProfileGenerator<'a> {
    airports: &'a AirportResolver,
    stations: &'a StationLocator,
    video_map_root: Option<PathBuf>,
}

impl<'a> ProfileGenerator<'a> {
    /// Creates a generator over the given reference tables.
    pub fn new(airports: &'a AirportResolver, stations: &'a StationLocator) -> Self {
        Self {
            airports,
            stations,
            video_map_root: None,
        }
    }

    /// Sets the folder map assets are copied from.
    #[must_use]
    pub fn with_video_map_root(mut self, root: Option<PathBuf>) -> Self {
        self.video_map_root = root;
        self
    }

    /// Generates and saves one profile.
    ///
    /// # Errors
    ///
    /// Fails when the output folder cannot be created, a template cannot be
    /// parsed, or the profile cannot be written. Missing map assets are only
    /// logged.
    pub fn generate(&self, request: &GenerationRequest<'_>) -> Result<GeneratedProfile> {
        let output_dir = &request.output_dir;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output folder: {}", output_dir.display()))?;

        let output_path = output_dir.join(request.file_name());

        // 1. Template
        let template = find_template(output_dir)?;
        let mut root = match &template {
            Some(path) => {
                info!("Using {} as template", path.display());
                ProfileService::load_document(path)?
            }
            None => default_document()?,
        };

        // 2. Map files and control bar list
        let (video_map_files, missing_assets, slots) = self.place_maps(request)?;
        write_video_map_files(&mut root, &video_map_files);
        let dcb_map_list = build_dcb_map_list(&slots);
        write_dcb_map_list(&mut root, &dcb_map_list);

        // 3. Location
        let home = request
            .area
            .and_then(|a| a.coordinate)
            .or_else(|| request.facility.and_then(|f| f.coordinate))
            .or(request.source.home);
        if let Some(point) = home {
            write_location(&mut root, point);
        }

        // 4. Altimeter stations
        let local_codes = match (request.area, request.facility) {
            (Some(area), _) if !area.airports.is_empty() => area.airports.as_slice(),
            (_, Some(facility)) => facility.airports.as_slice(),
            _ => &[],
        };
        let altimeter_stations = self
            .airports
            .resolve_all(local_codes, Some(request.source.code.as_str()));
        if altimeter_stations.is_empty() {
            root.remove_children("AltimeterStations");
        } else {
            debug!("Altimeter stations: {}", altimeter_stations.join(", "));
            write_altimeter_stations(&mut root, &altimeter_stations);
        }

        // 5. Receiver
        if let (Some(facility), Some(point)) = (request.facility, home) {
            write_receiver(&mut root, &facility.id, point);
        }

        // 6. Weather radar
        let radar = home.and_then(|point| {
            let station = self.stations.nearest(point)?;
            let distance = point.distance_nm(&station.coordinate);
            if distance > RADAR_WARN_DISTANCE_NM {
                warn!(
                    "Nearest radar {} ({}) is {:.0} nm away; the station table may not cover this area",
                    station.icao, station.name, distance
                );
            } else {
                info!(
                    "Selected radar {} ({}), {:.1} nm away",
                    station.icao, station.name, distance
                );
            }
            write_radar(&mut root, &station.icao);
            Some((station.icao.clone(), distance))
        });
        let (radar_station, radar_distance_nm) = radar.unzip();

        // 7. Defaults
        if let Some(defaults) = &request.defaults {
            apply_defaults(&mut root, defaults);
        }

        // 8. Save
        ProfileService::save_document(&root, &output_path)?;
        info!("Generated {}", output_path.display());

        Ok(GeneratedProfile {
            name: request
                .facility
                .map_or_else(|| request.source.code.clone(), |f| f.name.clone()),
            path: output_path,
            template,
            video_map_files,
            missing_assets,
            dcb_map_list: dcb_map_list.to_vec(),
            home,
            altimeter_stations,
            radar_station,
            radar_distance_nm,
        })
    }

    /// Copies each selected map and assigns its map number and slot.
    ///
    /// Returns the list entries, the ids of maps without an asset, and the
    /// map number to slot assignments. A slot holds the first selected map
    /// placed on it; later maps wanting the same slot keep their entry but
    /// get no control bar button.
    #[allow(clippy::type_complexity)]
    fn place_maps(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<(Vec<VideoMapFileEntry>, Vec<String>, BTreeMap<u32, usize>)> {
        let mut entries = Vec::with_capacity(request.maps.len());
        let mut missing = Vec::new();
        let mut slots = BTreeMap::new();
        let mut taken = BTreeSet::new();
        let mut allocator = MapNumberAllocator::new();
        let group = request.area.and_then(|a| a.map_group_id.as_deref());

        for map in &request.maps {
            let placed = materialize_map(
                map,
                &request.source.code,
                request.profile_code(),
                self.video_map_root.as_deref(),
                &request.output_dir,
            )?;
            if !placed.copied {
                missing.push(map.id.clone());
            }

            let map_number = allocator.allocate(map.map_number);
            let mut button = select_button(map, group);
            if let Some(b) = button.filter(|b| b.slot < DCB_SLOT_COUNT) {
                if taken.insert(b.slot) {
                    slots.insert(map_number, b.slot);
                } else {
                    debug!("Slot {} already holds a map; {} gets no button", b.slot, map.id);
                    button = None;
                }
            }

            entries.push(VideoMapFileEntry {
                filepath: placed.destination.display().to_string(),
                map_number,
                short_name: non_blank(&map.short_name),
                full_name: non_blank(&map.name),
                brightness_group: non_blank(&map.brightness_category),
                dcb_button: button.map(|b| b.label.clone()),
            });
        }

        Ok((entries, missing, slots))
    }
}

/// The button a map gets in the generated profile.
///
/// With an area linked to a map group only that group's placement counts;
/// otherwise the map's first placement is used.
fn select_button<'m>(map: &'m VideoMapDescriptor, group: Option<&str>) -> Option<&'m ButtonAssignment> {
    match group {
        Some(group) => map.button_for_group(group),
        None => map.primary_button(),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// First `*.xml` file in `dir` by file name.
pub fn find_template(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_xml_extension(path))
        .collect();
    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Parses the bundled profile skeleton.
pub fn default_document() -> Result<XmlElement> {
    XmlElement::parse(DEFAULT_PROFILE).context("Bundled profile skeleton is invalid")
}

fn write_location(root: &mut XmlElement, point: Coordinate) {
    write_coordinate(root, "HomeLocation", point);
    let pref = root.ensure_child("CurrentPrefSet");
    write_coordinate(pref, "ScreenCenterPoint", point);
    write_coordinate(pref, "RangeRingLocation", point);
}

fn scope_server_client(facility_id: &str, url: &str, point: Coordinate) -> XmlElement {
    let mut client = XmlElement::new("ScopeServerClient");
    client.set_or_create("Name", facility_id);
    client.set_or_create("Enabled", "true");
    write_coordinate(&mut client, "Location", point);
    client.set_or_create("Range", RECEIVER_DEFAULT_RANGE.to_string());
    client.set_or_create("CreateNewAircraft", "true");
    client.set_or_create("Url", url);
    client
}

/// Creates or updates the first receiver with the facility endpoint.
fn write_receiver(root: &mut XmlElement, facility_id: &str, point: Coordinate) {
    let url = RECEIVER_URL_TEMPLATE.replace("{facility}", facility_id);
    let receivers = root.ensure_child("Receivers");

    if receivers.child("Receiver").is_none() {
        let mut receiver = XmlElement::new("Receiver");
        receiver.set_attribute("AssemblyQualifiedName", RECEIVER_ASSEMBLY_NAME);
        receivers.children.push(receiver);
    }
    let receiver = receivers.ensure_child("Receiver");

    match receiver.child_mut("ScopeServerClient") {
        Some(client) => {
            client.set_or_create("Name", facility_id);
            client.set_or_create("Url", url);
            write_coordinate(client, "Location", point);
        }
        None => receiver
            .children
            .push(scope_server_client(facility_id, &url, point)),
    }
}

/// Creates or updates the weather radar block for `icao`.
fn write_radar(root: &mut XmlElement, icao: &str) {
    let url = RADAR_URL_TEMPLATE.replace("{icao}", &icao.to_lowercase());

    if root.child("Nexrad").is_none() {
        let mut nexrad = XmlElement::new("Nexrad");
        nexrad.set_or_create("WxRadarMode", "NWSNexrad");
        nexrad.set_or_create("Enabled", "true");
        root.children.push(nexrad);
    }
    let nexrad = root.ensure_child("Nexrad");
    nexrad.set_or_create("URL", url);
    nexrad.set_or_create("DownloadInterval", RADAR_DOWNLOAD_INTERVAL.to_string());
    nexrad.set_or_create("SensorID", icao.to_uppercase());
}

/// Writes font defaults, and window defaults onto existing window nodes.
fn apply_defaults(root: &mut XmlElement, defaults: &ProfileDefaults) {
    if let Some(font) = defaults.font_name.as_deref().filter(|f| !f.trim().is_empty()) {
        root.set_or_create("FontName", font);
    }
    if let Some(size) = defaults.font_size {
        root.set_or_create("FontSize", size.to_string());
    }
    if let (Some(size), Some(node)) = (defaults.window_size, root.child_mut("WindowSize")) {
        node.set_or_create("Width", size.width.to_string());
        node.set_or_create("Height", size.height.to_string());
    }
    if let (Some(location), Some(node)) = (defaults.window_location, root.child_mut("WindowLocation")) {
        node.set_or_create("X", location.x.to_string());
        node.set_or_create("Y", location.y.to_string());
    }
}

/// Returns the maps a request should use when the caller names none.
///
/// Maps placed by the area's map group come first in slot order; with no
/// linked group every map available to the facility is returned.
pub fn maps_for_area(facility: &ControlledFacility, area: Option<&Area>) -> Vec<VideoMapDescriptor> {
    let Some(group) = area.and_then(|a| a.map_group_id.as_deref()) else {
        return facility.available_maps.clone();
    };

    let mut placed: Vec<(usize, &VideoMapDescriptor)> = facility
        .available_maps
        .iter()
        .filter_map(|m| m.button_for_group(group).map(|b| (b.slot, m)))
        .collect();
    placed.sort_by_key(|(slot, _)| *slot);
    if placed.is_empty() {
        warn!("Map group '{group}' places no maps; using every map of {}", facility.id);
        return facility.available_maps.clone();
    }
    placed.into_iter().map(|(_, m)| m.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source_str;
    use crate::parser::read_target_profile;
    use crate::services::stations::{Station, StationKind};
    use tempfile::TempDir;

    const SOURCE: &str = r#"{
        "videoMaps": [
            {"id": "m1", "name": "North Main", "shortName": "NMAIN", "sourceFileName": "n1.geojson",
             "starsBrightnessCategory": "A", "starsId": 11},
            {"id": "m2", "name": "North Sat", "shortName": "NSAT", "sourceFileName": "n2.geojson",
             "starsBrightnessCategory": "B", "starsId": 12},
            {"id": "m3", "name": "South Main", "sourceFileName": "s1.geojson", "starsId": 21},
            {"id": "m4", "name": "South Sat", "sourceFileName": "s2.geojson"}
        ],
        "visibilityCenters": [{"Lat": 40.7, "Lon": -74.0}],
        "facility": {"id": "ZNY", "childFacilities": [
            {"id": "ACY", "name": "Atlantic City", "type": "Tracon",
             "starsConfiguration": {
                "areas": [
                    {"id": "a1", "name": "North", "visibilityCenter": {"lat": 39.45, "lon": -74.59},
                     "ssaAirports": ["ACY", "17N"]},
                    {"id": "a2", "name": "South", "ssaAirports": ["WWD"]}
                ],
                "videoMapIds": ["m1", "m2", "m3", "m4"],
                "mapGroups": [
                    {"id": "g1", "mapIds": ["m1", "m2"]},
                    {"id": "g2", "mapIds": ["m3", "m4"]}
                ]
             }}
        ]}
    }"#;

    fn station(icao: &str, lat: f64, lon: f64, kind: StationKind) -> Station {
        Station {
            icao: icao.to_string(),
            name: icao.to_string(),
            coordinate: Coordinate::new(lat, lon),
            elevation_ft: 0,
            kind,
        }
    }

    fn stations() -> StationLocator {
        StationLocator::new(vec![
            station("KDIX", 39.947, -74.4108, StationKind::Nexrad),
            station("TPHL", 39.9496, -74.9812, StationKind::Tdwr),
        ])
    }

    fn load_root(path: &Path) -> XmlElement {
        ProfileService::load_document(path).unwrap()
    }

    #[test]
    fn test_file_name() {
        let source = parse_source_str("ZNY", SOURCE).unwrap();
        let mut request = GenerationRequest::new(&source, "/tmp/out");
        assert_eq!(request.file_name(), "ZNY.xml");
        request.facility = source.find_facility("ACY");
        assert_eq!(request.file_name(), "ACY.xml");
        request.profile_name = Some("North Area".to_string());
        assert_eq!(request.file_name(), "ACY_North_Area.xml");
    }

    #[test]
    fn test_area_maps_fill_control_bar() {
        let temp = TempDir::new().unwrap();
        let source = parse_source_str("ZNY", SOURCE).unwrap();
        let facility = source.find_facility("ACY").unwrap();
        let area = facility.find_area("a2").unwrap();

        let airports = AirportResolver::bundled();
        let stations = stations();
        let generator = ProfileGenerator::new(airports, &stations);

        let mut request = GenerationRequest::new(&source, temp.path());
        request.facility = Some(facility);
        request.area = Some(area);
        request.maps = maps_for_area(facility, Some(area));

        let generated = generator.generate(&request).unwrap();
        assert_eq!(generated.video_map_files.len(), 2);
        // m3 keeps its declared number, m4 gets the next free one.
        assert_eq!(generated.video_map_files[0].map_number, 21);
        assert_eq!(generated.video_map_files[1].map_number, 22);
        assert_eq!(generated.dcb_map_list[0], 21);
        assert_eq!(generated.dcb_map_list[1], 22);
        assert_eq!(generated.dcb_map_list.iter().filter(|n| **n != 0).count(), 2);
        assert_eq!(generated.missing_assets, ["m3", "m4"]);

        // South has no coordinate, so the facility coordinate (first area) is used.
        assert_eq!(generated.home, Some(Coordinate::new(39.45, -74.59)));
        assert_eq!(generated.altimeter_stations, ["KWWD"]);

        let profile = read_target_profile("ACY", None, load_root(&generated.path));
        assert_eq!(profile.dcb_map_list.len(), 36);
        assert_eq!(profile.map_in_slot(1).map(|m| m.map_number), Some(22));
        assert_eq!(profile.video_map_files[0].dcb_button.as_deref(), Some("1"));
    }

    #[test]
    fn test_generated_document_sections() {
        let temp = TempDir::new().unwrap();
        let source = parse_source_str("ZNY", SOURCE).unwrap();
        let facility = source.find_facility("ACY").unwrap();
        let stations = stations();
        let generator = ProfileGenerator::new(AirportResolver::bundled(), &stations);

        let mut request = GenerationRequest::new(&source, temp.path());
        request.facility = Some(facility);
        request.area = facility.find_area("a1");
        request.defaults = Some(ProfileDefaults {
            font_name: Some("Arial".to_string()),
            font_size: Some(14),
            window_size: Some(crate::models::WindowSize {
                width: 800,
                height: 600,
            }),
            window_location: None,
        });

        let generated = generator.generate(&request).unwrap();
        assert_eq!(generated.radar_station.as_deref(), Some("KDIX"));
        assert_eq!(generated.altimeter_stations, ["KACY", "K17N"]);
        assert!(generated.video_map_files.is_empty());

        let root = load_root(&generated.path);
        assert_eq!(root.child_text("FontName"), Some("Arial"));
        assert_eq!(root.child_text("FontSize"), Some("14"));
        assert_eq!(root.descend(&["WindowSize", "Width"]).map(XmlElement::text_or_empty), Some("800"));
        assert_eq!(
            root.descend(&["HomeLocation", "Latitude"]).map(XmlElement::text_or_empty),
            Some("39.4500000")
        );
        assert_eq!(
            root.descend(&["CurrentPrefSet", "RangeRingLocation", "Longitude"])
                .map(XmlElement::text_or_empty),
            Some("-74.5900000")
        );

        let receiver = root.descend(&["Receivers", "Receiver"]).unwrap();
        assert_eq!(receiver.attribute("AssemblyQualifiedName"), Some(RECEIVER_ASSEMBLY_NAME));
        let client = receiver.child("ScopeServerClient").unwrap();
        assert_eq!(client.child_text("Name"), Some("ACY"));
        assert_eq!(client.child_text("Range"), Some("250"));
        assert_eq!(
            client.child_text("Url"),
            Some("https://dstars.graiani.com/dstars/ACY/updates")
        );

        let nexrad = root.child("Nexrad").unwrap();
        assert_eq!(nexrad.child_text("SensorID"), Some("KDIX"));
        assert_eq!(nexrad.child_text("DownloadInterval"), Some("300"));
        assert!(nexrad.child_text("URL").unwrap().contains("SI.kdix"));
        assert!(root.child("VideoMapFiles").is_none());
    }

    #[test]
    fn test_existing_profile_is_used_as_template() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("AAA.xml"),
            r#"<RadarWindow><CustomThing>keep</CustomThing><DBCFontName>Mono</DBCFontName>
               <Receivers><Receiver AssemblyQualifiedName="x"><ScopeServerClient>
               <Name>OLD</Name><Range>90</Range><Url>old</Url></ScopeServerClient></Receiver></Receivers>
               <Nexrad><Enabled>false</Enabled><SensorID>KOLD</SensorID></Nexrad></RadarWindow>"#,
        )
        .unwrap();
        fs::write(temp.path().join("ZZZ.xml"), "<Other/>").unwrap();

        let source = parse_source_str("ZNY", SOURCE).unwrap();
        let facility = source.find_facility("ACY").unwrap();
        let stations = stations();
        let generator = ProfileGenerator::new(AirportResolver::bundled(), &stations);
        let mut request = GenerationRequest::new(&source, temp.path());
        request.facility = Some(facility);

        let generated = generator.generate(&request).unwrap();
        assert_eq!(generated.template, Some(temp.path().join("AAA.xml")));

        let root = load_root(&generated.path);
        assert_eq!(root.name, "RadarWindow");
        assert_eq!(root.child_text("CustomThing"), Some("keep"));
        assert_eq!(root.child_text("DCBFontName"), Some("Mono"));

        let client = root.descend(&["Receivers", "Receiver", "ScopeServerClient"]).unwrap();
        assert_eq!(client.child_text("Name"), Some("ACY"));
        assert_eq!(client.child_text("Range"), Some("90"));
        assert_eq!(root.child("Receivers").unwrap().children.len(), 1);

        let nexrad = root.child("Nexrad").unwrap();
        assert_eq!(nexrad.child_text("Enabled"), Some("false"));
        assert_eq!(nexrad.child_text("SensorID"), Some("KDIX"));
    }

    #[test]
    fn test_assets_are_copied_when_found() {
        let temp = TempDir::new().unwrap();
        let assets = temp.path().join("assets");
        fs::create_dir_all(assets.join("ZNY")).unwrap();
        fs::write(assets.join("ZNY").join("m1.geojson"), "{}").unwrap();

        let source = parse_source_str("ZNY", SOURCE).unwrap();
        let facility = source.find_facility("ACY").unwrap();
        let stations = StationLocator::default();
        let generator =
            ProfileGenerator::new(AirportResolver::bundled(), &stations).with_video_map_root(Some(assets));

        let out = temp.path().join("out");
        let mut request = GenerationRequest::new(&source, &out);
        request.facility = Some(facility);
        request.maps = vec![facility.find_map("m1").unwrap().clone()];

        let generated = generator.generate(&request).unwrap();
        assert!(generated.missing_assets.is_empty());
        assert!(out.join("VideoMaps").join("ACY_n1.geojson").exists());
        assert!(generated.radar_station.is_none());
        // No area: the primary placement is used.
        assert_eq!(generated.dcb_map_list[0], 11);
    }

    #[test]
    fn test_first_selected_map_keeps_shared_slot() {
        let temp = TempDir::new().unwrap();
        let source = parse_source_str("ZNY", SOURCE).unwrap();
        let facility = source.find_facility("ACY").unwrap();
        let stations = StationLocator::default();
        let generator = ProfileGenerator::new(AirportResolver::bundled(), &stations);

        // m1 and m3 both sit first in their groups.
        let mut request = GenerationRequest::new(&source, temp.path());
        request.facility = Some(facility);
        request.maps = vec![
            facility.find_map("m1").unwrap().clone(),
            facility.find_map("m3").unwrap().clone(),
        ];
        let generated = generator.generate(&request).unwrap();
        assert_eq!(generated.dcb_map_list[0], 11);
        assert_eq!(generated.dcb_map_list.iter().filter(|n| **n != 0).count(), 1);
        assert_eq!(generated.video_map_files[0].dcb_button.as_deref(), Some("1"));
        assert_eq!(generated.video_map_files[1].dcb_button, None);

        request.maps.reverse();
        let generated = generator.generate(&request).unwrap();
        assert_eq!(generated.dcb_map_list[0], 21);
    }

    #[test]
    fn test_template_altimeter_stations_cleared_when_none_resolve() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("OLD.xml"),
            "<RadarWindow><AltimeterStations><string>KOLD</string></AltimeterStations></RadarWindow>",
        )
        .unwrap();

        let source = parse_source_str("ZNY", SOURCE).unwrap();
        let stations = StationLocator::default();
        let generator = ProfileGenerator::new(AirportResolver::bundled(), &stations);
        let request = GenerationRequest::new(&source, temp.path());

        let generated = generator.generate(&request).unwrap();
        assert!(generated.altimeter_stations.is_empty());
        let root = load_root(&generated.path);
        assert!(root.child("AltimeterStations").is_none());
    }

    #[test]
    fn test_far_radar_distance_is_reported() {
        let temp = TempDir::new().unwrap();
        let source = parse_source_str("ZNY", SOURCE).unwrap();
        let facility = source.find_facility("ACY").unwrap();
        let far = StationLocator::new(vec![station(
            "KMUX",
            37.155,
            -121.898,
            StationKind::Nexrad,
        )]);
        let generator = ProfileGenerator::new(AirportResolver::bundled(), &far);
        let mut request = GenerationRequest::new(&source, temp.path());
        request.facility = Some(facility);

        let generated = generator.generate(&request).unwrap();
        assert_eq!(generated.radar_station.as_deref(), Some("KMUX"));
        assert!(generated.radar_distance_nm.unwrap() > RADAR_WARN_DISTANCE_NM);

        let near = stations();
        let generated = ProfileGenerator::new(AirportResolver::bundled(), &near)
            .generate(&request)
            .unwrap();
        assert!(generated.radar_distance_nm.unwrap() < RADAR_WARN_DISTANCE_NM);
    }

    #[test]
    fn test_maps_for_area_orders_by_slot() {
        let source = parse_source_str("ZNY", SOURCE).unwrap();
        let facility = source.find_facility("ACY").unwrap();
        let north = maps_for_area(facility, facility.find_area("a1"));
        let ids: Vec<_> = north.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["m1", "m2"]);
        assert_eq!(maps_for_area(facility, None).len(), 4);
    }
}
