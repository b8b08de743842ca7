//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test file uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A facility document with one TRACON, two areas, and two map groups.
///
/// - North (`a1`) has a coordinate and airports ACY and 17N.
/// - South (`a2`) has no coordinate and airport WWD.
/// - Group `g1` holds m1/m2 (declared numbers 11/12); `g2` holds m3/m4
///   (21 and none).
pub const SOURCE_JSON: &str = r#"{
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

/// A small existing profile with maps, a control bar, and a preference set.
pub const PROFILE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<RadarWindow>
  <FontName>Consolas</FontName>
  <FontSize>10</FontSize>
  <DBCFontName>Consolas</DBCFontName>
  <FadeTime>15</FadeTime>
  <HomeLocation><Latitude>39.45</Latitude><Longitude>-74.59</Longitude></HomeLocation>
  <WindowSize><Width>1024</Width><Height>768</Height></WindowSize>
  <VideoMapFiles>
    <VideoMapFile>
      <Filepath>VideoMaps/ACY_n1.geojson</Filepath>
      <MapNumber>11</MapNumber>
      <ShortName>NMAIN</ShortName>
      <DCBButton>1</DCBButton>
    </VideoMapFile>
  </VideoMapFiles>
  <TCP>
    <DCBMapList>
      <int>11</int>
    </DCBMapList>
  </TCP>
  <AltimeterStations><string>KACY</string></AltimeterStations>
  <CurrentPrefSet>
    <Range>60</Range>
    <PTLLength>2</PTLLength>
  </CurrentPrefSet>
</RadarWindow>
"#;

/// Header row of an OurAirports-style airport table.
pub const AIRPORTS_HEADER: &str = "id,ident,type,name,latitude_deg,longitude_deg,elevation_ft,continent,iso_country,iso_region,municipality,scheduled_service,icao_code,iata_code,gps_code,local_code,home_link,wikipedia_link,keywords";

/// One US airport row with the given ICAO, GPS and local codes.
pub fn airport_row(name: &str, icao: &str, gps: &str, local: &str) -> String {
    format!("1,{local},small_airport,{name},39.5,-74.6,50,NA,US,US-NJ,{name},no,{icao},,{gps},{local},,,")
}

/// One row of the fixed-width weather radar station table.
pub fn station_row(id: &str, name: &str, lat: &str, lon: &str, kind: &str) -> String {
    format!(
        "{:<9}{:<4}{:<6}{:<30}{:<19}{:>10}{:>11}{:>6}{:>5} {:<50}",
        "30000000", id, " 00000", name, "UNITED STATES NJ", lat, lon, "100", "-5", kind
    )
}

/// Writes a station table with a two-line header followed by `rows`.
pub fn write_station_table(path: &Path, rows: &[String]) -> PathBuf {
    fs::write(path, format!("HEADER\n------\n{}\n", rows.join("\n")))
        .expect("Failed to write station table");
    path.to_path_buf()
}

/// Path to the scopegen binary
pub fn scopegen_bin() -> &'static str {
    env!("CARGO_BIN_EXE_scopegen")
}

/// Creates a Command with an isolated config directory.
pub fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(scopegen_bin());
    cmd.env("SCOPEGEN_CONFIG_DIR", config_dir);
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd
}

/// Runs the binary with an isolated config directory.
pub fn run(args: &[&str], config_dir: &Path) -> Output {
    isolated_command(args, config_dir)
        .output()
        .expect("Failed to execute command")
}

/// Parses stdout as JSON, failing the test with stderr on error.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}). stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

/// Writes the sample facility document as `{dir}/ZNY.json`.
pub fn write_source(dir: &Path) -> PathBuf {
    let path = dir.join("ZNY.json");
    fs::write(&path, SOURCE_JSON).expect("Failed to write source document");
    path
}

/// Writes the sample profile to `path`, creating parent folders.
pub fn write_profile(path: &Path) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create profile folder");
    }
    fs::write(path, PROFILE_XML).expect("Failed to write profile");
    path.to_path_buf()
}

/// Temp workspace: `(temp, config_dir, source_path)`.
pub fn workspace() -> (TempDir, PathBuf, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config_dir = temp.path().join("config");
    fs::create_dir_all(&config_dir).expect("Failed to create config dir");
    let source = write_source(temp.path());
    (temp, config_dir, source)
}

/// Text of the first `<name>` element in `xml`, if any.
pub fn element_text<'a>(xml: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(xml[start..end].trim())
}

/// Every `<int>` value inside `DCBMapList`.
pub fn dcb_map_list(xml: &str) -> Vec<u32> {
    let Some(list) = element_text(xml, "DCBMapList") else {
        return Vec::new();
    };
    list.split("<int>")
        .skip(1)
        .filter_map(|part| part.split("</int>").next())
        .filter_map(|n| n.trim().parse().ok())
        .collect()
}
