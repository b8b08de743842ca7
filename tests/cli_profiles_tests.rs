//! End-to-end tests for `scopegen profiles`, `scopegen scan` and
//! `scopegen merge-maps` commands.

use std::fs;

mod fixtures;
use fixtures::*;

#[test]
fn test_profiles_grouped_by_region_and_facility() {
    let (temp, config_dir, _source) = workspace();
    let root = temp.path().join("Profiles");
    write_profile(&root.join("ZNY").join("ACY").join("ACY_North.xml"));
    write_profile(&root.join("ZNY").join("ACY").join("ACY.xml"));
    write_profile(&root.join("ZDC").join("PCT").join("PCT.xml"));
    fs::write(root.join("ZDC").join("PCT").join("broken.xml"), "<nope").unwrap();
    fs::write(root.join("ZNY").join("ACY").join("notes.txt"), "skip").unwrap();

    let output = run(
        &["profiles", "--root", root.to_str().unwrap(), "--json"],
        &config_dir,
    );
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = stdout_json(&output);
    let folders = json.as_array().unwrap();
    assert_eq!(folders.len(), 2);
    assert_eq!(folders[0]["region"], "ZDC");
    assert_eq!(folders[0]["facility"], "PCT");
    assert_eq!(folders[0]["profiles"].as_array().unwrap().len(), 1);
    assert_eq!(folders[1]["region"], "ZNY");
    let names: Vec<&str> = folders[1]["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["ACY", "ACY_North"]);
}

#[test]
fn test_profiles_requires_root() {
    let (_temp, config_dir, _source) = workspace();
    let output = run(&["profiles"], &config_dir);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_scan_single_document() {
    let (_temp, config_dir, source) = workspace();

    let output = run(
        &["scan", "--source", source.to_str().unwrap(), "--json"],
        &config_dir,
    );
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = stdout_json(&output);
    assert_eq!(json[0]["code"], "ZNY");
    assert_eq!(json[0]["video_map_count"], 4);
    let facility = &json[0]["facilities"][0];
    assert_eq!(facility["id"], "ACY");
    assert_eq!(facility["areas"][0]["name"], "North");
    assert_eq!(facility["areas"][1]["id"], "a2");
    assert_eq!(facility["maps"].as_array().unwrap().len(), 4);
}

#[test]
fn test_scan_configured_source_root() {
    let (temp, config_dir, _source) = workspace();
    let root = temp.path().join("CRC");
    let documents = root.join("ARTCCs");
    fs::create_dir_all(&documents).unwrap();
    write_source(&documents);
    fs::write(documents.join("ZZZ.json"), "not json").unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!("[paths]\nsource_root = {:?}\n", root.to_str().unwrap()),
    )
    .unwrap();

    let output = run(&["scan", "--json"], &config_dir);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json = stdout_json(&output);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["code"], "ZNY");
}

#[test]
fn test_scan_missing_source() {
    let (temp, config_dir, _source) = workspace();
    let output = run(
        &[
            "scan",
            "--source",
            temp.path().join("missing").to_str().unwrap(),
        ],
        &config_dir,
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_merge_maps() {
    let (temp, config_dir, _source) = workspace();
    let a = temp.path().join("a.geojson");
    let b = temp.path().join("b.geojson");
    let bad = temp.path().join("bad.geojson");
    fs::write(
        &a,
        r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":null}]}"#,
    )
    .unwrap();
    fs::write(
        &b,
        r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"n":1},"geometry":null},{"type":"Feature","properties":{"n":2},"geometry":null}]}"#,
    )
    .unwrap();
    fs::write(&bad, "{").unwrap();
    let out = temp.path().join("merged.geojson");

    let output = run(
        &[
            "merge-maps",
            "--out",
            out.to_str().unwrap(),
            a.to_str().unwrap(),
            b.to_str().unwrap(),
            bad.to_str().unwrap(),
            "--json",
        ],
        &config_dir,
    );
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout_json(&output)["features"], 3);

    let merged: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(merged["type"], "FeatureCollection");
    assert_eq!(merged["features"].as_array().unwrap().len(), 3);
}

#[test]
fn test_merge_maps_without_features_fails() {
    let (temp, config_dir, _source) = workspace();
    let bad = temp.path().join("bad.geojson");
    fs::write(&bad, "{").unwrap();
    let out = temp.path().join("merged.geojson");

    let output = run(
        &[
            "merge-maps",
            "--out",
            out.to_str().unwrap(),
            bad.to_str().unwrap(),
        ],
        &config_dir,
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
}
