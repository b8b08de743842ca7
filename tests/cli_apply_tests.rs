//! End-to-end tests for `scopegen apply` command.

use std::fs;

mod fixtures;
use fixtures::*;

#[test]
fn test_apply_font_size_and_range() {
    let (temp, config_dir, _source) = workspace();
    let profile = write_profile(&temp.path().join("ACY.xml"));

    let output = run(
        &[
            "apply",
            "--profile",
            profile.to_str().unwrap(),
            "--font-size",
            "14",
            "--range",
            "120",
        ],
        &config_dir,
    );
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let xml = fs::read_to_string(&profile).unwrap();
    assert_eq!(element_text(&xml, "FontSize"), Some("14"));
    assert_eq!(element_text(&xml, "Range"), Some("120"));
    // Values not named keep what the profile had.
    assert_eq!(element_text(&xml, "PTLLength"), Some("2"));
    // Unrelated nodes survive the rewrite.
    assert_eq!(element_text(&xml, "FadeTime"), Some("15"));
    assert_eq!(dcb_map_list(&xml), [11]);
}

#[test]
fn test_apply_is_idempotent() {
    let (temp, config_dir, _source) = workspace();
    let profile = write_profile(&temp.path().join("ACY.xml"));
    let settings = temp.path().join("settings.json");
    fs::write(
        &settings,
        r#"{"range": 80, "history_num": 3, "brightness": {"dcb": 40}}"#,
    )
    .unwrap();

    let args = [
        "apply",
        "--profile",
        profile.to_str().unwrap(),
        "--settings",
        settings.to_str().unwrap(),
    ];

    assert_eq!(run(&args, &config_dir).status.code(), Some(0));
    let first = fs::read_to_string(&profile).unwrap();
    assert_eq!(run(&args, &config_dir).status.code(), Some(0));
    let second = fs::read_to_string(&profile).unwrap();

    assert_eq!(first, second);
    assert_eq!(element_text(&first, "HistoryNum"), Some("3"));
    assert_eq!(element_text(&first, "DCB"), Some("40"));
}

#[test]
fn test_apply_out_of_range_leaves_profile_untouched() {
    let (temp, config_dir, _source) = workspace();
    let profile = write_profile(&temp.path().join("ACY.xml"));
    let before = fs::read_to_string(&profile).unwrap();

    let output = run(
        &[
            "apply",
            "--profile",
            profile.to_str().unwrap(),
            "--font-size",
            "3",
        ],
        &config_dir,
    );
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("FontSize must be between 4 and 72"),
        "stderr: {stderr}"
    );
    assert_eq!(fs::read_to_string(&profile).unwrap(), before);
}

#[test]
fn test_apply_raw_settings() {
    let (temp, config_dir, _source) = workspace();
    let profile = write_profile(&temp.path().join("ACY.xml"));

    let output = run(
        &[
            "apply",
            "--profile",
            profile.to_str().unwrap(),
            "--set",
            "FadeTime=30",
            "--set",
            "NotASetting=1",
            "--json",
        ],
        &config_dir,
    );
    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    assert_eq!(json["raw_updated"], 1);
    assert_eq!(json["settings_applied"], false);

    let xml = fs::read_to_string(&profile).unwrap();
    assert_eq!(element_text(&xml, "FadeTime"), Some("30"));
    assert!(!xml.contains("NotASetting"));
}

#[test]
fn test_apply_round_trips_through_inspect() {
    let (temp, config_dir, _source) = workspace();
    let profile = write_profile(&temp.path().join("ACY.xml"));

    let output = run(
        &[
            "apply",
            "--profile",
            profile.to_str().unwrap(),
            "--range",
            "200",
        ],
        &config_dir,
    );
    assert_eq!(output.status.code(), Some(0));

    let output = run(
        &["inspect", "--profile", profile.to_str().unwrap(), "--json"],
        &config_dir,
    );
    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    assert_eq!(json["pref_set"]["range"], 200);
    assert_eq!(json["pref_set"]["ptl_length"], 2);
    assert_eq!(json["display"]["font_size"], 10);
}

#[test]
fn test_apply_without_changes_is_rejected() {
    let (temp, config_dir, _source) = workspace();
    let profile = write_profile(&temp.path().join("ACY.xml"));

    let output = run(&["apply", "--profile", profile.to_str().unwrap()], &config_dir);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_apply_invalid_settings_json() {
    let (temp, config_dir, _source) = workspace();
    let profile = write_profile(&temp.path().join("ACY.xml"));
    let settings = temp.path().join("settings.json");
    fs::write(&settings, r#"{"range": "far"}"#).unwrap();

    let output = run(
        &[
            "apply",
            "--profile",
            profile.to_str().unwrap(),
            "--settings",
            settings.to_str().unwrap(),
        ],
        &config_dir,
    );
    assert_eq!(output.status.code(), Some(1));
}
