//! Inspect command: summarize an existing radar-scope profile.

use crate::cli::common::{describe, print_json, CliError, CliResult};
use crate::models::{
    Coordinate, DisplaySettings, PrefSetSettings, TargetProfile, VideoMapFileEntry, WindowLocation,
    WindowSize,
};
use crate::services::ProfileService;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show what a radar-scope profile contains
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Profile to read
    #[arg(short, long, value_name = "FILE")]
    pub profile: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SlotOutput {
    slot: usize,
    map_number: u32,
    short_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct InspectOutput {
    name: String,
    path: PathBuf,
    display: DisplaySettings,
    home: Option<Coordinate>,
    window_size: Option<WindowSize>,
    window_location: Option<WindowLocation>,
    legacy_video_map: Option<String>,
    video_map_files: Vec<VideoMapFileEntry>,
    dcb_slots: Vec<SlotOutput>,
    altimeter_stations: Vec<String>,
    pref_set: Option<PrefSetSettings>,
    setting_count: usize,
}

impl InspectOutput {
    fn new(profile: TargetProfile, path: PathBuf) -> Self {
        let dcb_slots = profile
            .dcb_map_list
            .iter()
            .enumerate()
            .filter(|(_, number)| **number != 0)
            .map(|(slot, number)| SlotOutput {
                slot,
                map_number: *number,
                short_name: profile
                    .map_in_slot(slot)
                    .and_then(|entry| entry.short_name.clone()),
            })
            .collect();

        Self {
            setting_count: profile.settings.len(),
            name: profile.name,
            path,
            display: profile.display,
            home: profile.home,
            window_size: profile.window_size,
            window_location: profile.window_location,
            legacy_video_map: profile.legacy_video_map,
            video_map_files: profile.video_map_files,
            dcb_slots,
            altimeter_stations: profile.altimeter_stations,
            pref_set: profile.pref_set,
        }
    }
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self) -> CliResult<()> {
        if !self.profile.exists() {
            return Err(CliError::not_found(format!(
                "Profile not found: {}",
                self.profile.display()
            )));
        }

        let profile = ProfileService::load(&self.profile).map_err(|e| CliError::io(describe(&e)))?;
        let output = InspectOutput::new(profile, self.profile.clone());

        if self.json {
            return print_json(&output);
        }

        println!("Profile: {}", output.name);
        println!("  Path:       {}", output.path.display());
        if let Some(font) = &output.display.font_name {
            println!(
                "  Font:       {} {}",
                font,
                output
                    .display
                    .font_size
                    .map(|s| s.to_string())
                    .unwrap_or_default()
            );
        }
        if let Some(home) = output.home {
            println!("  Home:       {:.7}, {:.7}", home.lat, home.lon);
        }
        if let Some(size) = output.window_size {
            println!("  Window:     {}x{}", size.width, size.height);
        }
        if let Some(range) = output.pref_set.as_ref().map(|p| p.range) {
            println!("  Range:      {range} nm");
        }
        if !output.altimeter_stations.is_empty() {
            println!("  Altimeter:  {}", output.altimeter_stations.join(" "));
        }
        if let Some(legacy) = &output.legacy_video_map {
            println!("  Video map:  {legacy}");
        }
        println!("  Settings:   {}", output.setting_count);

        if !output.video_map_files.is_empty() {
            println!();
            println!("Maps ({}):", output.video_map_files.len());
            for entry in &output.video_map_files {
                println!(
                    "  {:>5}  {:<10} {}",
                    entry.map_number,
                    entry.short_name.as_deref().unwrap_or("-"),
                    entry.filepath
                );
            }
        }

        if !output.dcb_slots.is_empty() {
            println!();
            println!("Control bar:");
            for slot in &output.dcb_slots {
                println!(
                    "  Slot {:>2}  map {:>5}  {}",
                    slot.slot + 1,
                    slot.map_number,
                    slot.short_name.as_deref().unwrap_or("")
                );
            }
        }

        Ok(())
    }
}
