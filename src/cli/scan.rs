//! Scan command: list the controlled facilities in source documents.

use crate::cli::common::{describe, print_json, CliError, CliResult};
use crate::config::Config;
use crate::models::SourceProfile;
use crate::parser::{load_source_profile, scan_source_dir};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// List controlled facilities, areas and maps found in source documents
#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Source document or folder of documents (defaults to the configured source root)
    #[arg(short, long, value_name = "FILE|DIR")]
    pub source: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct AreaItem {
    id: String,
    name: String,
    airports: Vec<String>,
    map_group: Option<String>,
}

#[derive(Debug, Serialize)]
struct FacilityItem {
    id: String,
    name: String,
    facility_type: String,
    has_radar_config: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
    airports: Vec<String>,
    areas: Vec<AreaItem>,
    maps: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SourceItem {
    code: String,
    path: Option<PathBuf>,
    video_map_count: usize,
    facilities: Vec<FacilityItem>,
}

impl From<&SourceProfile> for SourceItem {
    fn from(profile: &SourceProfile) -> Self {
        Self {
            code: profile.code.clone(),
            path: profile.path.clone(),
            video_map_count: profile.video_maps.len(),
            facilities: profile
                .facilities
                .iter()
                .map(|f| FacilityItem {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    facility_type: f.facility_type.clone(),
                    has_radar_config: f.has_radar_config,
                    latitude: f.coordinate.map(|c| c.lat),
                    longitude: f.coordinate.map(|c| c.lon),
                    airports: f.airports.clone(),
                    areas: f
                        .areas
                        .iter()
                        .map(|a| AreaItem {
                            id: a.id.clone(),
                            name: a.name.clone(),
                            airports: a.airports.clone(),
                            map_group: a.map_group_id.clone(),
                        })
                        .collect(),
                    maps: f.available_maps.iter().map(|m| m.id.clone()).collect(),
                })
                .collect(),
        }
    }
}

impl ScanArgs {
    /// Execute the scan command
    pub fn execute(&self) -> CliResult<()> {
        let source = match &self.source {
            Some(path) => path.clone(),
            None => Config::load()
                .map_err(|e| CliError::io(format!("Failed to load configuration: {}", describe(&e))))?
                .paths
                .source_documents_dir()
                .ok_or_else(|| {
                    CliError::validation("No --source given and no source root configured")
                })?,
        };

        if !source.exists() {
            return Err(CliError::io(format!(
                "Source not found: {}",
                source.display()
            )));
        }

        let profiles = if source.is_dir() {
            scan_source_dir(&source)
        } else {
            load_source_profile(&source).map(|p| vec![p])
        }
        .map_err(|e| CliError::io(describe(&e)))?;

        let items: Vec<SourceItem> = profiles.iter().map(SourceItem::from).collect();

        if self.json {
            return print_json(&items);
        }

        if items.is_empty() {
            println!("No source documents found.");
            return Ok(());
        }

        for item in &items {
            println!(
                "{} ({} maps, {} facilities)",
                item.code,
                item.video_map_count,
                item.facilities.len()
            );
            for facility in &item.facilities {
                println!(
                    "  {:<8} {:<32} {:<10} {} areas, {} maps",
                    facility.id,
                    facility.name,
                    facility.facility_type,
                    facility.areas.len(),
                    facility.maps.len()
                );
                for area in &facility.areas {
                    println!(
                        "      {:<12} {:<24} {}",
                        area.id,
                        area.name,
                        area.airports.join(" ")
                    );
                }
            }
        }

        Ok(())
    }
}
