//! Generate command: build a radar-scope profile for one facility.

use crate::cli::common::{bundled_airports, describe, print_json, CliError, CliResult};
use crate::config::Config;
use crate::models::VideoMapDescriptor;
use crate::parser::load_source_profile;
use crate::services::{
    maps_for_area, AirportResolver, GenerationRequest, ProfileGenerator, StationLocator,
};
use clap::Args;
use std::path::PathBuf;

/// Generate a radar-scope profile from a source document
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Source facility document (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub source: PathBuf,

    /// Controlled facility id (e.g. ACY)
    #[arg(short, long, value_name = "ID")]
    pub facility: String,

    /// Area id or name within the facility
    #[arg(short, long, value_name = "ID")]
    pub area: Option<String>,

    /// Map id to include (repeatable)
    #[arg(short, long = "map", value_name = "ID")]
    pub maps: Vec<String>,

    /// Include every map available to the facility
    #[arg(long, conflicts_with = "maps")]
    pub all_maps: bool,

    /// Output folder (defaults to `{profiles_dir}/{region}/{facility}`)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Folder map assets are copied from (defaults to `{source_root}/VideoMaps`)
    #[arg(long, value_name = "DIR")]
    pub video_maps: Option<PathBuf>,

    /// Weather radar station table (defaults to the bundled table)
    #[arg(long, value_name = "FILE")]
    pub stations: Option<PathBuf>,

    /// Airport table, OurAirports CSV (defaults to the bundled table)
    #[arg(long, value_name = "FILE")]
    pub airports: Option<PathBuf>,

    /// Profile name suffix (`{facility}_{name}.xml`)
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Skip the configured font and window defaults
    #[arg(long)]
    pub no_defaults: bool,

    /// Output a JSON summary
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::io(format!("Failed to load configuration: {}", describe(&e))))?;

        let source = load_source_profile(&self.source).map_err(|e| CliError::io(describe(&e)))?;

        let facility = source.find_facility(&self.facility).ok_or_else(|| {
            CliError::not_found(format!(
                "Facility '{}' not found in {} (available: {})",
                self.facility,
                source.code,
                source
                    .facilities
                    .iter()
                    .map(|f| f.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        let area = match &self.area {
            Some(key) => Some(facility.find_area(key).ok_or_else(|| {
                CliError::not_found(format!("Area '{key}' not found in {}", facility.id))
            })?),
            None => None,
        };

        let maps: Vec<VideoMapDescriptor> = if self.all_maps {
            facility.available_maps.clone()
        } else if !self.maps.is_empty() {
            self.maps
                .iter()
                .map(|id| {
                    facility.find_map(id).cloned().ok_or_else(|| {
                        CliError::not_found(format!("Map '{id}' is not available to {}", facility.id))
                    })
                })
                .collect::<CliResult<_>>()?
        } else if area.is_some() {
            maps_for_area(facility, area)
        } else {
            Vec::new()
        };

        let out_dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => config
                .paths
                .profiles_dir
                .as_ref()
                .map(|root| root.join(&source.code).join(&facility.id))
                .ok_or_else(|| {
                    CliError::validation("No --out-dir given and no profiles directory configured")
                })?,
        };

        let custom_stations;
        let stations = match self.stations.as_ref().or(config.paths.stations_file.as_ref()) {
            Some(path) => {
                custom_stations =
                    StationLocator::load(path).map_err(|e| CliError::io(describe(&e)))?;
                &custom_stations
            }
            None => StationLocator::bundled(),
        };

        let custom_airports;
        let airports = match self.airports.as_ref().or(config.paths.airports_file.as_ref()) {
            Some(path) => {
                custom_airports =
                    AirportResolver::load(path).map_err(|e| CliError::io(describe(&e)))?;
                &custom_airports
            }
            None => bundled_airports(),
        };

        let video_map_root = self
            .video_maps
            .clone()
            .or_else(|| config.paths.video_maps_dir());

        let generator = ProfileGenerator::new(airports, stations)
            .with_video_map_root(video_map_root);

        let mut request = GenerationRequest::new(&source, out_dir);
        request.facility = Some(facility);
        request.area = area;
        request.maps = maps;
        request.profile_name.clone_from(&self.name);
        if !self.no_defaults && !config.defaults.is_empty() {
            request.defaults = Some(config.defaults.clone());
        }

        let generated = generator
            .generate(&request)
            .map_err(|e| CliError::io(format!("Failed to generate profile: {}", describe(&e))))?;

        if self.json {
            return print_json(&generated);
        }

        println!("Generated {} -> {}", generated.name, generated.path.display());
        if let Some(template) = &generated.template {
            println!("  Template:  {}", template.display());
        }
        if let Some(home) = generated.home {
            println!("  Home:      {:.7}, {:.7}", home.lat, home.lon);
        }
        if !generated.altimeter_stations.is_empty() {
            println!("  Altimeter: {}", generated.altimeter_stations.join(" "));
        }
        if let (Some(station), Some(distance)) =
            (&generated.radar_station, generated.radar_distance_nm)
        {
            println!("  Radar:     {station} ({distance:.0} nm)");
        }
        for entry in &generated.video_map_files {
            println!(
                "  Map {:>4}  button {:<3} {}",
                entry.map_number,
                entry.dcb_button.as_deref().unwrap_or("-"),
                entry.filepath
            );
        }
        if !generated.missing_assets.is_empty() {
            println!(
                "  Missing map assets (metadata only): {}",
                generated.missing_assets.join(", ")
            );
        }

        Ok(())
    }
}
