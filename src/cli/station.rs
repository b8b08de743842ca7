//! Station command: find the weather radar station for a location.

use crate::cli::common::{describe, print_json, CliError, CliResult};
use crate::config::Config;
use crate::models::Coordinate;
use crate::services::{Station, StationLocator};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Find the weather radar station a profile at this location would use
#[derive(Debug, Clone, Args)]
#[command(allow_negative_numbers = true)]
pub struct StationArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees (negative west)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Station table to search (defaults to the configured or bundled table)
    #[arg(long, value_name = "FILE")]
    pub stations: Option<PathBuf>,

    /// Also list the N closest stations
    #[arg(short = 'n', long, default_value_t = 0)]
    pub count: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RankedStation<'a> {
    #[serde(flatten)]
    station: &'a Station,
    distance_nm: f64,
}

#[derive(Debug, Serialize)]
struct StationOutput<'a> {
    selected: Option<&'a Station>,
    nearby: Vec<RankedStation<'a>>,
}

impl StationArgs {
    /// Execute the station command
    pub fn execute(&self) -> CliResult<()> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lon) {
            return Err(CliError::validation(format!(
                "Coordinate out of range: {}, {}",
                self.lat, self.lon
            )));
        }

        let configured = match &self.stations {
            Some(path) => Some(path.clone()),
            None => Config::load()
                .map_err(|e| {
                    CliError::io(format!("Failed to load configuration: {}", describe(&e)))
                })?
                .paths
                .stations_file,
        };

        let custom;
        let locator = match configured {
            Some(path) => {
                custom = StationLocator::load(&path).map_err(|e| CliError::io(describe(&e)))?;
                &custom
            }
            None => StationLocator::bundled(),
        };

        let point = Coordinate::new(self.lat, self.lon);
        let output = StationOutput {
            selected: locator.nearest(point),
            nearby: locator
                .stations_by_distance(point)
                .into_iter()
                .take(self.count)
                .map(|(station, distance_nm)| RankedStation {
                    station,
                    distance_nm,
                })
                .collect(),
        };

        if self.json {
            return print_json(&output);
        }

        let Some(selected) = output.selected else {
            return Err(CliError::not_found("Station table is empty"));
        };

        println!(
            "{}  {}  ({:?}, {:.1} nm)",
            selected.icao,
            selected.name,
            selected.kind,
            point.distance_nm(&selected.coordinate)
        );
        for ranked in &output.nearby {
            println!(
                "  {:<5} {:<28} {:<6?} {:>7.1} nm",
                ranked.station.icao, ranked.station.name, ranked.station.kind, ranked.distance_nm
            );
        }

        Ok(())
    }
}
