//! Airport command: resolve local airport codes to ICAO codes.

use crate::cli::common::{bundled_airports, describe, print_json, CliError, CliResult};
use crate::config::Config;
use crate::services::AirportResolver;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Resolve local airport codes (e.g. ACY) to ICAO codes (e.g. KACY)
#[derive(Debug, Clone, Args)]
pub struct AirportArgs {
    /// Local codes to resolve
    #[arg(value_name = "CODE", required = true)]
    pub codes: Vec<String>,

    /// Region code of the facility (e.g. ZAN selects the Pacific prefix)
    #[arg(short, long, value_name = "CODE")]
    pub region: Option<String>,

    /// Airport table, OurAirports CSV (defaults to the bundled table)
    #[arg(long, value_name = "FILE")]
    pub airports: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ResolvedAirport {
    local: String,
    icao: String,
}

impl AirportArgs {
    /// Execute the airport command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::io(format!("Failed to load configuration: {}", describe(&e))))?;

        let custom;
        let resolver = match self.airports.as_ref().or(config.paths.airports_file.as_ref()) {
            Some(path) => {
                custom = AirportResolver::load(path).map_err(|e| CliError::io(describe(&e)))?;
                &custom
            }
            None => bundled_airports(),
        };
        let resolved: Vec<ResolvedAirport> = self
            .codes
            .iter()
            .map(|code| ResolvedAirport {
                local: code.clone(),
                icao: resolver.resolve(code, self.region.as_deref()),
            })
            .collect();

        if self.json {
            return print_json(&resolved);
        }

        for airport in &resolved {
            println!("{:<6} {}", airport.local, airport.icao);
        }

        Ok(())
    }
}
