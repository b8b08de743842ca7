//! Configuration management CLI commands.

use crate::cli::common::{describe, print_json, CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Source client data folder (holds ARTCCs/ and VideoMaps/)
    #[arg(long, value_name = "DIR")]
    source_root: Option<PathBuf>,

    /// Radar-scope profiles folder (created if missing)
    #[arg(long, value_name = "DIR")]
    profiles_dir: Option<PathBuf>,

    /// Weather radar station table
    #[arg(long, value_name = "FILE")]
    stations_file: Option<PathBuf>,

    /// Airport table (OurAirports CSV)
    #[arg(long, value_name = "FILE")]
    airports_file: Option<PathBuf>,

    /// Default scope font family
    #[arg(long, value_name = "NAME")]
    font_name: Option<String>,

    /// Default scope font size
    #[arg(long, value_name = "SIZE")]
    font_size: Option<i32>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    config_file: Option<String>,
    paths: PathsOutput,
    defaults: DefaultsOutput,
}

#[derive(Serialize, Debug)]
struct PathsOutput {
    source_root: Option<String>,
    profiles_dir: Option<String>,
    stations_file: Option<String>,
    airports_file: Option<String>,
}

#[derive(Serialize, Debug)]
struct DefaultsOutput {
    font_name: Option<String>,
    font_size: Option<i32>,
    window_size: Option<String>,
    window_location: Option<String>,
}

fn display_path(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl From<&Config> for ConfigOutput {
    fn from(config: &Config) -> Self {
        Self {
            config_file: Config::config_file_path()
                .ok()
                .map(|p| p.to_string_lossy().to_string()),
            paths: PathsOutput {
                source_root: display_path(config.paths.source_root.as_ref()),
                profiles_dir: display_path(config.paths.profiles_dir.as_ref()),
                stations_file: display_path(config.paths.stations_file.as_ref()),
                airports_file: display_path(config.paths.airports_file.as_ref()),
            },
            defaults: DefaultsOutput {
                font_name: config.defaults.font_name.clone(),
                font_size: config.defaults.font_size,
                window_size: config
                    .defaults
                    .window_size
                    .map(|s| format!("{}x{}", s.width, s.height)),
                window_location: config
                    .defaults
                    .window_location
                    .map(|l| format!("{},{}", l.x, l.y)),
            },
        }
    }
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load().map_err(|e| {
            CliError::validation(format!("Failed to load configuration: {}", describe(&e)))
        })?;
        let output = ConfigOutput::from(&config);

        if self.json {
            return print_json(&output);
        }

        let unset = || "(not set)".to_string();
        println!("Configuration");
        println!(
            "  File:            {}",
            output.config_file.unwrap_or_else(unset)
        );
        println!();
        println!("Paths");
        println!(
            "  Source root:     {}",
            output.paths.source_root.unwrap_or_else(unset)
        );
        println!(
            "  Profiles:        {}",
            output.paths.profiles_dir.unwrap_or_else(unset)
        );
        println!(
            "  Station table:   {}",
            output
                .paths
                .stations_file
                .unwrap_or_else(|| "(bundled)".to_string())
        );
        println!(
            "  Airport table:   {}",
            output
                .paths
                .airports_file
                .unwrap_or_else(|| "(bundled)".to_string())
        );
        println!();
        println!("Profile defaults");
        println!(
            "  Font:            {}",
            output.defaults.font_name.unwrap_or_else(unset)
        );
        println!(
            "  Font size:       {}",
            output
                .defaults
                .font_size
                .map_or_else(unset, |s| s.to_string())
        );
        println!(
            "  Window size:     {}",
            output.defaults.window_size.unwrap_or_else(unset)
        );
        println!(
            "  Window location: {}",
            output.defaults.window_location.unwrap_or_else(unset)
        );

        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.source_root.is_none()
            && self.profiles_dir.is_none()
            && self.stations_file.is_none()
            && self.airports_file.is_none()
            && self.font_name.is_none()
            && self.font_size.is_none()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --source-root, --profiles-dir, --stations-file, --airports-file, --font-name, or --font-size",
            ));
        }

        let mut config = Config::load().unwrap_or_else(|_| Config::default());

        if let Some(path) = &self.source_root {
            if !path.is_dir() {
                return Err(CliError::validation(format!(
                    "Source root does not exist: {}",
                    path.display()
                )));
            }
            config.paths.source_root = Some(path.clone());
        }

        if let Some(path) = &self.profiles_dir {
            std::fs::create_dir_all(path).map_err(|e| {
                CliError::io(format!(
                    "Failed to create profiles directory {}: {}",
                    path.display(),
                    e
                ))
            })?;
            config.paths.profiles_dir = Some(path.clone());
        }

        if let Some(path) = &self.stations_file {
            if !path.is_file() {
                return Err(CliError::validation(format!(
                    "Station table not found: {}",
                    path.display()
                )));
            }
            config.paths.stations_file = Some(path.clone());
        }

        if let Some(path) = &self.airports_file {
            if !path.is_file() {
                return Err(CliError::validation(format!(
                    "Airport table not found: {}",
                    path.display()
                )));
            }
            config.paths.airports_file = Some(path.clone());
        }

        if let Some(name) = &self.font_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(CliError::validation("Font name cannot be empty"));
            }
            config.defaults.font_name = Some(name.to_string());
        }

        if let Some(size) = self.font_size {
            if !(4..=72).contains(&size) {
                return Err(CliError::validation(format!(
                    "Font size must be between 4 and 72 (got {size})"
                )));
            }
            config.defaults.font_size = Some(size);
        }

        config.save().map_err(|e| {
            CliError::io(format!("Failed to save configuration: {}", describe(&e)))
        })?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}
