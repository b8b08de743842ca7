//! Profiles command: list radar-scope profiles grouped by folder.

use crate::cli::common::{describe, print_json, CliError, CliResult};
use crate::config::Config;
use crate::services::ProfileService;
use clap::Args;
use std::path::PathBuf;

/// List radar-scope profiles grouped by region and facility folder
#[derive(Debug, Clone, Args)]
pub struct ProfilesArgs {
    /// Profiles folder (defaults to the configured profiles directory)
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ProfilesArgs {
    /// Execute the profiles command
    pub fn execute(&self) -> CliResult<()> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => Config::load()
                .map_err(|e| {
                    CliError::io(format!("Failed to load configuration: {}", describe(&e)))
                })?
                .paths
                .profiles_dir
                .ok_or_else(|| {
                    CliError::validation("No --root given and no profiles directory configured")
                })?,
        };

        let folders = ProfileService::scan(&root).map_err(|e| CliError::io(describe(&e)))?;

        if self.json {
            return print_json(&folders);
        }

        if folders.is_empty() {
            println!("No profiles found under {}", root.display());
            return Ok(());
        }

        for folder in &folders {
            println!(
                "{}/{} ({} profiles)",
                folder.region,
                folder.facility,
                folder.profiles.len()
            );
            for profile in &folder.profiles {
                println!("  {:<24} {}", profile.name, profile.path.display());
            }
        }

        Ok(())
    }
}
