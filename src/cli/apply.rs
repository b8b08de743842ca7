//! Apply command: write display settings onto an existing profile.

use crate::cli::common::{describe, print_json, CliError, CliResult};
use crate::models::PrefSetSettings;
use crate::services::ProfileService;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Apply display settings to a radar-scope profile
#[derive(Debug, Clone, Args)]
pub struct ApplyArgs {
    /// Profile to update
    #[arg(short, long, value_name = "FILE")]
    pub profile: PathBuf,

    /// JSON file with settings (snake_case field names, partial objects allowed)
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Scope font size
    #[arg(long, value_name = "SIZE")]
    pub font_size: Option<i32>,

    /// Display range in nautical miles
    #[arg(long, value_name = "NM")]
    pub range: Option<i32>,

    /// Raw root setting to overwrite (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Output a JSON summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ApplyOutput {
    profile: PathBuf,
    settings_applied: bool,
    raw_updated: usize,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Overlays `patch` onto `base`, recursing into nested objects.
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

impl ApplyArgs {
    fn has_typed_changes(&self) -> bool {
        self.settings.is_some() || self.font_size.is_some() || self.range.is_some()
    }

    /// Builds the settings to write, starting from the profile's current values.
    fn resolve_settings(&self, current: PrefSetSettings) -> CliResult<PrefSetSettings> {
        let mut settings = current;

        if let Some(path) = &self.settings {
            let text = fs::read_to_string(path).map_err(|e| {
                CliError::io(format!("Failed to read settings {}: {}", path.display(), e))
            })?;
            let patch: Value = serde_json::from_str(&text).map_err(|e| {
                CliError::validation(format!("Invalid settings JSON {}: {}", path.display(), e))
            })?;
            if !patch.is_object() {
                return Err(CliError::validation(
                    "Settings JSON must be an object of field names to values",
                ));
            }

            let mut merged = serde_json::to_value(&settings)
                .map_err(|e| CliError::io(format!("Failed to serialize settings: {e}")))?;
            merge_json(&mut merged, patch);
            settings = serde_json::from_value(merged)
                .map_err(|e| CliError::validation(format!("Invalid settings: {e}")))?;
        }

        if let Some(size) = self.font_size {
            settings.font_size = size;
        }
        if let Some(range) = self.range {
            settings.range = range;
        }

        settings
            .validate()
            .map_err(|e| CliError::validation(e.to_string()))?;

        Ok(settings)
    }

    /// Execute the apply command
    pub fn execute(&self) -> CliResult<()> {
        if !self.has_typed_changes() && self.set.is_empty() {
            return Err(CliError::validation(
                "Nothing to apply: pass --settings, --font-size, --range, or --set",
            ));
        }

        let profile = ProfileService::load(&self.profile).map_err(|e| CliError::io(describe(&e)))?;

        let settings_applied = if self.has_typed_changes() {
            let settings = self.resolve_settings(profile.pref_set.clone().unwrap_or_default())?;
            ProfileService::apply_pref_set(&self.profile, &settings)
                .map_err(|e| CliError::io(describe(&e)))?;
            true
        } else {
            false
        };

        let raw_updated = if self.set.is_empty() {
            0
        } else {
            let values: BTreeMap<String, String> = self.set.iter().cloned().collect();
            ProfileService::apply_settings_bag(&self.profile, &values)
                .map_err(|e| CliError::io(describe(&e)))?
        };

        let output = ApplyOutput {
            profile: self.profile.clone(),
            settings_applied,
            raw_updated,
        };

        if self.json {
            return print_json(&output);
        }

        println!("Updated {}", output.profile.display());
        if output.settings_applied {
            println!("  Display settings applied");
        }
        if !self.set.is_empty() {
            println!("  {} of {} raw settings updated", raw_updated, self.set.len());
        }

        Ok(())
    }
}
