//! Merge-maps command: combine map layers into one feature collection.

use crate::cli::common::{describe, print_json, CliError, CliResult};
use crate::services::merge_geojson_files;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Merge several GeoJSON map layers into a single file
#[derive(Debug, Clone, Args)]
pub struct MergeMapsArgs {
    /// Output GeoJSON file
    #[arg(short, long, value_name = "FILE")]
    pub out: PathBuf,

    /// Input GeoJSON files
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output a JSON summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct MergeOutput<'a> {
    output: &'a PathBuf,
    inputs: usize,
    features: usize,
}

impl MergeMapsArgs {
    /// Execute the merge-maps command
    pub fn execute(&self) -> CliResult<()> {
        let features = merge_geojson_files(&self.inputs, &self.out)
            .map_err(|e| CliError::validation(describe(&e)))?;

        if self.json {
            return print_json(&MergeOutput {
                output: &self.out,
                inputs: self.inputs.len(),
                features,
            });
        }

        println!(
            "Merged {} features from {} files into {}",
            features,
            self.inputs.len(),
            self.out.display()
        );

        Ok(())
    }
}
