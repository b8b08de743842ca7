//! Map layer file handling.
//!
//! Copies the GeoJSON asset behind each selected map into a profile folder
//! and merges several layers into one feature collection.

use crate::constants::VIDEO_MAPS_DIR;
use crate::models::VideoMapDescriptor;
use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of placing one map layer into a profile folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedMap {
    /// Id of the map descriptor
    pub map_id: String,
    /// Where the layer lives (or would live) inside the profile folder
    pub destination: PathBuf,
    /// Whether the asset was found and copied
    pub copied: bool,
}

/// Destination file name for a map: `{prefix}_{basename}`.
///
/// Any directory part of `source_file_name` is dropped. An empty prefix
/// keeps the bare name; an empty name falls back to `map.geojson`.
pub fn destination_file_name(prefix: &str, source_file_name: &str) -> String {
    let base = Path::new(source_file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty());

    match (prefix.trim().is_empty(), base) {
        (false, Some(base)) => format!("{prefix}_{base}"),
        (false, None) => format!("{prefix}_map.geojson"),
        (true, Some(base)) => base,
        (true, None) => "map.geojson".to_string(),
    }
}

/// Candidate asset paths for a map, most specific first.
///
/// Assets are stored as `{root}/{region}/{id}.geojson`; the raw source
/// file name under `root` is the fallback.
pub fn source_candidates(root: &Path, region: &str, map: &VideoMapDescriptor) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);
    if !map.id.is_empty() {
        candidates.push(root.join(region).join(format!("{}.geojson", map.id)));
    }
    if !map.source_file_name.is_empty() {
        candidates.push(root.join(&map.source_file_name));
    }
    candidates
}

/// Copies the asset for `map` into `{profile_dir}/VideoMaps/`.
///
/// A missing or uncopyable asset is logged and reported through
/// [`MaterializedMap::copied`]; only failing to create the destination
/// folder is an error.
pub fn materialize_map(
    map: &VideoMapDescriptor,
    region: &str,
    prefix: &str,
    asset_root: Option<&Path>,
    profile_dir: &Path,
) -> Result<MaterializedMap> {
    let maps_dir = profile_dir.join(VIDEO_MAPS_DIR);
    fs::create_dir_all(&maps_dir)
        .with_context(|| format!("Failed to create map folder: {}", maps_dir.display()))?;

    let destination = maps_dir.join(destination_file_name(prefix, &map.source_file_name));
    let mut copied = false;

    match asset_root {
        Some(root) => {
            let candidates = source_candidates(root, region, map);
            match candidates.iter().find(|p| p.is_file()) {
                Some(source) => match fs::copy(source, &destination) {
                    Ok(_) => {
                        debug!("Copied map {} -> {}", source.display(), destination.display());
                        copied = true;
                    }
                    Err(e) => warn!("Failed to copy map {}: {e}", source.display()),
                },
                None => warn!(
                    "Map asset for '{}' not found (tried {})",
                    map.id,
                    candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }
        }
        None => warn!("No map asset folder configured; '{}' written without geometry", map.id),
    }

    Ok(MaterializedMap {
        map_id: map.id.clone(),
        destination,
        copied,
    })
}

fn read_features(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read map layer: {}", path.display()))?;
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse map layer: {}", path.display()))?;
    Ok(match document.get("features") {
        Some(Value::Array(features)) => features.iter().filter(|f| !f.is_null()).cloned().collect(),
        _ => Vec::new(),
    })
}

/// Concatenates the features of several GeoJSON layers into one
/// `FeatureCollection` written to `output`.
///
/// Inputs that cannot be read or parsed are skipped with a warning.
/// Returns the number of features written.
///
/// # Errors
///
/// Fails when no input contributes a feature, or when the output cannot be
/// written.
pub fn merge_geojson_files(sources: &[PathBuf], output: &Path) -> Result<usize> {
    let mut features = Vec::new();
    for source in sources {
        match read_features(source) {
            Ok(mut found) => {
                debug!("{} features from {}", found.len(), source.display());
                features.append(&mut found);
            }
            Err(e) => warn!("Skipping map layer: {e:#}"),
        }
    }

    if features.is_empty() {
        bail!("No features found in {} input layer(s)", sources.len());
    }

    let count = features.len();
    let merged = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    let text = serde_json::to_string_pretty(&merged).context("Failed to serialize merged layer")?;
    fs::write(output, text)
        .with_context(|| format!("Failed to write merged layer: {}", output.display()))?;
    Ok(count)
}
