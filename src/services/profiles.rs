//! Radar-scope profile file I/O.
//!
//! Every profile read goes through the legacy name patch, and every write is
//! a full-document rewrite through a temp file and a rename.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::models::{PrefSetSettings, TargetProfile};
use crate::parser::target_xml::{self, patch_legacy_names};
use crate::parser::XmlElement;

/// One profile found by [`ProfileService::scan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileEntry {
    /// File stem
    pub name: String,
    /// Profile file
    pub path: PathBuf,
}

/// Profiles grouped by `{region}/{facility}` folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileFolder {
    /// First folder below the scan root
    pub region: String,
    /// Second folder below the scan root (the region again when absent)
    pub facility: String,
    /// Folder holding the profiles
    pub path: PathBuf,
    /// Profiles in the folder, sorted by file name
    pub profiles: Vec<ProfileEntry>,
}

/// Service for loading, saving, and finding radar-scope profiles.
pub struct ProfileService;

impl ProfileService {
    /// Parses a profile file.
    ///
    /// Legacy `DBCFont*` names are patched before parsing.
    pub fn load_document(path: &Path) -> Result<XmlElement> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile: {}", path.display()))?;
        XmlElement::parse(&patch_legacy_names(&text))
            .with_context(|| format!("Failed to parse profile: {}", path.display()))
    }

    /// Loads a profile file into its typed view.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use scopegen::services::ProfileService;
    ///
    /// let profile = ProfileService::load(Path::new("ACY.xml"))?;
    /// println!("{} maps", profile.video_map_files.len());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(path: &Path) -> Result<TargetProfile> {
        let document = Self::load_document(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(target_xml::read_target_profile(&name, Some(path.to_path_buf()), document))
    }

    /// Writes a document to `path` using a temp file + rename.
    pub fn save_document(document: &XmlElement, path: &Path) -> Result<()> {
        let content = document.to_xml_string()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = path.with_extension("xml.tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write temp profile: {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp profile to: {}", path.display()))?;

        debug!("Saved profile {}", path.display());
        Ok(())
    }

    /// Saves a profile's document to `path`.
    pub fn save(profile: &TargetProfile, path: &Path) -> Result<()> {
        Self::save_document(&profile.document, path)
    }

    /// Applies a full settings object to a profile file and rewrites it.
    ///
    /// Nothing is written when validation fails.
    pub fn apply_pref_set(path: &Path, settings: &PrefSetSettings) -> Result<()> {
        let mut document = Self::load_document(path)?;
        target_xml::apply_pref_set(&mut document, settings)?;
        Self::save_document(&document, path)
    }

    /// Writes key/value pairs onto existing scalar root nodes and rewrites
    /// the file.
    ///
    /// Keys with no matching scalar node are ignored. Returns how many nodes
    /// were updated.
    pub fn apply_settings_bag(path: &Path, values: &BTreeMap<String, String>) -> Result<usize> {
        let mut document = Self::load_document(path)?;

        let mut updated = 0;
        for (key, value) in values {
            match document.child_mut(key).filter(|node| node.is_scalar()) {
                Some(node) => {
                    node.text = Some(value.clone());
                    updated += 1;
                }
                None => debug!("Ignoring unknown setting '{key}'"),
            }
        }

        Self::save_document(&document, path)?;
        Ok(updated)
    }

    /// Finds every profile under `root`, grouped by folder.
    ///
    /// Files that fail to parse are skipped; folders left without profiles
    /// are not returned. A missing root yields an empty list.
    pub fn scan(root: &Path) -> Result<Vec<ProfileFolder>> {
        let mut folders: BTreeMap<(String, String), ProfileFolder> = BTreeMap::new();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        for file in find_xml_files(root)? {
            if let Err(e) = Self::load_document(&file) {
                warn!("Skipping {}: {e:#}", file.display());
                continue;
            }

            let dir = file.parent().unwrap_or(root).to_path_buf();
            let parts: Vec<String> = dir
                .strip_prefix(root)
                .map(|rel| {
                    rel.components()
                        .filter_map(|c| match c {
                            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                            _ => None,
                        })
                        .collect()
                })
                .unwrap_or_default();

            let (region, facility) = match parts.as_slice() {
                [] => ("Unknown".to_string(), "Profiles".to_string()),
                [only] => (only.clone(), only.clone()),
                [first, second, ..] => (first.clone(), second.clone()),
            };

            let name = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            folders
                .entry((region.clone(), facility.clone()))
                .or_insert_with(|| ProfileFolder {
                    region,
                    facility,
                    path: dir,
                    profiles: Vec::new(),
                })
                .profiles
                .push(ProfileEntry { name, path: file });
        }

        Ok(folders.into_values().collect())
    }
}

fn find_xml_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir == root => {
                return Err(e).with_context(|| format!("Failed to read directory: {}", root.display()));
            }
            Err(e) => {
                warn!("Skipping unreadable folder {}: {e}", dir.display());
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if has_xml_extension(&path) {
                found.insert(path);
            }
        }
    }

    Ok(found.into_iter().collect())
}

/// True when `path` ends in `.xml` (any case).
pub fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

/// Makes a profile name safe to use inside a file name.
///
/// Path separators, colons and spaces become underscores.
///
/// # Examples
///
/// ```
/// use scopegen::services::profiles::sanitize_filename;
///
/// assert_eq!(sanitize_filename("North Area"), "North_Area");
/// assert_eq!(sanitize_filename("a/b:c"), "a_b_c");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    name.trim().replace(['/', '\\', ':', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROFILE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<RadarWindow>
  <FontName>Consolas</FontName>
  <DBCFontSize>9</DBCFontSize>
  <ScreenRotation>0</ScreenRotation>
  <HomeLocation><Latitude>1</Latitude><Longitude>2</Longitude></HomeLocation>
</RadarWindow>"#;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Main"), "Main");
        assert_eq!(sanitize_filename(" Area\\B "), "Area_B");
    }

    #[test]
    fn test_load_patches_legacy_names() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("ACY.xml");
        fs::write(&path, PROFILE)?;

        let profile = ProfileService::load(&path)?;
        assert_eq!(profile.name, "ACY");
        assert_eq!(profile.settings.get("DCBFontSize").map(String::as_str), Some("9"));
        assert_eq!(profile.path.as_deref(), Some(path.as_path()));
        Ok(())
    }

    #[test]
    fn test_save_leaves_no_temp_file() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("nested").join("ACY.xml");
        ProfileService::save_document(&XmlElement::parse(PROFILE)?, &path)?;

        assert!(path.exists());
        assert!(!path.with_extension("xml.tmp").exists());
        assert!(fs::read_to_string(&path)?.starts_with("<?xml"));
        Ok(())
    }

    #[test]
    fn test_apply_settings_bag_only_touches_scalars() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("ACY.xml");
        fs::write(&path, PROFILE)?;

        let values = BTreeMap::from([
            ("FontName".to_string(), "Arial".to_string()),
            ("HomeLocation".to_string(), "nope".to_string()),
            ("NotThere".to_string(), "x".to_string()),
        ]);
        let updated = ProfileService::apply_settings_bag(&path, &values)?;
        assert_eq!(updated, 1);

        let profile = ProfileService::load(&path)?;
        assert_eq!(profile.display.font_name.as_deref(), Some("Arial"));
        assert!(profile.home.is_some());
        assert!(!profile.settings.contains_key("NotThere"));
        Ok(())
    }

    #[test]
    fn test_apply_pref_set_rejects_invalid() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("ACY.xml");
        fs::write(&path, PROFILE)?;

        let settings = PrefSetSettings {
            font_size: 100,
            ..PrefSetSettings::default()
        };
        let err = ProfileService::apply_pref_set(&path, &settings).unwrap_err();
        assert!(err.to_string().contains("FontSize"));
        assert_eq!(fs::read_to_string(&path)?, PROFILE);
        Ok(())
    }

    #[test]
    fn test_scan_groups_by_folder() -> Result<()> {
        let temp = TempDir::new()?;
        let root = temp.path();
        fs::create_dir_all(root.join("ZNY").join("ACY"))?;
        fs::create_dir_all(root.join("ZNY").join("PHL"))?;
        fs::create_dir_all(root.join("ZDC"))?;
        fs::write(root.join("ZNY").join("ACY").join("ACY.xml"), PROFILE)?;
        fs::write(root.join("ZNY").join("ACY").join("ACY_North.xml"), PROFILE)?;
        fs::write(root.join("ZNY").join("PHL").join("broken.xml"), "<a>")?;
        fs::write(root.join("ZDC").join("DC.XML"), PROFILE)?;
        fs::write(root.join("ZDC").join("notes.txt"), "ignored")?;

        let folders = ProfileService::scan(root)?;
        assert_eq!(folders.len(), 2);

        let zdc = &folders[0];
        assert_eq!((zdc.region.as_str(), zdc.facility.as_str()), ("ZDC", "ZDC"));
        assert_eq!(zdc.profiles.len(), 1);

        let acy = &folders[1];
        assert_eq!((acy.region.as_str(), acy.facility.as_str()), ("ZNY", "ACY"));
        let names: Vec<_> = acy.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["ACY", "ACY_North"]);
        Ok(())
    }

    #[test]
    fn test_scan_missing_root_is_empty() -> Result<()> {
        let temp = TempDir::new()?;
        assert!(ProfileService::scan(&temp.path().join("nope"))?.is_empty());
        Ok(())
    }
}
