//! Local airport identifier to ICAO code resolution.
//!
//! The table is built from a public-domain airport CSV (OurAirports layout),
//! restricted to US entries and keyed by the FAA local code.

use crate::constants::PACIFIC_REGIONS;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const BUNDLED_AIRPORTS: &str = include_str!("data/airports.csv");

const COL_COUNTRY: usize = 8;
const COL_ICAO: usize = 12;
const COL_GPS: usize = 14;
const COL_LOCAL: usize = 15;
const MIN_COLUMNS: usize = 17;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AirportCodes {
    icao: String,
    gps: String,
}

/// Resolves local airport codes (e.g. "ACY") to ICAO codes (e.g. "KACY").
#[derive(Debug, Clone, Default)]
pub struct AirportResolver {
    by_local: HashMap<String, AirportCodes>,
}

impl AirportResolver {
    /// Builds a resolver from CSV text with a header row.
    ///
    /// Rows that are short, not US, or have no local code are ignored.
    pub fn from_csv(text: &str) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut by_local = HashMap::new();
        for record in reader.records() {
            let Ok(record) = record else {
                continue;
            };
            if record.len() < MIN_COLUMNS || record.get(COL_COUNTRY) != Some("US") {
                continue;
            }
            let local = record.get(COL_LOCAL).unwrap_or_default().trim();
            if local.is_empty() {
                continue;
            }
            by_local.insert(
                local.to_uppercase(),
                AirportCodes {
                    icao: record.get(COL_ICAO).unwrap_or_default().trim().to_string(),
                    gps: record.get(COL_GPS).unwrap_or_default().trim().to_string(),
                },
            );
        }

        debug!("Indexed {} airports by local code", by_local.len());
        Self { by_local }
    }

    /// Loads a resolver from a CSV file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read airport table: {}", path.display()))?;
        Ok(Self::from_csv(&text))
    }

    /// The resolver built from the bundled airport table.
    ///
    /// Built on first use and shared for the life of the process.
    pub fn bundled() -> &'static Self {
        static BUNDLED: OnceLock<AirportResolver> = OnceLock::new();
        BUNDLED.get_or_init(|| Self::from_csv(BUNDLED_AIRPORTS))
    }

    /// Number of indexed local codes.
    pub fn len(&self) -> usize {
        self.by_local.len()
    }

    /// True when no airports are indexed.
    pub fn is_empty(&self) -> bool {
        self.by_local.is_empty()
    }

    /// Converts a local code to its ICAO code.
    ///
    /// Returns the indexed ICAO code, else the indexed GPS code, else the
    /// uppercased local code prefixed with `P` for Pacific regions and `K`
    /// everywhere else. An empty code resolves to an empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopegen::services::AirportResolver;
    ///
    /// let resolver = AirportResolver::default();
    /// assert_eq!(resolver.resolve("xyz", Some("ZNY")), "KXYZ");
    /// assert_eq!(resolver.resolve("xyz", Some("zan")), "PXYZ");
    /// ```
    pub fn resolve(&self, local_code: &str, region: Option<&str>) -> String {
        let code = local_code.trim().to_uppercase();
        if code.is_empty() {
            return String::new();
        }

        if let Some(entry) = self.by_local.get(&code) {
            if !entry.icao.is_empty() {
                return entry.icao.clone();
            }
            if !entry.gps.is_empty() {
                return entry.gps.clone();
            }
        }

        let pacific = region.is_some_and(|r| {
            PACIFIC_REGIONS
                .iter()
                .any(|p| p.eq_ignore_ascii_case(r.trim()))
        });
        let prefix = if pacific { 'P' } else { 'K' };
        debug!("{code} not in airport table; guessing {prefix}{code}");
        format!("{prefix}{code}")
    }

    /// Converts every code in `local_codes`, dropping empty results.
    pub fn resolve_all(&self, local_codes: &[String], region: Option<&str>) -> Vec<String> {
        local_codes
            .iter()
            .map(|code| self.resolve(code, region))
            .filter(|code| !code.is_empty())
            .collect()
    }
}
