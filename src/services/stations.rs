//! Nearest weather radar station lookup.
//!
//! Stations come from a fixed-width table: two header lines, then one
//! station per row at fixed character columns.

use crate::models::source::Coordinate;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const BUNDLED_STATIONS: &str = include_str!("data/nexrad-stations.txt");

const HEADER_LINES: usize = 2;
const MIN_ROW_WIDTH: usize = 100;
const TYPE_ROW_WIDTH: usize = 150;

/// How much farther a preferred station may be and still win over a
/// closer secondary one.
pub const PREFERENCE_TOLERANCE: f64 = 1.2;

/// Radar class of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StationKind {
    /// Long-range network radar (preferred)
    Nexrad,
    /// Terminal doppler weather radar (secondary)
    Tdwr,
    /// Anything else
    Other,
}

impl StationKind {
    fn from_type_field(text: &str) -> Self {
        let upper = text.to_uppercase();
        if upper.contains("NEXRAD") {
            Self::Nexrad
        } else if upper.contains("TDWR") {
            Self::Tdwr
        } else {
            Self::Other
        }
    }
}

/// One weather radar station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    /// Four-letter station id (e.g. "KDIX")
    pub icao: String,
    /// Station name
    pub name: String,
    /// Antenna location
    pub coordinate: Coordinate,
    /// Elevation in feet
    pub elevation_ft: i32,
    /// Radar class
    pub kind: StationKind,
}

/// Finds the best weather radar station for a location.
#[derive(Debug, Clone, Default)]
pub struct StationLocator {
    stations: Vec<Station>,
}

fn column(line: &str, start: usize, end: usize) -> Option<&str> {
    line.get(start..end.min(line.len())).map(str::trim)
}

fn parse_row(line: &str) -> Option<Station> {
    let icao = column(line, 9, 13)?;
    let name = column(line, 19, 49)?;
    let lat = column(line, 68, 78)?.parse().ok()?;
    let lon = column(line, 78, 89)?.parse().ok()?;
    let elevation_ft = column(line, 89, 95)?.parse().ok()?;
    let kind = if line.len() >= TYPE_ROW_WIDTH {
        StationKind::from_type_field(column(line, 101, 151)?)
    } else {
        StationKind::Other
    };

    Some(Station {
        icao: icao.to_string(),
        name: name.to_string(),
        coordinate: Coordinate::new(lat, lon),
        elevation_ft,
        kind,
    })
}

impl StationLocator {
    /// Builds a locator from an explicit station list.
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// Parses the fixed-width station table.
    ///
    /// Returns the locator and the number of rows skipped because they were
    /// too short or had unparseable numeric fields. Stations whose id does
    /// not start with `K` or `T` are left out without counting as skipped.
    pub fn from_fixed_width(text: &str) -> (Self, usize) {
        let mut stations = Vec::new();
        let mut skipped = 0;

        for line in text.lines().skip(HEADER_LINES) {
            if line.trim().is_empty() {
                continue;
            }
            if line.len() < MIN_ROW_WIDTH {
                skipped += 1;
                continue;
            }
            match parse_row(line) {
                Some(station) if station.icao.starts_with(['K', 'T']) => stations.push(station),
                Some(_) => {}
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Skipped {skipped} malformed station rows");
        }
        (Self { stations }, skipped)
    }

    /// Loads the station table from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read station table: {}", path.display()))?;
        let (locator, _) = Self::from_fixed_width(&text);
        Ok(locator)
    }

    /// The locator built from the bundled station table.
    pub fn bundled() -> &'static Self {
        static BUNDLED: OnceLock<StationLocator> = OnceLock::new();
        BUNDLED.get_or_init(|| Self::from_fixed_width(BUNDLED_STATIONS).0)
    }

    /// All loaded stations.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Every station with its distance from `point`, nearest first.
    pub fn stations_by_distance(&self, point: Coordinate) -> Vec<(&Station, f64)> {
        let mut ranked: Vec<_> = self
            .stations
            .iter()
            .map(|s| (s, point.distance_nm(&s.coordinate)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked
    }

    /// The station to use for `point`, or `None` when the table is empty.
    ///
    /// The closest station wins, except that a closer TDWR gives way to the
    /// nearest NEXRAD whose distance is at most 1.2 times the TDWR distance.
    pub fn nearest(&self, point: Coordinate) -> Option<&Station> {
        let ranked = self.stations_by_distance(point);
        let &(closest, closest_distance) = ranked.first()?;

        if closest.kind == StationKind::Tdwr {
            let limit = closest_distance * PREFERENCE_TOLERANCE;
            if let Some(&(preferred, _)) = ranked
                .iter()
                .find(|(s, d)| s.kind == StationKind::Nexrad && *d <= limit)
            {
                return Some(preferred);
            }
        }
        Some(closest)
    }
}
