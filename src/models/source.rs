//! Intermediate model of an exported facility document.
//!
//! A [`SourceProfile`] is the flat, query-friendly view of one exported
//! region: every map layer it declares, and every terminal-control facility
//! found anywhere in its facility tree.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Keywords that mark a facility type as terminal radar control.
pub const CONTROLLED_FACILITY_KEYWORDS: [&str; 4] = ["TRACON", "RAPCON", "CERAP", "RATCF"];

/// Returns true when `facility_type` names a terminal radar-control facility.
///
/// Matching is a case-insensitive substring test against
/// [`CONTROLLED_FACILITY_KEYWORDS`].
///
/// # Examples
///
/// ```
/// use scopegen::models::is_controlled_type;
///
/// assert!(is_controlled_type("Tracon"));
/// assert!(is_controlled_type("Combined RAPCON"));
/// assert!(!is_controlled_type("AtctTower"));
/// ```
pub fn is_controlled_type(facility_type: &str) -> bool {
    let upper = facility_type.to_uppercase();
    CONTROLLED_FACILITY_KEYWORDS
        .iter()
        .any(|keyword| upper.contains(keyword))
}

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude, positive north
    pub lat: f64,
    /// Longitude, positive east
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in nautical miles.
    ///
    /// Haversine on a 6371 km sphere, converted at 0.539957 nm per km.
    pub fn distance_nm(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;
        const NM_PER_KM: f64 = 0.539_957;

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c * NM_PER_KM
    }

    /// Builds a coordinate only when both halves are present.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Self { lat, lon }),
            _ => None,
        }
    }
}

/// One placement of a map on the 36-slot control bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonAssignment {
    /// 1-based label shown on the button
    pub label: String,
    /// 0-based slot index (0..=35)
    pub slot: usize,
    /// Identifier of the map group that produced this placement
    pub group_id: String,
}

impl ButtonAssignment {
    /// Creates an assignment for `slot`, labelling it `slot + 1`.
    pub fn new(slot: usize, group_id: impl Into<String>) -> Self {
        Self {
            label: (slot + 1).to_string(),
            slot,
            group_id: group_id.into(),
        }
    }
}

/// A drawable map layer declared at the document root.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoMapDescriptor {
    /// Unique id within the profile
    pub id: String,
    /// Display name
    pub name: String,
    /// Abbreviated name
    pub short_name: String,
    /// Original asset file name
    pub source_file_name: String,
    /// Brightness category tag (e.g. "A" or "B")
    pub brightness_category: String,
    /// Declared numeric map number, when the document gives one
    pub map_number: Option<u32>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Button placements, in the order they were resolved
    pub buttons: Vec<ButtonAssignment>,
}

impl VideoMapDescriptor {
    /// Returns the first assignment recorded for this map.
    pub fn primary_button(&self) -> Option<&ButtonAssignment> {
        self.buttons.first()
    }

    /// Returns the assignment produced by the map group `group_id`.
    pub fn button_for_group(&self, group_id: &str) -> Option<&ButtonAssignment> {
        self.buttons.iter().find(|b| b.group_id == group_id)
    }

    /// Records an assignment unless this group already placed the map.
    ///
    /// Returns false when an earlier assignment from the same group is kept.
    pub fn assign(&mut self, assignment: ButtonAssignment) -> bool {
        if self.button_for_group(&assignment.group_id).is_some() {
            return false;
        }
        self.buttons.push(assignment);
        true
    }
}

/// A coverage region inside a controlled facility.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Area {
    /// Area id
    pub id: String,
    /// Area name
    pub name: String,
    /// Visibility center, when present
    pub coordinate: Option<Coordinate>,
    /// Local airport codes served by this area
    pub airports: Vec<String>,
    /// Map group linked to this area by position
    pub map_group_id: Option<String>,
}

/// A terminal radar-control facility flattened out of the facility tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlledFacility {
    /// Facility id (e.g. "ACY")
    pub id: String,
    /// Facility name
    pub name: String,
    /// Raw facility type string
    pub facility_type: String,
    /// Coordinate taken from the first area's visibility center
    pub coordinate: Option<Coordinate>,
    /// Areas, in document order
    pub areas: Vec<Area>,
    /// Sorted union of all area airports
    pub airports: Vec<String>,
    /// Maps selectable for this facility; owned copies, never shared
    pub available_maps: Vec<VideoMapDescriptor>,
    /// Whether this node or any descendant carries a display configuration
    pub has_radar_config: bool,
}

impl ControlledFacility {
    /// Finds an area by id, falling back to a case-insensitive name match.
    pub fn find_area(&self, key: &str) -> Option<&Area> {
        self.areas
            .iter()
            .find(|a| a.id == key)
            .or_else(|| self.areas.iter().find(|a| a.name.eq_ignore_ascii_case(key)))
    }

    /// Finds an available map by id.
    pub fn find_map(&self, id: &str) -> Option<&VideoMapDescriptor> {
        self.available_maps.iter().find(|m| m.id == id)
    }
}

/// One parsed source document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceProfile {
    /// Region code, taken from the document file stem (e.g. "ZNY")
    pub code: String,
    /// File the profile was read from, if any
    pub path: Option<PathBuf>,
    /// Root-level map declarations, in document order
    pub video_maps: Vec<VideoMapDescriptor>,
    /// Controlled facilities found at any depth
    pub facilities: Vec<ControlledFacility>,
    /// First visibility center of the document
    pub home: Option<Coordinate>,
}

impl SourceProfile {
    /// Finds a controlled facility by id (case-insensitive).
    pub fn find_facility(&self, id: &str) -> Option<&ControlledFacility> {
        self.facilities
            .iter()
            .find(|f| f.id.eq_ignore_ascii_case(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_controlled_type_keywords() {
        assert!(is_controlled_type("TRACON"));
        assert!(is_controlled_type("rapcon"));
        assert!(is_controlled_type("Cerap"));
        assert!(is_controlled_type("RATCF"));
        assert!(!is_controlled_type("Artcc"));
        assert!(!is_controlled_type(""));
    }

    #[test]
    fn test_button_assignment_label_is_one_based() {
        let assignment = ButtonAssignment::new(0, "g1");
        assert_eq!(assignment.label, "1");
        assert_eq!(ButtonAssignment::new(35, "g1").label, "36");
    }

    #[test]
    fn test_assign_keeps_first_per_group() {
        let mut map = VideoMapDescriptor::default();
        assert!(map.assign(ButtonAssignment::new(3, "g1")));
        assert!(!map.assign(ButtonAssignment::new(7, "g1")));
        assert!(map.assign(ButtonAssignment::new(1, "g2")));

        assert_eq!(map.primary_button().map(|b| b.slot), Some(3));
        assert_eq!(map.button_for_group("g2").map(|b| b.slot), Some(1));
        assert_eq!(map.buttons.len(), 2);
    }

    #[test]
    fn test_coordinate_from_parts() {
        assert_eq!(
            Coordinate::from_parts(Some(1.0), Some(2.0)),
            Some(Coordinate::new(1.0, 2.0))
        );
        assert_eq!(Coordinate::from_parts(Some(1.0), None), None);
    }

    #[test]
    fn test_distance_nm() {
        let acy = Coordinate::new(39.4576, -74.5772);
        let phl = Coordinate::new(39.8719, -75.2411);
        let d = acy.distance_nm(&phl);
        assert!((d - 39.5).abs() < 0.1, "got {d}");
        assert!(acy.distance_nm(&acy).abs() < f64::EPSILON);
    }

    #[test]
    fn test_find_area_by_id_or_name() {
        let facility = ControlledFacility {
            areas: vec![Area {
                id: "a1".to_string(),
                name: "North".to_string(),
                ..Area::default()
            }],
            ..ControlledFacility::default()
        };
        assert!(facility.find_area("a1").is_some());
        assert!(facility.find_area("north").is_some());
        assert!(facility.find_area("south").is_none());
    }
}
