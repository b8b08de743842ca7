//! Parsing and serialization for the two document formats.
//!
//! Source facility exports are JSON and are only read. Radar-scope profiles
//! are XML and are read, edited in place, and rewritten.

pub mod source_json;
pub mod target_xml;
pub mod xml_tree;

// Re-export commonly used functions
pub use source_json::{load_source_profile, parse_source_str, scan_source_dir};
pub use target_xml::{apply_pref_set, build_dcb_map_list, read_target_profile, MapNumberAllocator};
pub use xml_tree::XmlElement;
