//! Application-wide constants.
//!
//! Names, fixed URL templates, and the handful of numeric defaults that the
//! generated radar-scope profiles rely on.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "ScopeGen";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "scopegen";

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "SCOPEGEN_CONFIG_DIR";

/// Number of map-selection buttons on the display control bar.
pub const DCB_SLOT_COUNT: usize = 36;

/// Receiver endpoint template; `{facility}` is replaced with the facility id.
pub const RECEIVER_URL_TEMPLATE: &str = "https://dstars.graiani.com/dstars/{facility}/updates";

/// Fully qualified receiver type written on the `Receiver` element.
pub const RECEIVER_ASSEMBLY_NAME: &str = "DGScope.Receivers.ScopeServer.ScopeServerClient, DGScope.Receivers.ScopeServer, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null";

/// Default receiver range in nautical miles.
pub const RECEIVER_DEFAULT_RANGE: u32 = 250;

/// Weather radar product URL template; `{icao}` is the lowercase station id.
pub const RADAR_URL_TEMPLATE: &str =
    "https://tgftp.nws.noaa.gov/SL.us008001/DF.of/DC.radar/DS.p94r0/SI.{icao}/sn.last";

/// Distance in nautical miles past which a selected weather radar is reported
/// as too far to be useful.
pub const RADAR_WARN_DISTANCE_NM: f64 = 250.0;

/// Weather radar download interval in seconds.
pub const RADAR_DOWNLOAD_INTERVAL: u32 = 300;

/// Subdirectory of a profile folder that receives copied map layers.
pub const VIDEO_MAPS_DIR: &str = "VideoMaps";

/// Region codes that use the Pacific `P` airport prefix.
pub const PACIFIC_REGIONS: [&str; 3] = ["ZAN", "ZHN", "ZUA"];
