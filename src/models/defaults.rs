//! Default settings overlaid onto freshly generated profiles.

use serde::{Deserialize, Serialize};

/// Window dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

/// Window position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLocation {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
}

/// Font and window defaults applied during generation.
///
/// Only this small subset is applied by the generator; the full typed
/// settings set goes through the separate apply path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDefaults {
    /// Scope font family
    pub font_name: Option<String>,
    /// Scope font size
    pub font_size: Option<i32>,
    /// Window size, applied only when the profile already has a `WindowSize` node
    pub window_size: Option<WindowSize>,
    /// Window location, applied only when the profile already has a `WindowLocation` node
    pub window_location: Option<WindowLocation>,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            font_name: Some("Consolas".to_string()),
            font_size: Some(10),
            window_size: None,
            window_location: None,
        }
    }
}

impl ProfileDefaults {
    /// Returns true when nothing would be written.
    pub fn is_empty(&self) -> bool {
        self.font_name.as_deref().is_none_or(str::is_empty)
            && self.font_size.is_none()
            && self.window_size.is_none()
            && self.window_location.is_none()
    }
}
