//! Overlay drawing configuration.
//!
//! A single typed struct covering the brush colors, text format, and debug
//! snapshot behavior. The config is passed explicitly to
//! `SurfaceManager::new` rather than living behind a global, so two managers
//! can coexist with different settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// User-tunable settings for the overlay surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Font family for the overlay text.
    pub font_family: String,
    /// Font size in DIPs.
    pub font_size: f32,
    /// Clear color as a `#RRGGBB` hex string.
    pub background: String,
    /// Ellipse fill color as a `#RRGGBB` hex string.
    pub ellipse_color: String,
    /// Text color as a `#RRGGBB` hex string.
    pub text_color: String,
    /// Write a bitmap of every presented frame to `snapshot_path`.
    pub snapshot_enabled: bool,
    /// Destination for the debug snapshot, overwritten each frame.
    pub snapshot_path: PathBuf,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font_family: "Verdana".to_string(),
            font_size: 50.0,
            background: "#D3D3D3".to_string(),
            ellipse_color: "#00B300".to_string(),
            text_color: "#B30000".to_string(),
            snapshot_enabled: true,
            snapshot_path: PathBuf::from("overlay_frame.bmp"),
        }
    }
}

/// Parse a hex color string to RGBA values.
///
/// Unparseable input falls back to opaque white.
pub fn parse_color(hex: &str) -> [f32; 4] {
    let color = hex.trim_start_matches('#');
    if color.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&color[0..2], 16),
            u8::from_str_radix(&color[2..4], 16),
            u8::from_str_radix(&color[4..6], 16),
        ) {
            return [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0];
        }
    }

    [1.0, 1.0, 1.0, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OverlayConfig::default();
        assert_eq!(config.font_family, "Verdana");
        assert_eq!(config.font_size, 50.0);
        assert!(config.snapshot_enabled);
        assert_eq!(config.snapshot_path, PathBuf::from("overlay_frame.bmp"));
    }

    #[test]
    fn test_parse_color() {
        let green = parse_color("#00B300");
        assert_eq!(green[0], 0.0);
        assert!((green[1] - 0.7).abs() < 0.01);
        assert_eq!(green[2], 0.0);
        assert_eq!(green[3], 1.0);

        // Leading '#' is optional
        let red = parse_color("B30000");
        assert!((red[0] - 0.7).abs() < 0.01);
        assert_eq!(red[1], 0.0);
    }

    #[test]
    fn test_parse_color_invalid_falls_back_to_white() {
        assert_eq!(parse_color("not-a-color"), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(parse_color("#12"), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(parse_color(""), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_json_round_trip() {
        let config = OverlayConfig {
            font_size: 24.0,
            snapshot_enabled: false,
            ..OverlayConfig::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("fontFamily"));

        let parsed: OverlayConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.font_size, 24.0);
        assert!(!parsed.snapshot_enabled);
        assert_eq!(parsed.ellipse_color, config.ellipse_color);
    }
}
