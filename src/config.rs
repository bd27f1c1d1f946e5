//! Application settings.
//!
//! Defaults ship embedded from `data/settings.json`; every section is
//! `#[serde(default)]` so a partial document only overrides what it names.

use serde::{Deserialize, Serialize};

const EMBEDDED_SETTINGS: &str = include_str!("../data/settings.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub brush: BrushSettings,
    pub panel: PanelSettings,
    pub picker: PickerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    /// Painted under the committed layer; the layer itself stays transparent.
    pub background: [f32; 4],
}

/// Brush used before the user touches any control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub color: [f32; 4],
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    pub height: f32,
    pub slider_min: u32,
    pub slider_max: u32,
    pub slider_initial: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerSettings {
    /// Edge length of the dialog's square body, in pixels.
    pub size: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "fingerpaint".to_string(),
            background: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
            width: 10.0,
        }
    }
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            height: 72.0,
            slider_min: 0,
            slider_max: 100,
            slider_initial: 10,
        }
    }
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self { size: 320.0 }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let mut settings: Settings = serde_json::from_str(text)?;
        settings.window.normalize();
        settings.panel.normalize();
        Ok(settings)
    }

    /// Embedded defaults, or the compiled-in ones if the file does not parse.
    pub fn load() -> Self {
        match Self::from_json(EMBEDDED_SETTINGS) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Embedded settings rejected ({e}), using defaults");
                Self::default()
            }
        }
    }
}

impl WindowSettings {
    /// Background with alpha forced to 1. The composed frame is uploaded as
    /// straight RGBA, which only matches tiny-skia's premultiplied bytes when
    /// every pixel is opaque.
    pub fn opaque_background(&self) -> [f32; 4] {
        let [r, g, b, _] = self.background;
        [r, g, b, 1.0]
    }

    fn normalize(&mut self) {
        self.background = self.opaque_background();
    }
}

impl PanelSettings {
    fn normalize(&mut self) {
        if self.slider_min > self.slider_max {
            std::mem::swap(&mut self.slider_min, &mut self.slider_max);
        }
        self.slider_initial = self.slider_initial.clamp(self.slider_min, self.slider_max);
        if !(self.height.is_finite() && self.height >= 0.0) {
            self.height = PanelSettings::default().height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_settings_match_defaults() {
        let settings = Settings::from_json(EMBEDDED_SETTINGS).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let settings = Settings::from_json(r#"{ "brush": { "width": 4.0 } }"#).unwrap();
        assert_eq!(settings.brush.width, 4.0);
        assert_eq!(settings.brush.color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(settings.panel, PanelSettings::default());
    }

    #[test]
    fn test_slider_range_is_normalized() {
        let settings = Settings::from_json(
            r#"{ "panel": { "slider_min": 50, "slider_max": 5, "slider_initial": 80 } }"#,
        )
        .unwrap();
        assert_eq!(settings.panel.slider_min, 5);
        assert_eq!(settings.panel.slider_max, 50);
        assert_eq!(settings.panel.slider_initial, 50);
    }

    #[test]
    fn test_translucent_background_becomes_opaque() {
        let settings =
            Settings::from_json(r#"{ "window": { "background": [0.2, 0.4, 0.6, 0.5] } }"#)
                .unwrap();
        assert_eq!(settings.window.background, [0.2, 0.4, 0.6, 1.0]);

        let window = WindowSettings {
            background: [1.0, 0.0, 0.0, 0.0],
            ..WindowSettings::default()
        };
        assert_eq!(window.opaque_background(), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }
}
