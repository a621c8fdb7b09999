//! TOML presets.
//!
//! A preset carries the same parameters as the CLI flags; explicit flags
//! win over preset values. Unrecognized shape or kernel names degrade to
//! the first catalog entry with a warning instead of refusing to start,
//! matching the renderer's forgiving color parsing.

use std::path::{Path, PathBuf};

use renderer::{DitherKind, RenderConfig, Rgba, Shape};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    pub shape: Option<String>,
    pub dither: Option<String>,
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub pixel_size: Option<f32>,
    pub speed: Option<f32>,
    pub only_shape: Option<bool>,
    pub debug_heatmap: Option<bool>,
    pub pulse: Option<f32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("failed to read preset at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse preset at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub fn load(path: &Path) -> Result<Preset, PresetError> {
    let raw = std::fs::read_to_string(path).map_err(|source| PresetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| PresetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Folds the preset values into the config.
pub fn apply(preset: &Preset, config: &mut RenderConfig) {
    if let Some(name) = preset.shape.as_deref() {
        config.shape = name.parse().unwrap_or_else(|err: String| {
            warn!(%err, fallback = %Shape::ALL[0], "preset shape not recognized");
            Shape::ALL[0]
        });
    }
    if let Some(name) = preset.dither.as_deref() {
        config.dither = name.parse().unwrap_or_else(|err: String| {
            warn!(%err, fallback = %DitherKind::ALL[0], "preset dither kernel not recognized");
            DitherKind::ALL[0]
        });
    }
    if let Some(spec) = preset.background.as_deref() {
        config.background = Rgba::parse(spec);
    }
    if let Some(spec) = preset.foreground.as_deref() {
        config.foreground = Rgba::parse(spec);
    }
    if let Some(pixel_size) = preset.pixel_size {
        config.pixel_size = pixel_size;
    }
    if let Some(speed) = preset.speed {
        config.speed = speed;
    }
    if let Some(only_shape) = preset.only_shape {
        config.only_shape = only_shape;
    }
    if let Some(debug_heatmap) = preset.debug_heatmap {
        config.debug_heatmap = debug_heatmap;
    }
    if let Some(pulse) = preset.pulse {
        config.pulse = pulse;
    }
    if let (Some(width), Some(height)) = (preset.width, preset.height) {
        config.size = Some((width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_values_land_in_the_config() {
        let preset: Preset = toml::from_str(
            r##"
                shape = "ripple"
                dither = "2x2"
                background = "#101010"
                foreground = "rgba(114, 49, 49, 0.5)"
                pixel_size = 8.0
                speed = 0.5
                only_shape = true
                pulse = 0.3
                width = 320
                height = 240
            "##,
        )
        .expect("parse");
        let mut config = RenderConfig::default();
        apply(&preset, &mut config);

        assert_eq!(config.shape, Shape::Ripple);
        assert_eq!(config.dither, DitherKind::Bayer2);
        assert_eq!(config.pixel_size, 8.0);
        assert_eq!(config.speed, 0.5);
        assert!(config.only_shape);
        assert_eq!(config.pulse, 0.3);
        assert_eq!(config.size, Some((320, 240)));
        assert_eq!(config.background.to_bytes(), [0x10, 0x10, 0x10, 0xff]);
    }

    #[test]
    fn unknown_names_fall_back_to_the_first_catalog_entry() {
        let preset: Preset = toml::from_str(
            r#"
                shape = "plasma"
                dither = "16x16"
            "#,
        )
        .expect("parse");
        let mut config = RenderConfig::default();
        config.shape = Shape::Sphere;
        config.dither = DitherKind::Bayer2;
        apply(&preset, &mut config);

        assert_eq!(config.shape, Shape::ALL[0]);
        assert_eq!(config.dither, DitherKind::ALL[0]);
    }

    #[test]
    fn size_requires_both_dimensions() {
        let preset: Preset = toml::from_str("width = 320").expect("parse");
        let mut config = RenderConfig::default();
        apply(&preset, &mut config);
        assert_eq!(config.size, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Preset>("frame_rate = 60").is_err());
    }

    #[test]
    fn load_reports_missing_files() {
        let err = load(Path::new("/nonexistent/preset.toml")).unwrap_err();
        assert!(matches!(err, PresetError::Io { .. }));
    }

    #[test]
    fn load_reads_a_preset_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preset.toml");
        std::fs::write(&path, "shape = \"dots\"\n").expect("write");
        let preset = load(&path).expect("load");
        assert_eq!(preset.shape.as_deref(), Some("dots"));
    }
}
