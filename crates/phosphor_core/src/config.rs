//! Field configuration.
//!
//! All tunables live in one [`FieldConfig`], loaded once at startup from
//! TOML (or built in code) and normalized before use. Defaults are the
//! production hero constants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldResult};
use crate::interaction::ExplosionTriggers;
use crate::sampler::SamplerConfig;

/// Complete configuration surface for one field instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Logo image to sample. `None` goes straight to the fallback grid.
    pub image_path: Option<PathBuf>,
    /// Sampling grid step in source pixels (>= 1).
    pub spacing: u32,
    /// Logo scale in scene units (> 0).
    pub scale: f32,
    /// Alpha threshold; sampled pixels must exceed it.
    pub threshold: u8,
    /// Base point size, as a fraction of viewport height.
    pub point_size: f32,
    /// Scene-unit displacement at full explosion.
    pub explosion_strength: f32,
    /// Explosion smoothing rate (1/seconds).
    pub explosion_speed: f32,
    /// Tilt smoothing rate (1/seconds).
    pub tilt_speed: f32,
    /// Maximum tilt angle in radians.
    pub max_tilt: f32,
    /// Hover trigger radius around the projected field center, in NDC.
    pub hover_radius: f32,
    /// Frequency of the curve field blended into explosion directions.
    pub wave_frequency: f32,
    /// Amplitude of the idle ripple.
    pub wave_amplitude: f32,
    /// Background clear color (linear RGBA).
    pub clear_color: [f32; 4],
    /// Which signals may drive the explosion.
    pub triggers: ExplosionTriggers,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            image_path: None,
            spacing: 6,
            scale: 3.0,
            threshold: 8,
            point_size: 0.06,
            explosion_strength: 0.3,
            explosion_speed: 3.0,
            tilt_speed: 5.0,
            max_tilt: 0.75,
            hover_radius: 0.4,
            wave_frequency: 15.0,
            wave_amplitude: 0.08,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            triggers: ExplosionTriggers::default(),
        }
    }
}

impl FieldConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on malformed TOML or mismatched types.
    pub fn from_toml_str(source: &str) -> FieldResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| FieldError::InvalidConfig(e.to_string()))?;
        Ok(config.normalized())
    }

    /// Loads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// `ConfigIo` when the file cannot be read, `InvalidConfig` when it
    /// cannot be parsed.
    pub fn load(path: &Path) -> FieldResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| FieldError::ConfigIo(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("Loaded field config from {}", path.display());
        Ok(config)
    }

    /// Returns a copy with every value clamped into its safe range.
    ///
    /// Out-of-range values are a caller contract violation; they are fixed
    /// by clamping rather than failing, so a bad embed never goes dark.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.spacing = self.spacing.max(1);
        if self.scale <= 0.0 {
            self.scale = 1.0;
        }
        self.point_size = self.point_size.clamp(0.001, 1.0);
        self.explosion_strength = self.explosion_strength.max(0.0);
        self.explosion_speed = self.explosion_speed.max(f32::EPSILON);
        self.tilt_speed = self.tilt_speed.max(f32::EPSILON);
        self.max_tilt = self.max_tilt.clamp(0.0, std::f32::consts::FRAC_PI_2);
        self.hover_radius = self.hover_radius.max(0.0);
        self.wave_frequency = self.wave_frequency.max(0.0);
        self.wave_amplitude = self.wave_amplitude.max(0.0);
        for channel in &mut self.clear_color {
            *channel = channel.clamp(0.0, 1.0);
        }
        self
    }

    /// The sampler view of this configuration.
    #[must_use]
    pub fn sampler(&self) -> SamplerConfig {
        SamplerConfig {
            spacing: self.spacing,
            scale: self.scale,
            threshold: self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_production_constants() {
        let config = FieldConfig::default();
        assert_eq!(config.spacing, 6);
        assert_eq!(config.scale, 3.0);
        assert_eq!(config.threshold, 8);
        assert_eq!(config.point_size, 0.06);
        assert_eq!(config.explosion_speed, 3.0);
        assert_eq!(config.max_tilt, 0.75);
        assert!(config.triggers.scroll && config.triggers.hover);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = FieldConfig::from_toml_str(
            r#"
            image_path = "assets/logo.png"
            spacing = 4
            scale = 2.5

            [triggers]
            scroll = false
            hover = true
            "#,
        )
        .unwrap();

        assert_eq!(config.image_path.as_deref(), Some(Path::new("assets/logo.png")));
        assert_eq!(config.spacing, 4);
        assert_eq!(config.scale, 2.5);
        // Unspecified fields keep their defaults.
        assert_eq!(config.point_size, 0.06);
        assert!(!config.triggers.scroll);
    }

    #[test]
    fn test_malformed_toml_is_invalid_config() {
        let err = FieldConfig::from_toml_str("spacing = \"six\"").unwrap_err();
        assert!(matches!(err, FieldError::InvalidConfig(_)));
    }

    #[test]
    fn test_normalization_clamps() {
        let config = FieldConfig {
            spacing: 0,
            scale: -1.0,
            point_size: 50.0,
            tilt_speed: 0.0,
            clear_color: [2.0, -1.0, 0.5, 1.0],
            ..FieldConfig::default()
        }
        .normalized();

        assert_eq!(config.spacing, 1);
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.point_size, 1.0);
        assert!(config.tilt_speed > 0.0);
        assert_eq!(config.clear_color, [1.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = FieldConfig {
            image_path: Some(PathBuf::from("logo.png")),
            spacing: 3,
            ..FieldConfig::default()
        };
        let serialized = toml::to_string(&config).unwrap();
        let parsed = FieldConfig::from_toml_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }
}
