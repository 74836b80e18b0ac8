//! Runtime tuning
//!
//! Set at construction, never persisted by the simulation itself. Stored as
//! JSON when callers want to keep a tuning around.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SettingsError};
use crate::sim::Footprint;

/// Kinematics and surface effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsSettings {
    /// Speed cap (grid units per step)
    pub max_speed: f64,
    /// Speed gained per unit time under Accelerate
    pub acceleration: f64,
    /// Speed lost per unit time under Brake
    pub braking: f64,
    pub oil_multiplier: f64,
    pub dirt_multiplier: f64,
    /// Per-unit-time speed multiplier while boosted
    pub boost_factor: f64,
    /// Steps of boost granted by a boost tile
    pub boost_duration: u32,
}

impl Default for DynamicsSettings {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            acceleration: ACCELERATION,
            braking: BRAKING,
            oil_multiplier: OIL_MULTIPLIER,
            dirt_multiplier: DIRT_MULTIPLIER,
            boost_factor: BOOST_FACTOR,
            boost_duration: BOOST_DURATION,
        }
    }
}

/// Reward coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSettings {
    pub k_progress: f64,
    /// Charged every step
    pub k_time: f64,
    pub k_collision: f64,
    pub k_goal: f64,
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            k_progress: K_PROGRESS,
            k_time: K_TIME,
            k_collision: K_COLLISION,
            k_goal: K_GOAL,
        }
    }
}

/// Observation patch geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    pub patch_height: usize,
    pub patch_width: usize,
    /// Rows of the patch that look behind the vehicle
    pub back_margin: usize,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            patch_height: PATCH_HEIGHT,
            patch_width: PATCH_WIDTH,
            back_margin: BACK_MARGIN,
        }
    }
}

/// Complete environment tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dynamics: DynamicsSettings,
    pub reward: RewardSettings,
    pub sensor: SensorSettings,
    pub footprint: Footprint,

    // === Presentation ===
    /// Step duration multiplier; slows the vehicle down for viewing
    pub time_scale: f64,
    /// Target frame rate handed to the renderer
    pub render_fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dynamics: DynamicsSettings::default(),
            reward: RewardSettings::default(),
            sensor: SensorSettings::default(),
            footprint: Footprint::default(),
            time_scale: 1.0,
            render_fps: RENDER_FPS,
        }
    }
}

fn require(field: &'static str, requirement: &'static str, value: f64, ok: bool) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            field,
            requirement,
            value,
        })
    }
}

impl Settings {
    /// Check every parameter is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.dynamics;
        require("max_speed", "positive", d.max_speed, d.max_speed > 0.0)?;
        require("acceleration", "non-negative", d.acceleration, d.acceleration >= 0.0)?;
        require("braking", "non-negative", d.braking, d.braking >= 0.0)?;
        for (field, m) in [
            ("oil_multiplier", d.oil_multiplier),
            ("dirt_multiplier", d.dirt_multiplier),
        ] {
            require(field, "in (0, 1]", m, m > 0.0 && m <= 1.0)?;
        }
        require("boost_factor", "at least 1", d.boost_factor, d.boost_factor >= 1.0)?;

        let r = &self.reward;
        for (field, k) in [
            ("k_progress", r.k_progress),
            ("k_time", r.k_time),
            ("k_collision", r.k_collision),
            ("k_goal", r.k_goal),
        ] {
            require(field, "finite", k, k.is_finite())?;
        }

        let s = &self.sensor;
        require("patch_height", "positive", s.patch_height as f64, s.patch_height > 0)?;
        require("patch_width", "positive", s.patch_width as f64, s.patch_width > 0)?;

        let f = &self.footprint;
        require("footprint.length", "positive", f.length, f.length > 0.0)?;
        require("footprint.width", "positive", f.width, f.width > 0.0)?;

        require(
            "time_scale",
            "at least the minimum time scale",
            self.time_scale,
            self.time_scale >= MIN_TIME_SCALE,
        )?;
        require("render_fps", "at least 1", self.render_fps as f64, self.render_fps >= 1)?;
        Ok(())
    }

    /// Step duration, floored to the minimum time scale
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(MIN_TIME_SCALE);
    }

    /// Target frame rate, at least 1
    pub fn set_render_fps(&mut self, fps: u32) {
        self.render_fps = fps.max(1);
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let settings = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.as_ref().display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{ "dynamics": { "acceleration": 0.5 }, "render_fps": 30 }"#)
                .unwrap();
        assert_eq!(settings.dynamics.acceleration, 0.5);
        assert_eq!(settings.dynamics.max_speed, MAX_SPEED);
        assert_eq!(settings.render_fps, 30);
        assert_eq!(settings.reward, RewardSettings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.reward.k_goal = 50.0;
        settings.sensor.patch_width = 11;
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json(r#"{ "dynamics": { "max_speed": 0.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::InvalidParameter {
                field: "max_speed",
                ..
            })
        ));

        let mut settings = Settings::default();
        settings.sensor.patch_height = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.dynamics.oil_multiplier = 1.5;
        assert!(settings.validate().is_err());

        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_presentation_setters_clamp() {
        let mut settings = Settings::default();
        settings.set_time_scale(0.0);
        assert_eq!(settings.time_scale, MIN_TIME_SCALE);
        settings.set_time_scale(0.4);
        assert_eq!(settings.time_scale, 0.4);
        settings.set_render_fps(0);
        assert_eq!(settings.render_fps, 1);
    }

    #[test]
    fn test_load_missing_falls_back() {
        let settings = Settings::load_or_default("/definitely/not/here.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("grid_racer_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.dynamics.boost_duration = 4;
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
