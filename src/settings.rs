use std::fs;
use std::path::Path;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SETTINGS_PATH: &str = "assets/race_settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Tunables for the view and the course. Gameplay physics constants live in
/// `game_logic::constants` and are not configurable.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSettings {
    /// Framebuffer size in pixels.
    pub width: u32,
    pub height: u32,
    /// Half-width of the road in world units.
    pub road_width: f32,
    pub lanes: u32,
    pub camera_height: f32,
    /// Horizontal field of view in degrees.
    pub field_of_view: f32,
    /// Segments drawn ahead of the camera.
    pub draw_distance: usize,
    pub fog_density: f32,
    pub total_cars: usize,
    /// Fixed seed for track decoration and traffic; random when absent.
    pub seed: Option<u64>,
    pub lap_record_path: String,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            road_width: 2000.0,
            lanes: 3,
            camera_height: 1000.0,
            field_of_view: 100.0,
            draw_distance: 300,
            fog_density: 5.0,
            total_cars: 100,
            seed: None,
            lap_record_path: "best_lap.json".to_string(),
        }
    }
}

impl RaceSettings {
    /// Distance from the camera to the projection plane.
    pub fn camera_depth(&self) -> f32 {
        1.0 / (self.field_of_view / 2.0).to_radians().tan()
    }

    /// How far ahead of the camera the player's car sits.
    pub fn player_z(&self) -> f32 {
        self.camera_height * self.camera_depth()
    }

    /// Pixel scale relative to the 480-line reference screen.
    pub fn resolution(&self) -> f32 {
        self.height as f32 / 480.0
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason| Err(SettingsError::Invalid { field, reason });
        if self.width == 0 || self.height == 0 {
            return invalid("width/height", "must be positive");
        }
        if !(self.road_width > 0.0) {
            return invalid("road_width", "must be positive");
        }
        if self.lanes == 0 {
            return invalid("lanes", "must be at least 1");
        }
        if !(self.camera_height > 0.0) {
            return invalid("camera_height", "must be positive");
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return invalid("field_of_view", "must be between 0 and 180 degrees");
        }
        if self.draw_distance == 0 {
            return invalid("draw_distance", "must be at least 1");
        }
        if !(self.fog_density >= 0.0) {
            return invalid("fog_density", "must not be negative");
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: RaceSettings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from `path`. A missing file means defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = RaceSettings::default();
        assert!(settings.validate().is_ok());
        assert!((settings.camera_depth() - 0.8391).abs() < 1e-3);
        assert!((settings.player_z() - 839.1).abs() < 0.1);
        assert_eq!(settings.resolution(), 1.0);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let settings = RaceSettings::from_json(r#"{ "lanes": 4, "seed": 12 }"#).unwrap();
        assert_eq!(settings.lanes, 4);
        assert_eq!(settings.seed, Some(12));
        assert_eq!(settings.draw_distance, 300);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            RaceSettings::from_json(r#"{ "field_of_view": 180 }"#),
            Err(SettingsError::Invalid { field: "field_of_view", .. })
        ));
        assert!(matches!(
            RaceSettings::from_json(r#"{ "lanes": 0 }"#),
            Err(SettingsError::Invalid { field: "lanes", .. })
        ));
        assert!(matches!(
            RaceSettings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RaceSettings::load(dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, RaceSettings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race_settings.json");
        fs::write(&path, r#"{ "total_cars": 0, "draw_distance": 150 }"#).unwrap();
        let settings = RaceSettings::load(&path).unwrap();
        assert_eq!(settings.total_cars, 0);
        assert_eq!(settings.draw_distance, 150);
    }
}
