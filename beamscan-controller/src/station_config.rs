use crate::pose::XyzWpr;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, include_bytes, str};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("error while accessing configuration")]
    Io(#[from] std::io::Error),
    #[error("error while parsing json")]
    Json(#[from] serde_json::error::Error),
    #[error("error while parsing yaml")]
    Yaml(#[from] serde_yaml::Error),
    #[error("station reference {0:?} is not selected")]
    MissingReference(&'static str),
    #[error("station parameter {0:?} is out of range")]
    InvalidParameter(&'static str),
}

type Result<T> = std::result::Result<T, ConfigError>;

/// Describes the scanning cell
///
/// Names the robot, reference frame and tool the sequence runs
/// against and bounds the reachable workspace.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StationConfig {
    pub robot: String,
    pub frame: String,
    pub tool: String,
    /// Cartesian home pose the robot parks at between sequences
    pub home: XyzWpr,
    pub workspace_center: Vector3<f64>,
    /// mm
    pub workspace_radius: f64,
    /// linear speed used to estimate travel time, mm/s
    pub move_speed: f64,
    /// digital output that gates the x-ray beam
    pub beam_signal: String,
    pub default_csv: PathBuf,
}

impl Default for StationConfig {
    fn default() -> StationConfig {
        StationConfig {
            robot: "robot".to_owned(),
            frame: "frame".to_owned(),
            tool: "tool".to_owned(),
            home: XyzWpr::default(),
            workspace_center: Vector3::new(0.0, 0.0, 0.0),
            workspace_radius: 1000.0,
            move_speed: 250.0,
            beam_signal: "DO_XRAY_BEAM".to_owned(),
            default_csv: PathBuf::from("csv_files/demo_scan.csv"),
        }
    }
}

impl StationConfig {
    /// Beamscan comes with an included config file.
    ///
    /// This file is packaged with the binary
    /// This method retrieves this included version
    pub fn included() -> StationConfig {
        let json = str::from_utf8(include_bytes!("../config/station.json")).unwrap();
        StationConfig::parse_json(json).unwrap()
    }

    pub fn parse_json(text: &str) -> Result<StationConfig> {
        let config: StationConfig = serde_json::from_str(text)?;
        Ok(config)
    }

    pub fn parse_yaml(text: &str) -> Result<StationConfig> {
        let config: StationConfig = serde_yaml::from_str(text)?;
        Ok(config)
    }

    pub fn serialize_to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    pub fn serialize_to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(yaml)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.serialize_to_json()?)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<StationConfig> {
        let text = fs::read_to_string(path)?;
        let config = StationConfig::parse_json(&text)?;
        Ok(config)
    }

    pub fn load_yaml(path: &Path) -> Result<StationConfig> {
        let text = fs::read_to_string(path)?;
        let config = StationConfig::parse_yaml(&text)?;
        Ok(config)
    }

    /// All three station references have to be selected and the
    /// numeric parameters in range before any motion is attempted
    pub fn validate(&self) -> Result<()> {
        if self.robot.is_empty() {
            return Err(ConfigError::MissingReference("robot"));
        }
        if self.frame.is_empty() {
            return Err(ConfigError::MissingReference("frame"));
        }
        if self.tool.is_empty() {
            return Err(ConfigError::MissingReference("tool"));
        }
        // travel time divides by move_speed
        if self.move_speed <= 0.0 || !self.move_speed.is_finite() {
            return Err(ConfigError::InvalidParameter("move_speed"));
        }
        if self.workspace_radius < 0.0 || self.workspace_radius.is_nan() {
            return Err(ConfigError::InvalidParameter("workspace_radius"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_to_json_round_trips() {
        let config = StationConfig::default();
        let json = config.serialize_to_json().unwrap();
        let parsed_config = StationConfig::parse_json(&json).unwrap();
        assert_eq!(config, parsed_config);
    }

    #[test]
    fn serialize_to_yaml_round_trips() {
        let config = StationConfig::default();
        let yaml = config.serialize_to_yaml().unwrap();
        let parsed_config = StationConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config, parsed_config);
    }

    #[test]
    fn check_included() {
        let config = StationConfig::included();
        config.validate().unwrap();
    }

    #[test]
    fn empty_frame_fails_validation() {
        let config = StationConfig {
            frame: String::new(),
            ..StationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingReference("frame"))
        ));
    }

    #[test]
    fn zero_move_speed_fails_validation() {
        let config = StationConfig {
            move_speed: 0.0,
            ..StationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter("move_speed"))
        ));
    }

    #[test]
    fn negative_move_speed_fails_validation() {
        let config = StationConfig {
            move_speed: -100.0,
            ..StationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter("move_speed"))
        ));
    }

    #[test]
    fn non_finite_move_speed_fails_validation() {
        let config = StationConfig {
            move_speed: f64::INFINITY,
            ..StationConfig::default()
        };
        assert!(config.validate().is_err());
        let config = StationConfig {
            move_speed: f64::NAN,
            ..StationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_workspace_radius_fails_validation() {
        let config = StationConfig {
            workspace_radius: -1.0,
            ..StationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter("workspace_radius"))
        ));
    }

    #[test]
    fn empty_tool_fails_validation() {
        let config = StationConfig {
            tool: String::new(),
            ..StationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingReference("tool"))
        ));
    }
}
