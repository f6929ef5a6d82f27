use crate::pose::XyzWpr;
use crate::robot_driver::{DriverError, RobotDriver};
use crate::station_config::StationConfig;
use crate::workspace::WorkspaceBounds;
use async_trait::async_trait;
use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use std::fs;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("error while writing program")]
    Io(#[from] std::io::Error),
    #[error("error while serializing program")]
    Json(#[from] serde_json::error::Error),
}

/// One step of a recorded on-robot program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    MoveHome,
    MoveTo { target: String, pose: XyzWpr },
    BeamOn,
    BeamOff,
    Hold { duration_ms: f64 },
}

/// Vendor neutral, serializable robot program
///
/// The recorded listing carries everything an on-robot translator
/// needs: the station references and the ordered instruction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotProgram {
    pub name: String,
    pub frame: String,
    pub tool: String,
    pub instructions: Vec<Instruction>,
}

impl RobotProgram {
    pub fn new(name: &str, config: &StationConfig) -> RobotProgram {
        RobotProgram {
            name: name.to_owned(),
            frame: config.frame.clone(),
            tool: config.tool.clone(),
            instructions: vec![],
        }
    }

    pub fn serialize_to_json(&self) -> Result<String, ProgramError> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    pub fn save_json(&self, path: &Path) -> Result<(), ProgramError> {
        fs::write(path, self.serialize_to_json()?)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<RobotProgram, ProgramError> {
        let text = fs::read_to_string(path)?;
        let program = serde_json::from_str(&text)?;
        Ok(program)
    }
}

/// Derive a program name from the scan file name
///
/// Dashes and spaces are not valid in program names on most
/// controllers, so they map to underscores.
pub fn sequence_name(csv_path: &Path) -> String {
    let stem = csv_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("scan");
    stem.replace(['-', ' '], "_")
}

/// Shared handle to a program while it is being recorded
pub type ProgramHandle = Arc<Mutex<RobotProgram>>;

/// Driver backend that records the command stream instead of moving
///
/// Unreachable targets are rejected exactly like the simulated robot
/// rejects them, so a recorded program never contains a target the
/// cell can not reach.
pub struct ProgramRecorder {
    program: ProgramHandle,
    workspace: WorkspaceBounds,
}

impl ProgramRecorder {
    pub fn new(config: &StationConfig, name: &str) -> Result<(Box<Self>, ProgramHandle), DriverError> {
        config.validate()?;
        let program = Arc::new(Mutex::new(RobotProgram::new(name, config)));
        let recorder = ProgramRecorder {
            program: program.clone(),
            workspace: WorkspaceBounds::new(config),
        };
        Ok((Box::new(recorder), program))
    }

    async fn record(&mut self, instruction: Instruction) {
        self.program.lock().await.instructions.push(instruction);
    }
}

#[async_trait]
impl RobotDriver for ProgramRecorder {
    async fn move_home(&mut self) -> Result<(), DriverError> {
        self.record(Instruction::MoveHome).await;
        Ok(())
    }

    async fn move_to(&mut self, target: &str, pose: &na::Isometry3<f64>) -> Result<(), DriverError> {
        if !self.workspace.pose_reachable(pose) {
            return Err(DriverError::Unreachable(target.to_owned()));
        }
        self.record(Instruction::MoveTo {
            target: target.to_owned(),
            pose: XyzWpr::from_pose(pose),
        })
        .await;
        Ok(())
    }

    async fn set_beam(&mut self, on: bool) -> Result<(), DriverError> {
        let instruction = if on {
            Instruction::BeamOn
        } else {
            Instruction::BeamOff
        };
        self.record(instruction).await;
        Ok(())
    }

    async fn hold(&mut self, duration: Duration) -> Result<(), DriverError> {
        self.record(Instruction::Hold {
            duration_ms: duration.as_secs_f64() * 1000.0,
        })
        .await;
        Ok(())
    }
}
