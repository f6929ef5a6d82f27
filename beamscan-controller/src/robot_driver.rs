use crate::station_config::{ConfigError, StationConfig};
use crate::workspace::WorkspaceBounds;
use async_trait::async_trait;
use nalgebra as na;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("target {0} can not be reached")]
    Unreachable(String),
    #[error("station configuration rejected")]
    Config(#[from] ConfigError),
}

type Result<T> = std::result::Result<T, DriverError>;

/// Seam between the replay logic and the robot platform
///
/// One implementation moves a simulated robot, another records the
/// command stream into an on-robot program.
#[async_trait]
pub trait RobotDriver: Send + Sync {
    async fn move_home(&mut self) -> Result<()>;
    async fn move_to(&mut self, target: &str, pose: &na::Isometry3<f64>) -> Result<()>;
    async fn set_beam(&mut self, on: bool) -> Result<()>;
    async fn hold(&mut self, duration: Duration) -> Result<()>;
}

/// Simulated robot that runs the sequence in real time
pub struct SimulatedRobot {
    config: StationConfig,
    workspace: WorkspaceBounds,
    current_pose: na::Isometry3<f64>,
    beam_on: bool,
}

impl SimulatedRobot {
    pub fn new(config: StationConfig) -> Result<Box<Self>> {
        config.validate()?;
        let workspace = WorkspaceBounds::new(&config);
        let current_pose = config.home.to_pose();
        tracing::info!(
            robot = %config.robot,
            frame = %config.frame,
            tool = %config.tool,
            "Simulated robot ready"
        );
        Ok(Box::new(SimulatedRobot {
            config,
            workspace,
            current_pose,
            beam_on: false,
        }))
    }

    pub fn beam_is_on(&self) -> bool {
        self.beam_on
    }

    pub fn current_pose(&self) -> &na::Isometry3<f64> {
        &self.current_pose
    }

    fn travel_time(&self, target: &na::Isometry3<f64>) -> Duration {
        let distance =
            (target.translation.vector - self.current_pose.translation.vector).norm();
        Duration::from_secs_f64(distance / self.config.move_speed)
    }

    async fn travel_to(&mut self, pose: na::Isometry3<f64>) {
        tokio::time::sleep(self.travel_time(&pose)).await;
        self.current_pose = pose;
    }
}

#[async_trait]
impl RobotDriver for SimulatedRobot {
    async fn move_home(&mut self) -> Result<()> {
        tracing::debug!("Moving to home pose");
        let home = self.config.home.to_pose();
        self.travel_to(home).await;
        Ok(())
    }

    async fn move_to(&mut self, target: &str, pose: &na::Isometry3<f64>) -> Result<()> {
        if !self.workspace.pose_reachable(pose) {
            return Err(DriverError::Unreachable(target.to_owned()));
        }
        tracing::debug!("Moving to {}", target);
        self.travel_to(*pose).await;
        Ok(())
    }

    async fn set_beam(&mut self, on: bool) -> Result<()> {
        self.beam_on = on;
        tracing::info!("{} -> {}", self.config.beam_signal, on);
        Ok(())
    }

    async fn hold(&mut self, duration: Duration) -> Result<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }
}
