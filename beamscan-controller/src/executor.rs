use crate::robot_driver::{DriverError, RobotDriver};
use crate::task::ScanTask;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionSummary {
    pub completed: usize,
    pub skipped: usize,
}

/// Replays a scan sequence against a robot driver
///
/// Owns the driver for the duration of the sequence. The same
/// executor drives both the simulated robot and the program recorder.
pub struct TaskExecutor {
    driver: Box<dyn RobotDriver>,
    keep_running: Arc<AtomicBool>,
}

impl TaskExecutor {
    pub fn new(driver: Box<dyn RobotDriver>) -> TaskExecutor {
        TaskExecutor {
            driver,
            keep_running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flag checked between tasks. Clearing it stops the sequence
    /// with the beam off and the robot at home.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.keep_running.clone()
    }

    /// Run the whole sequence
    ///
    /// Targets are named `<sequence>-<index>`. A target the driver
    /// reports as unreachable is skipped with a warning, but the beam
    /// hold around it still happens. Any other driver error aborts.
    pub async fn run(
        &mut self,
        sequence: &str,
        tasks: &[ScanTask],
    ) -> Result<ExecutionSummary, DriverError> {
        let mut summary = ExecutionSummary::default();
        self.driver.move_home().await?;
        for (index, task) in tasks.iter().enumerate() {
            if !self.keep_running.load(Ordering::Relaxed) {
                tracing::info!("Stop requested, ending sequence early");
                self.driver.set_beam(false).await?;
                self.driver.move_home().await?;
                return Ok(summary);
            }
            let target = format!("{}-{}", sequence, index);
            match self.driver.move_to(&target, &task.pose.to_pose()).await {
                Ok(()) => summary.completed += 1,
                Err(DriverError::Unreachable(name)) => {
                    tracing::warn!("Warning: {} can not be reached", name);
                    summary.skipped += 1;
                }
                Err(error) => return Err(error),
            }
            self.driver.set_beam(true).await?;
            self.driver.hold(task.hold_duration()).await?;
            self.driver.set_beam(false).await?;
        }
        self.driver.move_home().await?;
        Ok(summary)
    }
}
