use crate::pose::XyzWpr;
use std::path::Path;
use std::time::Duration;
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("error while reading task file")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected 7 fields, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: {value:?} is not a number")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: {value} ms is not a valid hold time")]
    InvalidDuration { line: usize, value: f64 },
}

type Result<T> = std::result::Result<T, TaskError>;

/// One scan position with its beam hold time
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTask {
    pub pose: XyzWpr,
    /// hold time with the beam on, milliseconds as loaded
    pub duration_ms: f64,
}

impl ScanTask {
    pub fn new(pose: XyzWpr, duration_ms: f64) -> ScanTask {
        ScanTask { pose, duration_ms }
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_ms / 1000.0)
    }
}

/// Parse scan tasks from CSV text
///
/// Each row is `x, y, z, rx, ry, rz, duration_ms`.
/// Blank lines are skipped.
pub fn parse_tasks(text: &str) -> Result<Vec<ScanTask>> {
    let mut tasks = vec![];
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_number = index + 1;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 7 {
            return Err(TaskError::FieldCount {
                line: line_number,
                found: fields.len(),
            });
        }
        let mut values = [0.0_f64; 7];
        for (value, field) in values.iter_mut().zip(fields.iter()) {
            *value = field.parse().map_err(|_| TaskError::InvalidNumber {
                line: line_number,
                value: (*field).to_owned(),
            })?;
        }
        let [x, y, z, rx, ry, rz, duration_ms] = values;
        // a hold time has to convert to a Duration later on
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(TaskError::InvalidDuration {
                line: line_number,
                value: duration_ms,
            });
        }
        tasks.push(ScanTask::new(XyzWpr::new(x, y, z, rx, ry, rz), duration_ms));
    }
    Ok(tasks)
}

pub fn load_tasks(path: &Path) -> Result<Vec<ScanTask>> {
    let text = fs::read_to_string(path)?;
    let tasks = parse_tasks(&text)?;
    tracing::info!("Loaded {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: &str = "400.0,0.0,400.0,0.0,90.0,0.0,1500\n\
                          400.0,150.0,420.0,0.0,90.0,15.0,2000\n\
                          350.0,-150.0,420.0,10.0,80.0,-15.0,750.5\n";

    #[test]
    fn seven_column_rows_parse_into_expected_task_count() {
        let tasks = parse_tasks(SAMPLE).unwrap();
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn durations_pass_through_in_milliseconds() {
        let tasks = parse_tasks(SAMPLE).unwrap();
        assert_relative_eq!(tasks[0].duration_ms, 1500.0);
        assert_relative_eq!(tasks[2].duration_ms, 750.5);
        assert_relative_eq!(tasks[1].hold_duration().as_secs_f64(), 2.0);
    }

    #[test]
    fn pose_fields_map_in_order() {
        let tasks = parse_tasks(SAMPLE).unwrap();
        let pose = tasks[1].pose;
        assert_relative_eq!(pose.x, 400.0);
        assert_relative_eq!(pose.y, 150.0);
        assert_relative_eq!(pose.z, 420.0);
        assert_relative_eq!(pose.rx, 0.0);
        assert_relative_eq!(pose.ry, 90.0);
        assert_relative_eq!(pose.rz, 15.0);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = "1,2,3,4,5,6,7\n\n   \n1,2,3,4,5,6,8\n";
        let tasks = parse_tasks(text).unwrap();
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn short_row_reports_line_number() {
        let text = "1,2,3,4,5,6,7\n1,2,3\n";
        let error = parse_tasks(text).unwrap_err();
        assert!(matches!(error, TaskError::FieldCount { line: 2, found: 3 }));
    }

    #[test]
    fn negative_duration_is_rejected_at_parse_time() {
        let text = "0,0,0,0,0,0,-100\n";
        let error = parse_tasks(text).unwrap_err();
        match error {
            TaskError::InvalidDuration { line, value } => {
                assert_eq!(line, 1);
                assert_relative_eq!(value, -100.0);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_finite_durations_are_rejected_at_parse_time() {
        assert!(matches!(
            parse_tasks("0,0,0,0,0,0,NaN\n"),
            Err(TaskError::InvalidDuration { line: 1, .. })
        ));
        assert!(matches!(
            parse_tasks("0,0,0,0,0,0,inf\n"),
            Err(TaskError::InvalidDuration { line: 1, .. })
        ));
    }

    #[test]
    fn zero_duration_is_allowed() {
        let tasks = parse_tasks("0,0,0,0,0,0,0\n").unwrap();
        assert_eq!(tasks[0].hold_duration(), Duration::ZERO);
    }

    #[test]
    fn bad_number_reports_field() {
        let text = "1,2,3,4,5,six,7\n";
        let error = parse_tasks(text).unwrap_err();
        match error {
            TaskError::InvalidNumber { line, value } => {
                assert_eq!(line, 1);
                assert_eq!(value, "six");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
