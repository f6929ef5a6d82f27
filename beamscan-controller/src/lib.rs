//! Replays Cartesian scan sequences on a robot mounted x-ray head.
//!
//! Sequences are loaded from CSV, converted into homogeneous
//! transforms and replayed either on a simulated robot or into a
//! recorded on-robot program.

pub mod executor;
pub mod pose;
pub mod program;
pub mod robot_driver;
pub mod station_config;
pub mod task;
pub mod workspace;
