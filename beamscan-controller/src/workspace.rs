use crate::station_config::StationConfig;
use nalgebra as na;
use parry3d_f64::{query::PointQuery, shape};

/// Spherical bound on where the x-ray head can be sent
///
/// Anything outside the sphere counts as unreachable. This stands in
/// for the kinematic reach check a real cell would run.
pub struct WorkspaceBounds {
    sphere: shape::Ball,
    center: na::Isometry3<f64>,
}

impl WorkspaceBounds {
    pub fn new(config: &StationConfig) -> Self {
        Self {
            sphere: shape::Ball::new(config.workspace_radius),
            center: na::Isometry3::translation(
                config.workspace_center.x,
                config.workspace_center.y,
                config.workspace_center.z,
            ),
        }
    }

    pub fn contains(&self, point: &na::Point3<f64>) -> bool {
        self.sphere.contains_point(&self.center, point)
    }

    pub fn pose_reachable(&self, pose: &na::Isometry3<f64>) -> bool {
        self.contains(&na::Point3::from(pose.translation.vector))
    }
}
