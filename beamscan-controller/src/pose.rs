use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Six parameter Cartesian pose
///
/// Position is in millimeters.
/// Orientation angles are in degrees and are applied
/// about Z, then Y, then X.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct XyzWpr {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl XyzWpr {
    pub fn new(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> XyzWpr {
        XyzWpr {
            x,
            y,
            z,
            rx,
            ry,
            rz,
        }
    }

    /// Convert to a homogeneous transform
    ///
    /// Important! The rotation order is Z, then Y, then X
    pub fn to_pose(&self) -> na::Isometry3<f64> {
        let translation = na::Translation3::new(self.x, self.y, self.z);
        let rotation =
            na::UnitQuaternion::from_axis_angle(&na::Vector3::z_axis(), self.rz.to_radians())
                * na::UnitQuaternion::from_axis_angle(&na::Vector3::y_axis(), self.ry.to_radians())
                * na::UnitQuaternion::from_axis_angle(&na::Vector3::x_axis(), self.rx.to_radians());
        na::Isometry3::from_parts(translation, rotation)
    }

    pub fn from_pose(pose: &na::Isometry3<f64>) -> XyzWpr {
        // nalgebra euler angles use the same Z, Y, X application order
        let (roll, pitch, yaw) = pose.rotation.euler_angles();
        XyzWpr {
            x: pose.translation.x,
            y: pose.translation.y,
            z: pose.translation.z,
            rx: roll.to_degrees(),
            ry: pitch.to_degrees(),
            rz: yaw.to_degrees(),
        }
    }
}
