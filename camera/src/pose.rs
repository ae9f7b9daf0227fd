use crate::Telemetry;
use geo::geometry::Coord;
use nalgebra::{Point3, Rotation3, Vector3};

/// Camera position, orientation, and optics.
///
/// The unrotated camera looks down its local negative-Z axis; the
/// rotation maps camera-space directions into world space.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f64>,

    pub rotation: Rotation3<f64>,

    /// Field of view in degrees, applied to both image axes.
    pub fov: f64,

    /// Output resolution (width, height) in pixels.
    pub resolution: (u32, u32),
}

impl CameraPose {
    /// Derives a pose from telemetry, placing the camera at `planar`
    /// with the telemetry altitude.
    pub fn from_telemetry(telemetry: &Telemetry, planar: Coord<f64>) -> Self {
        Self {
            position: Point3::new(planar.x, planar.y, telemetry.altitude),
            rotation: rotation_from_rpy(telemetry.roll, telemetry.pitch, telemetry.yaw),
            fov: telemetry.fov,
            resolution: (telemetry.width, telemetry.height),
        }
    }

    /// Returns the pose with its resolution scaled by `factor`.
    #[must_use]
    pub fn scale_resolution(&self, factor: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let resolution = (
            (f64::from(self.resolution.0) * factor).round() as u32,
            (f64::from(self.resolution.1) * factor).round() as u32,
        );
        Self {
            resolution,
            ..self.clone()
        }
    }

    /// Returns the pose raised (or lowered) by `offset` meters.
    #[must_use]
    pub fn with_z_offset(&self, offset: f64) -> Self {
        let mut pose = self.clone();
        pose.position.z += offset;
        pose
    }
}

/// World rotation from telemetry roll/pitch/yaw degrees.
///
/// Composed right to left as `Rz(360 - yaw) * Ry(-roll) * Rx(90 + pitch)`.
/// Pitch -90 leaves the look direction on the nadir.
pub fn rotation_from_rpy(roll: f64, pitch: f64, yaw: f64) -> Rotation3<f64> {
    let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), (360.0 - yaw).to_radians());
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), (-roll).to_radians());
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), (90.0 + pitch).to_radians());
    rz * ry * rx
}

#[cfg(test)]
mod tests {
    use super::rotation_from_rpy;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};

    #[test]
    fn test_rotation_is_orthonormal() {
        let angles = [
            (0.0, 0.0, 0.0),
            (-0.253, -40.336, 300.814),
            (10.0, 45.0, 180.0),
            (-90.0, 12.5, 33.3),
            (359.9, -89.9, 0.1),
        ];
        for (roll, pitch, yaw) in angles {
            let r = rotation_from_rpy(roll, pitch, yaw);
            let product = r.matrix() * r.matrix().transpose();
            assert_relative_eq!(product, Matrix3::identity(), epsilon = 1e-12);
            assert_relative_eq!(r.matrix().determinant(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_nadir_pitch_looks_straight_down() {
        let r = rotation_from_rpy(0.0, -90.0, 0.0);
        let look = r * Vector3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(look, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_pitch_looks_at_horizon() {
        let r = rotation_from_rpy(0.0, 0.0, 0.0);
        let look = r * Vector3::new(0.0, 0.0, -1.0);
        assert_relative_eq!(look, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }
}
