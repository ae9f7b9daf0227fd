use crate::{CameraError, CameraPose};
use nalgebra::{Point3, Vector3};

/// A bundle of per-pixel rays sharing the camera origin.
///
/// Entries are row-major with linear index `v * width + u`; row `v = 0`
/// is the bottom image row.
#[derive(Debug, Clone, PartialEq)]
pub struct RayBatch {
    pub origins: Vec<Point3<f64>>,
    pub directions: Vec<Vector3<f64>>,
    pub pixels: Vec<(u32, u32)>,
}

impl RayBatch {
    /// Number of rays in the bundle.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.directions.len()
    }
}

/// Generates the per-pixel world-space ray bundle for `pose`.
///
/// Directions sample sub-pixel centers: the outermost rays sit half a
/// pixel inside the frustum edge, so pixel (0, 0) is the extreme
/// bottom-left sample of the field of view, not its corner.
pub fn to_rays(pose: &CameraPose) -> Result<RayBatch, CameraError> {
    let (width, height) = pose.resolution;
    if width == 0 || height == 0 {
        return Err(CameraError::InvalidResolution(width, height));
    }

    let half_fov = pose.fov.to_radians() / 2.0;
    // Half extents on the camera's z = -1 plane.
    let extent_x = half_fov.tan() * (1.0 - 1.0 / f64::from(width));
    let extent_y = half_fov.tan() * (1.0 - 1.0 / f64::from(height));

    let n = width as usize * height as usize;
    let mut directions = Vec::with_capacity(n);
    let mut pixels = Vec::with_capacity(n);
    for v in 0..height {
        let y = axis_sample(extent_y, v, height);
        for u in 0..width {
            let x = axis_sample(extent_x, u, width);
            let direction = Vector3::new(x, y, -1.0).normalize();
            directions.push(pose.rotation * direction);
            pixels.push((u, v));
        }
    }

    Ok(RayBatch {
        origins: vec![pose.position; n],
        directions,
        pixels,
    })
}

/// Linear sample of `[-extent, extent]` at position `i` of `count`.
fn axis_sample(extent: f64, i: u32, count: u32) -> f64 {
    if count < 2 {
        0.0
    } else {
        -extent + 2.0 * extent * f64::from(i) / f64::from(count - 1)
    }
}
