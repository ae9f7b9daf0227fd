//! Camera models derived from image telemetry.
//!
//! A [`Telemetry`] record carries what the capture platform knew about
//! an image: geodetic position, roll/pitch/yaw, optics. [`CameraPose`]
//! turns that into a world-space position and rotation, and [`to_rays`]
//! expands a pose into one ray per output pixel.

mod error;
mod pose;
mod rays;
mod telemetry;

pub use crate::{
    error::CameraError,
    pose::{rotation_from_rpy, CameraPose},
    rays::{to_rays, RayBatch},
    telemetry::Telemetry,
};
