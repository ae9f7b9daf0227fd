//! Depth-map synthesis pipeline.
//!
//! Wires the `elevation`, `terramesh`, `camera`, and `raycast` crates
//! into one run: fetch terrain around the camera's ground position,
//! anchor the camera to the ground with a probe ray, cast one ray per
//! pixel, and collect forward distances into a depth buffer.

mod buffer;
mod error;
mod pipeline;

pub use crate::{
    buffer::DepthBuffer,
    error::DepthError,
    pipeline::{anchor_to_ground, DepthMap, DepthMapBuilder},
};
