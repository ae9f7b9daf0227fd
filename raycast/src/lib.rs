//! Batched ray/mesh intersection.
//!
//! Queries are written against a narrow [`Backend`] capability (nearest
//! triangle per ray), so the acceleration structure underneath is
//! swappable; the default delegates to parry's QBVH. Everything beyond
//! the nearest-hit query, notably the multi-hit walk that marches a ray
//! through successive surfaces, lives here.

mod backend;
mod error;
mod scene;

pub use crate::{
    backend::{Backend, LinearBackend, NearestHit, ParryBackend},
    error::RaycastError,
    scene::{Hit, Scene, SceneCache},
};
