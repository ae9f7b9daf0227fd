use camera::CameraError;
use elevation::ElevationError;
use raycast::RaycastError;
use terramesh::MeshError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepthError {
    #[error("{0}")]
    Elevation(#[from] ElevationError),

    #[error("{0}")]
    Mesh(#[from] MeshError),

    #[error("{0}")]
    Camera(#[from] CameraError),

    #[error("{0}")]
    Raycast(#[from] RaycastError),
}
