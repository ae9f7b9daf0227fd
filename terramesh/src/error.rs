use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("{width}x{height} grid is too small to triangulate")]
    InsufficientGrid { width: usize, height: usize },
}
