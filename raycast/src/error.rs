use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaycastError {
    #[error("mesh has no triangles")]
    EmptyMesh,
}
