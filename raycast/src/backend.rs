use crate::RaycastError;
use nalgebra::{Point3, Vector3};
use parry3d_f64::{
    query::{Ray, RayCast},
    shape::{FeatureId, TriMesh},
};
use rayon::prelude::*;
use terramesh::TerrainMesh;

/// Nearest-hit answer for a single ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestHit {
    /// Index of the hit triangle.
    pub triangle: u32,

    /// Distance to the hit along the (unit) ray direction.
    pub distance: f64,
}

/// A ray/mesh intersection capability.
///
/// The walk in [`Scene`](crate::Scene) is written purely against this
/// trait, so the acceleration structure underneath is swappable.
/// Answers must come back in input ray order.
pub trait Backend: Send + Sync {
    /// Nearest hit for each ray, `None` where a ray misses the mesh.
    fn nearest(
        &self,
        origins: &[Point3<f64>],
        directions: &[Vector3<f64>],
    ) -> Vec<Option<NearestHit>>;
}

/// Backend delegating to parry's QBVH-backed [`TriMesh`].
///
/// The structure is read-only after construction; queries run in
/// parallel across the batch and are reassembled in input order.
pub struct ParryBackend {
    mesh: TriMesh,
}

impl ParryBackend {
    pub fn new(mesh: &TerrainMesh) -> Result<Self, RaycastError> {
        if mesh.len() == 0 {
            return Err(RaycastError::EmptyMesh);
        }
        Ok(Self {
            mesh: TriMesh::new(mesh.vertices().to_vec(), mesh.faces().to_vec()),
        })
    }
}

impl Backend for ParryBackend {
    fn nearest(
        &self,
        origins: &[Point3<f64>],
        directions: &[Vector3<f64>],
    ) -> Vec<Option<NearestHit>> {
        origins
            .par_iter()
            .zip(directions.par_iter())
            .map(|(origin, direction)| {
                let ray = Ray::new(*origin, *direction);
                self.mesh
                    .cast_local_ray_and_get_normal(&ray, f64::MAX, false)
                    .and_then(|intersection| match intersection.feature {
                        FeatureId::Face(triangle) => Some(NearestHit {
                            triangle,
                            distance: intersection.toi,
                        }),
                        _ => None,
                    })
            })
            .collect()
    }
}

/// Brute-force backend testing every triangle for every ray.
///
/// Quadratic; a reference implementation for small meshes and tests.
pub struct LinearBackend {
    triangles: Vec<[Point3<f64>; 3]>,
}

impl LinearBackend {
    pub fn new(mesh: &TerrainMesh) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let triangles = (0..mesh.len() as u32).map(|id| mesh.triangle(id)).collect();
        Self { triangles }
    }
}

impl Backend for LinearBackend {
    fn nearest(
        &self,
        origins: &[Point3<f64>],
        directions: &[Vector3<f64>],
    ) -> Vec<Option<NearestHit>> {
        origins
            .par_iter()
            .zip(directions.par_iter())
            .map(|(origin, direction)| {
                let mut best: Option<NearestHit> = None;
                for (id, triangle) in self.triangles.iter().enumerate() {
                    if let Some(distance) = ray_triangle(origin, direction, triangle) {
                        if best.map_or(true, |b| distance < b.distance) {
                            #[allow(clippy::cast_possible_truncation)]
                            let triangle = id as u32;
                            best = Some(NearestHit { triangle, distance });
                        }
                    }
                }
                best
            })
            .collect()
    }
}

/// Möller-Trumbore ray/triangle test.
///
/// Returns the distance for a front- or back-face hit at `t >= 0`.
fn ray_triangle(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    [a, b, c]: &[Point3<f64>; 3],
) -> Option<f64> {
    const DET_EPSILON: f64 = 1e-12;

    let edge1 = b - a;
    let edge2 = c - a;
    let h = direction.cross(&edge2);
    let det = edge1.dot(&h);
    if det.abs() < DET_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = inv_det * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(&edge1);
    let v = inv_det * direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = inv_det * edge2.dot(&q);
    (t >= 0.0).then_some(t)
}
