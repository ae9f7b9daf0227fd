use crate::{Backend, ParryBackend, RaycastError};
use dashmap::DashMap;
use log::debug;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;
use terramesh::TerrainMesh;

/// Factor of the mesh extent used to offset a walked ray past the
/// triangle it just hit, so the next round cannot report the same
/// surface again.
const RAY_OFFSET_FACTOR: f64 = 1e-4;

/// Floor for the walk offset on very small meshes.
const RAY_OFFSET_FLOOR: f64 = 1e-8;

/// Smallest |normal . direction| accepted when intersecting a ray with
/// its hit triangle's plane.
const PLANE_DOT_MIN: f64 = 1e-5;

/// Default bound on walk rounds per ray.
const MAX_HITS: usize = 20;

/// A refined intersection along one ray of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the ray in the input batch.
    pub ray: usize,

    /// Index of the hit triangle.
    pub triangle: u32,

    /// Distance from the ray's original origin, along the unit
    /// direction. Strictly increasing across a ray's hits.
    pub distance: f64,

    /// Hit location in world space.
    pub location: Point3<f64>,
}

/// A mesh prepared for ray queries.
///
/// Construction is the one-time preprocessing step: the backend loads
/// the triangles into its acceleration structure and the per-triangle
/// plane data used by the walk is precomputed. A built scene is
/// read-only; concurrent queries are safe.
pub struct Scene {
    backend: Box<dyn Backend>,
    plane_origins: Vec<Point3<f64>>,
    plane_normals: Vec<Vector3<f64>>,
    scale: f64,
    fingerprint: u64,
}

impl Scene {
    /// Prepares `mesh` with the default parry backend.
    pub fn new(mesh: &TerrainMesh) -> Result<Self, RaycastError> {
        let backend = ParryBackend::new(mesh)?;
        Self::with_backend(mesh, Box::new(backend))
    }

    /// Prepares `mesh` with a caller-supplied backend.
    pub fn with_backend(
        mesh: &TerrainMesh,
        backend: Box<dyn Backend>,
    ) -> Result<Self, RaycastError> {
        if mesh.len() == 0 {
            return Err(RaycastError::EmptyMesh);
        }

        let mut plane_origins = Vec::with_capacity(mesh.len());
        let mut plane_normals = Vec::with_capacity(mesh.len());
        #[allow(clippy::cast_possible_truncation)]
        for id in 0..mesh.len() as u32 {
            plane_origins.push(mesh.triangle(id)[0]);
            plane_normals.push(mesh.face_normal(id));
        }

        let scale = mesh.scale();
        debug!("scene; triangles: {}, scale: {scale:.1}", mesh.len());

        Ok(Self {
            backend,
            plane_origins,
            plane_normals,
            scale,
            fingerprint: mesh.fingerprint(),
        })
    }

    /// Fingerprint of the mesh this scene was built from.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// First triangle hit by each ray, if any.
    pub fn intersect_first(
        &self,
        origins: &[Point3<f64>],
        directions: &[Vector3<f64>],
    ) -> Vec<Option<u32>> {
        let directions = unitized(directions);
        self.backend
            .nearest(origins, &directions)
            .into_iter()
            .map(|found| found.map(|hit| hit.triangle))
            .collect()
    }

    /// Refined hit locations for each ray, in hit order.
    ///
    /// With `multiple_hits`, every ray is walked through successive
    /// surfaces (up to 20 rounds): after each hit its origin advances
    /// just past the hit triangle and the scene is queried again.
    /// Without it, each ray reports at most its first hit.
    pub fn intersect_locations(
        &self,
        origins: &[Point3<f64>],
        directions: &[Vector3<f64>],
        multiple_hits: bool,
    ) -> Vec<Hit> {
        self.intersect_locations_capped(origins, directions, multiple_hits, MAX_HITS)
    }

    /// [`intersect_locations`](Self::intersect_locations) with an
    /// explicit round cap.
    pub fn intersect_locations_capped(
        &self,
        origins: &[Point3<f64>],
        directions: &[Vector3<f64>],
        multiple_hits: bool,
        max_hits: usize,
    ) -> Vec<Hit> {
        let directions = unitized(directions);
        let mut origins = origins.to_vec();
        let mut traveled = vec![0.0; origins.len()];
        let mut active: Vec<usize> = (0..origins.len()).collect();
        let mut hits = Vec::new();

        let offset = (self.scale * RAY_OFFSET_FACTOR).max(RAY_OFFSET_FLOOR);

        // Bounded rounds: a ray that somehow keeps reporting its own
        // offset triangle must still terminate.
        for _round in 0..max_hits {
            if active.is_empty() {
                break;
            }

            let round_origins: Vec<Point3<f64>> =
                active.iter().map(|&ray| origins[ray]).collect();
            let round_directions: Vec<Vector3<f64>> =
                active.iter().map(|&ray| directions[ray]).collect();
            let nearest = self.backend.nearest(&round_origins, &round_directions);

            let mut survivors = Vec::with_capacity(active.len());
            for (slot, found) in nearest.into_iter().enumerate() {
                let ray = active[slot];
                // A miss deactivates the ray permanently.
                let Some(found) = found else { continue };

                let triangle = found.triangle as usize;
                let direction = directions[ray];
                let denominator = self.plane_normals[triangle].dot(&direction);
                if denominator.abs() < PLANE_DOT_MIN {
                    // Ill-conditioned plane intersection; drop this
                    // ray's result and retire the ray.
                    continue;
                }
                let t = self.plane_normals[triangle]
                    .dot(&(self.plane_origins[triangle] - origins[ray]))
                    / denominator;
                let location = origins[ray] + direction * t;

                hits.push(Hit {
                    ray,
                    triangle: found.triangle,
                    distance: traveled[ray] + found.distance,
                    location,
                });

                if multiple_hits {
                    origins[ray] = location + direction * offset;
                    traveled[ray] += t + offset;
                    survivors.push(ray);
                }
            }

            if !multiple_hits {
                break;
            }
            active = survivors;
        }

        hits
    }
}

/// Prepared scenes keyed by mesh fingerprint.
///
/// Building an acceleration structure dwarfs query time for small
/// batches; callers intersecting the same mesh repeatedly should own
/// one of these.
#[derive(Default)]
pub struct SceneCache {
    scenes: DashMap<u64, Arc<Scene>>,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached scene for `mesh`, building it on first use.
    pub fn get_or_build(&self, mesh: &TerrainMesh) -> Result<Arc<Scene>, RaycastError> {
        self.scenes
            .entry(mesh.fingerprint())
            .or_try_insert_with(|| Scene::new(mesh).map(Arc::new))
            .map(|scene| scene.clone())
    }

    /// Number of cached scenes.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }
}

fn unitized(directions: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    directions.iter().map(|d| d.normalize()).collect()
}
