//! Triangulated terrain surfaces built from elevation grids.

mod error;

pub use crate::error::MeshError;

use elevation::ElevationGrid;
use nalgebra::{Point3, Vector3};
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// A triangulated terrain surface in world coordinates.
///
/// Vertices are enumerated row-major from the source grid, so the
/// vertex for grid position `(col, row)` has linear index
/// `row * width + col`. Each grid cell contributes two triangles split
/// along the same diagonal, giving `(W-1) * (H-1) * 2` faces in total.
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[u32; 3]>,
}

impl TerrainMesh {
    /// Triangulates `grid` into a terrain surface.
    pub fn build(grid: &ElevationGrid) -> Result<Self, MeshError> {
        let (width, height) = (grid.width(), grid.height());
        if width < 2 || height < 2 {
            return Err(MeshError::InsufficientGrid { width, height });
        }

        let transform = grid.transform();
        let mut vertices = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                vertices.push(Point3::new(
                    transform.x(col),
                    transform.y(row),
                    grid.get(col, row),
                ));
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let w = width as u32;
        let mut faces = Vec::with_capacity((width - 1) * (height - 1) * 2);
        for row in 0..height - 1 {
            for col in 0..width - 1 {
                #[allow(clippy::cast_possible_truncation)]
                let a = (row * width + col) as u32;
                faces.push([a, a + w, a + w + 1]);
                faces.push([a, a + w + 1, a + 1]);
            }
        }

        Ok(Self { vertices, faces })
    }

    /// Vertex positions, row-major from the source grid.
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Triangle vertex-index triples.
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Number of triangles.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// The three vertices of face `id`.
    pub fn triangle(&self, id: u32) -> [Point3<f64>; 3] {
        let [a, b, c] = self.faces[id as usize];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Unit normal of face `id`.
    pub fn face_normal(&self, id: u32) -> Vector3<f64> {
        let [a, b, c] = self.triangle(id);
        (b - a).cross(&(c - a)).normalize()
    }

    /// Length of the axis-aligned bounding box diagonal.
    ///
    /// Used as the characteristic extent when deriving ray-walk offsets.
    pub fn scale(&self) -> f64 {
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for v in &self.vertices {
            min = Point3::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z));
            max = Point3::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z));
        }
        (max - min).norm()
    }

    /// Content hash over vertex and face data.
    ///
    /// Two meshes with identical geometry fingerprint identically, so
    /// this is usable as an acceleration-structure cache key.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for v in &self.vertices {
            v.x.to_bits().hash(&mut hasher);
            v.y.to_bits().hash(&mut hasher);
            v.z.to_bits().hash(&mut hasher);
        }
        self.faces.hash(&mut hasher);
        hasher.finish()
    }
}
