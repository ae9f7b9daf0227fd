use crate::{DepthBuffer, DepthError};
use camera::{to_rays, CameraPose, Telemetry};
use elevation::{mercator, BoundingBox, GridSource, RasterSource};
use log::{debug, warn};
use nalgebra::{Point3, Vector3};
use raycast::{Scene, SceneCache};
use std::sync::Arc;
use terramesh::TerrainMesh;

/// A rendered depth map and the camera that produced it.
#[derive(Debug, Clone)]
pub struct DepthMap {
    /// Camera pose after ground anchoring.
    pub camera: CameraPose,

    /// Per-pixel forward distances; sentinel `0.0` where no terrain
    /// was hit.
    pub buffer: DepthBuffer,

    /// Valid hit locations, in hit order.
    pub locations: Vec<Point3<f64>>,
}

impl DepthMap {
    pub fn builder(telemetry: Telemetry) -> DepthMapBuilder<'static> {
        DepthMapBuilder {
            telemetry,
            extent: 2000.0,
            grid_resolution: (2000, 2000),
            grid_scale: 0.1,
            render_scale: 0.15,
            cache: None,
        }
    }
}

pub struct DepthMapBuilder<'a> {
    telemetry: Telemetry,

    /// Side of the terrain bounding box around the camera (meters).
    extent: f64,

    /// Nominal elevation grid dimensions.
    grid_resolution: (usize, usize),

    /// Scale applied to the nominal grid dimensions.
    grid_scale: f64,

    /// Output resolution as a fraction of the telemetry pixel size.
    render_scale: f64,

    /// Prepared-scene cache to reuse across runs.
    cache: Option<&'a SceneCache>,
}

impl<'a> DepthMapBuilder<'a> {
    /// Side of the terrain bounding box around the camera (meters,
    /// defaults to 2000).
    #[must_use]
    pub fn extent(mut self, meters: f64) -> Self {
        self.extent = meters;
        self
    }

    /// Nominal elevation grid dimensions (defaults to 2000x2000).
    #[must_use]
    pub fn grid_resolution(mut self, cols: usize, rows: usize) -> Self {
        self.grid_resolution = (cols, rows);
        self
    }

    /// Scale applied to the nominal grid dimensions (defaults to 0.1).
    #[must_use]
    pub fn grid_scale(mut self, scale: f64) -> Self {
        self.grid_scale = scale;
        self
    }

    /// Output resolution as a fraction of the telemetry pixel size
    /// (defaults to 0.15).
    #[must_use]
    pub fn render_scale(mut self, scale: f64) -> Self {
        self.render_scale = scale;
        self
    }

    /// Reuse prepared scenes from `cache` across runs.
    #[must_use]
    pub fn cache(self, cache: &SceneCache) -> DepthMapBuilder<'_> {
        DepthMapBuilder {
            telemetry: self.telemetry,
            extent: self.extent,
            grid_resolution: self.grid_resolution,
            grid_scale: self.grid_scale,
            render_scale: self.render_scale,
            cache: Some(cache),
        }
    }

    /// Runs the pipeline against `source`.
    pub fn build<S: RasterSource>(&self, source: &S) -> Result<DepthMap, DepthError> {
        let planar = mercator::to_planar(self.telemetry.position);

        let bbox = BoundingBox::around(planar, self.extent)?;
        let grid = GridSource::new(source)
            .resolution(self.grid_resolution.0, self.grid_resolution.1)
            .scale(self.grid_scale)
            .fetch(&bbox)?;

        let mesh = TerrainMesh::build(&grid)?;
        let scene: Arc<Scene> = match self.cache {
            Some(cache) => cache.get_or_build(&mesh)?,
            None => Arc::new(Scene::new(&mesh)?),
        };

        let pose = CameraPose::from_telemetry(&self.telemetry, planar)
            .scale_resolution(self.render_scale);
        let pose = anchor_to_ground(&pose, &scene);

        let batch = to_rays(&pose)?;
        let now = std::time::Instant::now();
        let hits = scene.intersect_locations(&batch.origins, &batch.directions, false);
        debug!(
            "intersect; rays: {}, hits: {}, exec: {:?}",
            batch.len(),
            hits.len(),
            now.elapsed()
        );

        let mut buffer = DepthBuffer::new(pose.resolution.0, pose.resolution.1);
        let mut locations = Vec::with_capacity(hits.len());
        for hit in &hits {
            // Signed forward distance, comparable across view angles.
            let depth = (hit.location - pose.position).dot(&batch.directions[hit.ray]);
            let (u, v) = batch.pixels[hit.ray];
            #[allow(clippy::cast_possible_truncation)]
            buffer.set(u, v, depth as f32);
            locations.push(hit.location);
        }

        Ok(DepthMap {
            camera: pose,
            buffer,
            locations,
        })
    }
}

/// Anchors the camera height to the terrain under it.
///
/// A single straight-down probe ray measures the ground height; the
/// camera's z moves by twice that height, correcting for disagreement
/// between the telemetry altitude and the mesh elevation datum. With no
/// terrain under the camera the raw altitude stands.
pub fn anchor_to_ground(pose: &CameraPose, scene: &Scene) -> CameraPose {
    let probe = scene.intersect_locations(
        &[pose.position],
        &[Vector3::new(0.0, 0.0, -1.0)],
        false,
    );
    match probe.first() {
        Some(hit) => {
            let offset = 2.0 * hit.location.z;
            debug!(
                "anchor; ground: {:.2}, z_offset: {offset:.2}",
                hit.location.z
            );
            pose.with_z_offset(offset)
        }
        None => {
            warn!("probe ray found no terrain under the camera; keeping telemetry altitude");
            pose.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DepthMap;
    use approx::assert_relative_eq;
    use camera::Telemetry;
    use elevation::SyntheticSource;
    use geo::geometry::Coord;

    /// Camera over the null island origin looking straight down.
    fn nadir_telemetry(altitude: f64, fov: f64, pixels: u32) -> Telemetry {
        Telemetry {
            file_name: "test.jpg".to_string(),
            position: Coord { x: 0.0, y: 0.0 },
            altitude,
            roll: 0.0,
            pitch: -90.0,
            yaw: 0.0,
            width: pixels,
            height: pixels,
            fov,
        }
    }

    #[test]
    fn test_anchor_doubles_ground_height() {
        // Flat terrain at 5 m; probe hit raises the camera by 10 m.
        let map = DepthMap::builder(nadir_telemetry(20.0, 10.0, 5))
            .extent(100.0)
            .grid_resolution(20, 20)
            .grid_scale(1.0)
            .render_scale(1.0)
            .build(&SyntheticSource::new(|_, _| 5.0))
            .unwrap();
        assert_relative_eq!(map.camera.position.z, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_anchor_misses_softly() {
        // Terrain above the camera: the probe finds nothing and the
        // telemetry altitude stands.
        let map = DepthMap::builder(nadir_telemetry(2.0, 10.0, 3))
            .extent(100.0)
            .grid_resolution(20, 20)
            .grid_scale(1.0)
            .render_scale(1.0)
            .build(&SyntheticSource::new(|_, _| 5.0))
            .unwrap();
        assert_relative_eq!(map.camera.position.z, 2.0, epsilon = 1e-9);
        assert_eq!(map.buffer.max_depth(), None);
    }

    #[test]
    fn test_flat_terrain_depths() {
        // Anchored camera sits at 30 m over 5 m terrain; forward depth
        // straight down is 25 m at the boresight, growing with the
        // off-axis angle toward the frame corners.
        let map = DepthMap::builder(nadir_telemetry(20.0, 10.0, 5))
            .extent(200.0)
            .grid_resolution(20, 20)
            .grid_scale(1.0)
            .render_scale(1.0)
            .build(&SyntheticSource::new(|_, _| 5.0))
            .unwrap();

        assert_eq!(map.buffer.width(), 5);
        assert_eq!(map.buffer.height(), 5);
        assert_eq!(map.locations.len(), 25);
        assert_relative_eq!(map.buffer.get(2, 2), 25.0, epsilon = 1e-6);

        // Corner rays tilt by tan(fov/2) on both axes at once.
        let spread = 5.0_f64.to_radians().tan();
        #[allow(clippy::cast_possible_truncation)]
        let limit = (25.0 * (1.0 + 2.0 * spread * spread).sqrt()) as f32;
        for &depth in map.buffer.data() {
            assert!(depth >= 25.0 && depth <= limit + 1e-6);
        }
    }

    #[test]
    fn test_rays_past_the_terrain_keep_the_sentinel() {
        // 20 m of terrain under a wide 120 degree cone from 30 m up:
        // corner rays land outside the mesh and keep the sentinel.
        let map = DepthMap::builder(nadir_telemetry(20.0, 120.0, 9))
            .extent(20.0)
            .grid_resolution(20, 20)
            .grid_scale(1.0)
            .render_scale(1.0)
            .build(&SyntheticSource::new(|_, _| 5.0))
            .unwrap();

        assert!(map.buffer.get(4, 4) > 0.0);
        assert_eq!(map.buffer.get(0, 0), 0.0);
        assert_eq!(map.buffer.get(8, 8), 0.0);
        assert!(map.locations.len() < 81);
    }

    #[test]
    fn test_depth_never_exceeds_hit_distance() {
        let map = DepthMap::builder(nadir_telemetry(40.0, 60.0, 7))
            .extent(400.0)
            .grid_resolution(40, 40)
            .grid_scale(1.0)
            .render_scale(1.0)
            .build(&SyntheticSource::new(|x, y| {
                5.0 + (x / 40.0).sin() * 3.0 + (y / 60.0).cos() * 2.0
            }))
            .unwrap();

        let camera = map.camera.position;
        let longest = map
            .locations
            .iter()
            .map(|location| (location - camera).norm())
            .fold(0.0_f64, f64::max);
        #[allow(clippy::cast_possible_truncation)]
        let limit = longest as f32;
        assert!(map.buffer.max_depth().unwrap() <= limit + 1e-3);
    }
}
