use crate::{BoundingBox, ElevationError, ElevationGrid, GeoTransform, C};
use log::debug;

/// An opaque raster payload as returned by a provider.
///
/// `samples` are row-major elevations; row 0 sits at `transform.origin_y`.
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub transform: GeoTransform,
    pub samples: Vec<C>,
}

/// A provider of elevation rasters.
///
/// Remote map services implement this outside the workspace; the crate
/// itself ships only [`SyntheticSource`].
pub trait RasterSource {
    /// Largest area this source will serve, in CRS units per axis.
    fn max_extent(&self) -> Option<(C, C)> {
        None
    }

    /// Returns a raster covering `bbox` sampled at `size` (cols, rows).
    fn raster(&self, bbox: &BoundingBox, size: (usize, usize)) -> Result<Raster, ElevationError>;
}

impl<S: RasterSource + ?Sized> RasterSource for &S {
    fn max_extent(&self) -> Option<(C, C)> {
        (**self).max_extent()
    }

    fn raster(&self, bbox: &BoundingBox, size: (usize, usize)) -> Result<Raster, ElevationError> {
        (**self).raster(bbox, size)
    }
}

/// Fetches validated elevation grids from a raster source.
pub struct GridSource<S> {
    source: S,
    resolution: (usize, usize),
    scale: C,
}

impl<S: RasterSource> GridSource<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            resolution: (2000, 2000),
            scale: 1.0,
        }
    }

    /// Nominal sample grid dimensions (cols, rows) before scaling.
    #[must_use]
    pub fn resolution(mut self, cols: usize, rows: usize) -> Self {
        self.resolution = (cols, rows);
        self
    }

    /// Scale factor applied to the nominal resolution.
    #[must_use]
    pub fn scale(mut self, scale: C) -> Self {
        self.scale = scale;
        self
    }

    /// Fetches the elevation grid covering `bbox`.
    ///
    /// A bbox larger than the source's capability is rejected with
    /// [`ElevationError::BoundsTooLarge`] rather than silently
    /// downsampled.
    pub fn fetch(&self, bbox: &BoundingBox) -> Result<ElevationGrid, ElevationError> {
        if let Some((max_x, max_y)) = self.source.max_extent() {
            if bbox.width() > max_x || bbox.height() > max_y {
                return Err(ElevationError::BoundsTooLarge {
                    want_x: bbox.width(),
                    want_y: bbox.height(),
                    max_x,
                    max_y,
                });
            }
        }

        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = (
            (self.resolution.0 as C * self.scale) as usize,
            (self.resolution.1 as C * self.scale) as usize,
        );
        if size.0 < 2 || size.1 < 2 {
            return Err(ElevationError::InsufficientGrid {
                width: size.0,
                height: size.1,
            });
        }

        let now = std::time::Instant::now();
        let raster = self.source.raster(bbox, size)?;
        debug!(
            "raster; size: {}x{}, fetch_exec: {:?}",
            raster.width,
            raster.height,
            now.elapsed()
        );

        ElevationGrid::new(raster.width, raster.height, raster.transform, raster.samples)
    }
}

/// Procedural raster source backed by an elevation function of world x/y.
///
/// Stands in for a remote provider in tests and offline runs.
pub struct SyntheticSource<F> {
    elevation: F,
}

impl<F> SyntheticSource<F>
where
    F: Fn(C, C) -> C,
{
    pub fn new(elevation: F) -> Self {
        Self { elevation }
    }
}

impl<F> RasterSource for SyntheticSource<F>
where
    F: Fn(C, C) -> C,
{
    fn raster(&self, bbox: &BoundingBox, size: (usize, usize)) -> Result<Raster, ElevationError> {
        let (cols, rows) = size;
        if cols < 2 || rows < 2 {
            return Err(ElevationError::InsufficientGrid {
                width: cols,
                height: rows,
            });
        }

        // First sample on the min edge, last sample on the max edge.
        #[allow(clippy::cast_precision_loss)]
        let transform = GeoTransform::north_up(
            bbox.min_x(),
            bbox.min_y(),
            bbox.width() / (cols - 1) as C,
            bbox.height() / (rows - 1) as C,
        );

        let mut samples = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                samples.push((self.elevation)(transform.x(col), transform.y(row)));
            }
        }

        Ok(Raster {
            width: cols,
            height: rows,
            transform,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{GridSource, Raster, RasterSource, SyntheticSource};
    use crate::{BoundingBox, ElevationError, C};

    struct CappedSource;

    impl RasterSource for CappedSource {
        fn max_extent(&self) -> Option<(C, C)> {
            Some((1000.0, 1000.0))
        }

        fn raster(
            &self,
            _bbox: &BoundingBox,
            _size: (usize, usize),
        ) -> Result<Raster, ElevationError> {
            unreachable!("bounds check rejects before fetch")
        }
    }

    struct DownSource;

    impl RasterSource for DownSource {
        fn raster(
            &self,
            _bbox: &BoundingBox,
            _size: (usize, usize),
        ) -> Result<Raster, ElevationError> {
            Err(ElevationError::ProviderUnavailable("503".to_string()))
        }
    }

    #[test]
    fn test_synthetic_grid_shape() {
        let bbox = BoundingBox::new(-50.0, -50.0, 50.0, 50.0).unwrap();
        let source = GridSource::new(SyntheticSource::new(|_, _| 7.0))
            .resolution(100, 80)
            .scale(0.1);
        let grid = source.fetch(&bbox).unwrap();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 8);
        assert_eq!(grid.get(0, 0), 7.0);
        assert_eq!(grid.get(9, 7), 7.0);
        // Grid corners land on the bbox corners.
        assert_eq!(grid.transform().x(0), -50.0);
        assert_eq!(grid.transform().x(9), 50.0);
        assert_eq!(grid.transform().y(7), 50.0);
    }

    #[test]
    fn test_synthetic_samples_follow_function() {
        let bbox = BoundingBox::new(0.0, 0.0, 4.0, 4.0).unwrap();
        let source = GridSource::new(SyntheticSource::new(|x, y| x + 10.0 * y))
            .resolution(5, 5)
            .scale(1.0);
        let grid = source.fetch(&bbox).unwrap();
        assert_eq!(grid.get(3, 0), 3.0);
        assert_eq!(grid.get(0, 2), 20.0);
        assert_eq!(grid.get(4, 4), 44.0);
    }

    #[test]
    fn test_oversized_bbox_is_rejected() {
        let bbox = BoundingBox::new(0.0, 0.0, 2000.0, 500.0).unwrap();
        let err = GridSource::new(CappedSource).fetch(&bbox).unwrap_err();
        assert!(matches!(err, ElevationError::BoundsTooLarge { .. }));
    }

    #[test]
    fn test_unavailable_source_propagates() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let err = GridSource::new(DownSource).fetch(&bbox).unwrap_err();
        assert!(matches!(err, ElevationError::ProviderUnavailable(_)));
    }

    #[test]
    fn test_degenerate_request_is_rejected() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let err = GridSource::new(SyntheticSource::new(|_, _| 0.0))
            .resolution(10, 10)
            .scale(0.1)
            .fetch(&bbox)
            .unwrap_err();
        assert!(matches!(err, ElevationError::InsufficientGrid { .. }));
    }
}
