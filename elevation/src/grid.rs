use crate::{ElevationError, C};
use geo::geometry::Coord;

/// Axis-aligned bounding box in planar CRS meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_x: C,
    min_y: C,
    max_x: C,
    max_y: C,
}

impl BoundingBox {
    pub fn new(min_x: C, min_y: C, max_x: C, max_y: C) -> Result<Self, ElevationError> {
        if min_x < max_x && min_y < max_y {
            Ok(Self {
                min_x,
                min_y,
                max_x,
                max_y,
            })
        } else {
            Err(ElevationError::MalformedBounds {
                min_x,
                min_y,
                max_x,
                max_y,
            })
        }
    }

    /// Returns the box of side `extent` centered on `center`.
    pub fn around(center: Coord<C>, extent: C) -> Result<Self, ElevationError> {
        let half = extent / 2.0;
        Self::new(
            center.x - half,
            center.y - half,
            center.x + half,
            center.y + half,
        )
    }

    pub fn min_x(&self) -> C {
        self.min_x
    }

    pub fn min_y(&self) -> C {
        self.min_y
    }

    pub fn max_x(&self) -> C {
        self.max_x
    }

    pub fn max_y(&self) -> C {
        self.max_y
    }

    /// East-west extent in CRS units.
    pub fn width(&self) -> C {
        self.max_x - self.min_x
    }

    /// North-south extent in CRS units.
    pub fn height(&self) -> C {
        self.max_y - self.min_y
    }
}

/// Affine mapping from grid `(col, row)` to world `(x, y)`.
///
/// Coefficient layout follows GDAL's geotransform convention. The
/// rotation terms are carried through from the provider but play no part
/// in vertex placement; every raster we consume is axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: C,
    pub pixel_size_x: C,
    pub row_rotation: C,
    pub origin_y: C,
    pub col_rotation: C,
    pub pixel_size_y: C,
}

impl GeoTransform {
    /// An axis-aligned transform with zero rotation terms.
    pub fn north_up(origin_x: C, origin_y: C, pixel_size_x: C, pixel_size_y: C) -> Self {
        Self {
            origin_x,
            pixel_size_x,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_size_y,
        }
    }

    /// World x of grid column `col`.
    #[allow(clippy::cast_precision_loss)]
    pub fn x(&self, col: usize) -> C {
        self.origin_x + col as C * self.pixel_size_x
    }

    /// World y of grid row `row`.
    #[allow(clippy::cast_precision_loss)]
    pub fn y(&self, row: usize) -> C {
        self.origin_y + row as C * self.pixel_size_y
    }

    pub(crate) fn validate(&self) -> Result<(), ElevationError> {
        if self.pixel_size_x == 0.0 || self.pixel_size_y == 0.0 {
            Err(ElevationError::DegenerateTransform)
        } else {
            Ok(())
        }
    }
}

/// A `width` x `height` grid of elevation samples and its grid-to-world
/// transform.
///
/// Immutable once produced; sample `(col, row)` sits at world
/// `(transform.x(col), transform.y(row))`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    transform: GeoTransform,
    samples: Vec<C>,
}

impl ElevationGrid {
    pub fn new(
        width: usize,
        height: usize,
        transform: GeoTransform,
        samples: Vec<C>,
    ) -> Result<Self, ElevationError> {
        transform.validate()?;
        if samples.len() != width * height {
            return Err(ElevationError::SampleCount {
                count: samples.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            transform,
            samples,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Elevation sample at grid position `(col, row)`.
    pub fn get(&self, col: usize, row: usize) -> C {
        self.samples[row * self.width + col]
    }

    /// Row-major elevation samples.
    pub fn samples(&self) -> &[C] {
        &self.samples
    }
}
