//! Geo-referenced elevation grids and the raster sources that supply them.
//!
//! # References
//!
//! 1. [GDAL geotransform tutorial](https://gdal.org/tutorials/geotransforms_tut.html)
//! 1. [Spherical pseudo-mercator](https://epsg.io/3857)

mod error;
mod grid;
pub mod mercator;
mod source;

pub use crate::{
    error::ElevationError,
    grid::{BoundingBox, ElevationGrid, GeoTransform},
    source::{GridSource, Raster, RasterSource, SyntheticSource},
};

/// Base floating point type used for all coordinates and samples.
///
/// Note: this _could_ be a generic parameter, but elevation providers
/// hand back arbitrary-precision rasters anyway, and keeping the whole
/// stack at `f64` avoids precision surprises in mercator coordinates,
/// which run into the tens of millions of meters.
pub type C = f64;
