use anyhow::Result;
use depthmap::{DepthBuffer, DepthMap};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tiff::encoder::{colortype, TiffEncoder};

/// Writes the depth buffer as a single-channel 32-bit float TIFF.
///
/// Rows go bottom-up, matching the buffer; viewers expecting top-down
/// rasters must flip on load.
pub fn write_depth(path: &Path, buffer: &DepthBuffer) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
    encoder.write_image::<colortype::Gray32Float>(buffer.width(), buffer.height(), buffer.data())?;
    Ok(())
}

/// Writes the anchored camera position followed by every hit location,
/// one comma-separated coordinate triple per line.
pub fn write_points(path: &Path, map: &DepthMap) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let camera = map.camera.position;
    write_coord(&mut out, camera.x, camera.y, camera.z)?;
    for location in &map.locations {
        write_coord(&mut out, location.x, location.y, location.z)?;
    }
    Ok(())
}

fn write_coord<W: Write>(out: &mut W, x: f64, y: f64, z: f64) -> Result<()> {
    writeln!(out, "{x},{y},{z}")?;
    Ok(())
}
