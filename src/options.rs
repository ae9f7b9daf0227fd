use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Renders per-pixel terrain depth maps from image telemetry.
#[derive(Parser, Debug)]
pub struct Cli {
    /// Telemetry file (two tab-separated lines: keys, values).
    #[arg(short, long)]
    pub telemetry: PathBuf,

    /// Side of the terrain bounding box around the camera, meters.
    #[arg(long, default_value_t = 2000.0)]
    pub extent: f64,

    /// Scale applied to the nominal 2000x2000 elevation grid.
    #[arg(long, default_value_t = 0.1)]
    pub grid_scale: f64,

    /// Output resolution as a fraction of the telemetry pixel size.
    #[arg(long, default_value_t = 0.15)]
    pub render_scale: f64,

    /// Procedural terrain standing in for a remote elevation service.
    #[arg(long, value_enum, default_value = "hills")]
    pub relief: Relief,

    /// Base elevation of the procedural terrain, meters.
    #[arg(long, default_value_t = 40.0)]
    pub base_elevation: f64,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Relief {
    /// Constant elevation everywhere.
    Flat,

    /// Gentle sinusoidal hills.
    Hills,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the depth image and the hit-location listing.
    Render {
        /// Depth image path (single-channel f32 TIFF).
        #[arg(long, default_value = "depthmap.tiff")]
        depth_out: PathBuf,

        /// Hit-location listing path (x,y,z per line).
        #[arg(long, default_value = "out.xyz")]
        points_out: PathBuf,
    },

    /// Print a run summary as JSON.
    Json,
}
