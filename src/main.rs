mod artifact;
mod options;

use anyhow::Result;
use camera::Telemetry;
use clap::Parser;
use depthmap::DepthMap;
use elevation::SyntheticSource;
use options::{Cli, Command, Relief};
use serde::Serialize;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.telemetry)?;
    let telemetry = Telemetry::from_tsv(&text)?;

    let builder = DepthMap::builder(telemetry)
        .extent(cli.extent)
        .grid_scale(cli.grid_scale)
        .render_scale(cli.render_scale);

    let base = cli.base_elevation;
    let map = match cli.relief {
        Relief::Flat => builder.build(&SyntheticSource::new(move |_, _| base))?,
        Relief::Hills => builder.build(&SyntheticSource::new(move |x, y| {
            base + (x / 230.0).sin() * 15.0 + (y / 310.0).cos() * 10.0
        }))?,
    };

    match cli.cmd {
        Command::Render {
            depth_out,
            points_out,
        } => {
            artifact::write_depth(&depth_out, &map.buffer)?;
            artifact::write_points(&points_out, &map)?;
            println!("Wrote {} pts", map.locations.len());
            Ok(())
        }
        Command::Json => json(&map),
    }
}

fn json(map: &DepthMap) -> Result<()> {
    #[derive(Serialize)]
    struct Summary {
        width: u32,
        height: u32,
        hits: usize,
        camera: [f64; 3],
        min_depth: Option<f32>,
        max_depth: Option<f32>,
    }

    let summary = Summary {
        width: map.buffer.width(),
        height: map.buffer.height(),
        hits: map.locations.len(),
        camera: [
            map.camera.position.x,
            map.camera.position.y,
            map.camera.position.z,
        ],
        min_depth: map.buffer.min_depth(),
        max_depth: map.buffer.max_depth(),
    };
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
