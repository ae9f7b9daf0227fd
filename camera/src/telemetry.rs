use crate::CameraError;
use geo::geometry::Coord;
use std::collections::HashMap;

/// Parsed image telemetry record.
///
/// Keys follow the flat key/value export this tool consumes:
/// `file_name`, `wkt_geom`, `roll`, `pitch`, `yaw`, `x_pixels`,
/// `y_pixels`, `fov`.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    /// Identifier of the source image.
    pub file_name: String,

    /// Geodetic camera position (lon, lat) in degrees.
    pub position: Coord<f64>,

    /// Telemetry altitude in meters.
    pub altitude: f64,

    /// Roll in degrees.
    pub roll: f64,

    /// Pitch in degrees.
    pub pitch: f64,

    /// Yaw in degrees.
    pub yaw: f64,

    /// Source image width in pixels.
    pub width: u32,

    /// Source image height in pixels.
    pub height: u32,

    /// Field of view in degrees.
    pub fov: f64,
}

impl Telemetry {
    /// Builds a record from flat key/value pairs.
    pub fn from_record(record: &HashMap<String, String>) -> Result<Self, CameraError> {
        let field = |key: &'static str| {
            record
                .get(key)
                .map(String::as_str)
                .ok_or(CameraError::MissingField(key))
        };

        let geom = parse_geom("wkt_geom", field("wkt_geom")?)?;
        let [lon, lat, altitude, ..] = geom[..] else {
            return Err(CameraError::MalformedField {
                field: "wkt_geom",
                value: field("wkt_geom")?.to_string(),
            });
        };

        Ok(Self {
            file_name: field("file_name")?.to_string(),
            position: Coord { x: lon, y: lat },
            altitude,
            roll: parse_f64("roll", field("roll")?)?,
            pitch: parse_f64("pitch", field("pitch")?)?,
            yaw: parse_f64("yaw", field("yaw")?)?,
            width: parse_u32("x_pixels", field("x_pixels")?)?,
            height: parse_u32("y_pixels", field("y_pixels")?)?,
            fov: parse_f64("fov", field("fov")?)?,
        })
    }

    /// Reads the two-line tab-separated header/value format.
    pub fn from_tsv(text: &str) -> Result<Self, CameraError> {
        let mut lines = text.lines();
        let keys = lines.next().ok_or(CameraError::MissingField("header row"))?;
        let vals = lines.next().ok_or(CameraError::MissingField("value row"))?;
        let record = keys
            .split('\t')
            .map(str::trim)
            .zip(vals.split('\t').map(str::trim))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::from_record(&record)
    }
}

/// Parses a numeric list, tolerating bracket wrapping: `[a b c]` and
/// `a b c` both work.
fn parse_geom(field: &'static str, value: &str) -> Result<Vec<f64>, CameraError> {
    value
        .replace(['[', ']'], " ")
        .split_whitespace()
        .map(|v| {
            v.parse::<f64>().map_err(|_| CameraError::MalformedField {
                field,
                value: value.to_string(),
            })
        })
        .collect()
}

fn parse_f64(field: &'static str, value: &str) -> Result<f64, CameraError> {
    value.parse().map_err(|_| CameraError::MalformedField {
        field,
        value: value.to_string(),
    })
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, CameraError> {
    value.parse().map_err(|_| CameraError::MalformedField {
        field,
        value: value.to_string(),
    })
}
