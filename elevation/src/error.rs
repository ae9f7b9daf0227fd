use thiserror::Error;

#[derive(Error, Debug)]
pub enum ElevationError {
    #[error("malformed bounding box ({min_x}, {min_y}, {max_x}, {max_y})")]
    MalformedBounds {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    #[error("requested {want_x}x{want_y} m area exceeds source limit of {max_x}x{max_y} m")]
    BoundsTooLarge {
        want_x: f64,
        want_y: f64,
        max_x: f64,
        max_y: f64,
    },

    #[error("elevation source unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("{width}x{height} grid has too few samples")]
    InsufficientGrid { width: usize, height: usize },

    #[error("{count} samples do not fill a {width}x{height} grid")]
    SampleCount {
        count: usize,
        width: usize,
        height: usize,
    },

    #[error("geo-transform has a zero pixel size")]
    DegenerateTransform,
}
