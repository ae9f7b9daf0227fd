use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("malformed field '{field}': {value:?}")]
    MalformedField {
        field: &'static str,
        value: String,
    },

    #[error("invalid resolution {0}x{1}")]
    InvalidResolution(u32, u32),
}
