use crate::strip::Backend;

/// Everything a strip operation or an animation can fail with.
#[derive(Debug, thiserror::Error)]
pub enum StripError {
    #[error("{backend} backend is not available: {reason}")]
    BackendUnavailable { backend: Backend, reason: String },

    #[error("index {index} out of bounds for a strip of {led_count} LEDs")]
    IndexOutOfBounds { index: usize, led_count: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("device error: {0}")]
    Device(String),

    #[error("frame output failed")]
    Io(#[from] std::io::Error),

    #[error("failed to write frame timeline")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = StripError> = std::result::Result<T, E>;
