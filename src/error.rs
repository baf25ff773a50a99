#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    #[cfg(feature = "use-opencv")]
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),

    #[error("Image processing error: {0}")]
    Image(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<image::ImageError> for TrackerError {
    fn from(err: image::ImageError) -> Self {
        TrackerError::Image(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
