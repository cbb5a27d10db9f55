use thiserror::Error;

pub type GenerateResult<T> = Result<T, GenerateError>;

/// Fatal failures of a package build. Recoverable problems (skipped lines,
/// font fallback) are reported as warnings instead.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no valid term pairs found")]
    NoPairs,

    #[error("template archive error: {0}")]
    Archive(String),

    #[error("template manifest not found at {path}")]
    ManifestMissing { path: String },

    #[error("manifest JSON error: {0}")]
    ManifestParse(#[from] serde_json::Error),

    #[error("unexpected manifest shape: {0}")]
    ManifestShape(String),

    #[error("failed to encode card image: {0}")]
    Render(#[from] image::ImageError),

    #[error("scratch area I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    pub fn manifest_shape(msg: impl Into<String>) -> Self {
        Self::ManifestShape(msg.into())
    }
}

impl From<zip::result::ZipError> for GenerateError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::Archive(other.to_string()),
        }
    }
}
