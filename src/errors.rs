use std::path::PathBuf;
use thiserror::Error;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Structured error types for the background removal runner.
///
/// `MissingInput` is the only variant the binary handles itself; every other
/// variant is surfaced at the process boundary.
#[derive(Error, Debug)]
pub enum BgRemoveError {
    #[error("{} not found", path.display())]
    MissingInput { path: PathBuf },

    #[error("Filesystem error: {operation} failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image processing error: {operation} failed")]
    ImageProcessing {
        operation: String,
        #[source]
        source: BoxedError,
    },

    #[error("Model error: {operation} failed")]
    Model {
        operation: String,
        #[source]
        source: BoxedError,
    },
}

pub type Result<T> = std::result::Result<T, BgRemoveError>;

impl BgRemoveError {
    pub(crate) fn image<E>(operation: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxedError>,
    {
        Self::ImageProcessing {
            operation: operation.into(),
            source: source.into(),
        }
    }

    pub(crate) fn model<E>(operation: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxedError>,
    {
        Self::Model {
            operation: operation.into(),
            source: source.into(),
        }
    }

    pub const fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingInput { .. })
    }
}

/// Convert I/O errors to filesystem errors.
///
/// Callers that know the path construct `BgRemoveError::FileSystem` directly;
/// this is the fallback for I/O that happens inside encoders and decoders.
impl From<std::io::Error> for BgRemoveError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("unknown"),
            operation: "unknown".to_string(),
            source: err,
        }
    }
}

impl From<image::ImageError> for BgRemoveError {
    fn from(err: image::ImageError) -> Self {
        Self::image("image processing", err)
    }
}

impl From<ort::Error> for BgRemoveError {
    fn from(err: ort::Error) -> Self {
        Self::model("ort operation", err)
    }
}

/// Shape errors only show up while reshaping model tensors, so they are
/// reported as model errors.
impl From<ndarray::ShapeError> for BgRemoveError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::model("tensor shape conversion", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_message_names_path() {
        let err = BgRemoveError::MissingInput {
            path: PathBuf::from("missing.png"),
        };
        assert_eq!(err.to_string(), "missing.png not found");
        assert!(err.is_missing_input());
    }

    #[test]
    fn test_filesystem_error_keeps_source() {
        let err = BgRemoveError::FileSystem {
            path: PathBuf::from("out/b.png"),
            operation: "create output file".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("create output file"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_missing_input());
    }
}
