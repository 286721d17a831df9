use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AugmentError {
    /// Bad arguments, bad config values, or an input directory with no usable images.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("class {class_id} has no source images in '{}'", dir.display())]
    EmptyClass { class_id: u32, dir: PathBuf },

    #[error("failed to decode image '{}'", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image '{}'", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("i/o error on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad label on line {line}: {message}")]
    Label { line: usize, message: String },
}

impl AugmentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AugmentError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AugmentError>;
