use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while capturing, labeling or saving polygons.
///
/// All variants are user-facing: the shell shows them in a notice and carries on.
#[derive(Debug, Error)]
pub enum Error {
    #[error("A polygon must have at least {min} points (got {count}).")]
    InsufficientVertices { count: usize, min: usize },

    #[error("Close the polygon before labeling it.")]
    NotClosed,

    #[error("You must select a label.")]
    NoLabelSelected,

    #[error("No annotations to save.")]
    NothingToExport,

    #[error("Could not access {}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Could not encode annotations: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    pub fn title(&self) -> &'static str {
        match self {
            Error::FileIo { .. } | Error::ImageLoad { .. } | Error::Encode(_) => "File error",
            _ => "Error",
        }
    }
}
