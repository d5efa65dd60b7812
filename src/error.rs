//! Error types for the picture sorter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for picture sorter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the picture sorter
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("{path}: Could not find file date")]
    DateNotFound { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("Failed to start viewer '{program}': {message}")]
    Viewer { program: String, message: String },

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Chrono parse error: {0}")]
    ChronoParse(#[from] chrono::ParseError),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt(err.to_string())
    }
}
