//! Error types for methylbed
//!
//! Defines all error types used throughout the library.
//!
//! Only two things are fatal here: a reference asset that cannot be read,
//! and an output file that cannot be written. Row-level problems (unknown
//! chromosome, unusable beta value, missing annotation) are recovered by
//! dropping the row and are tracked in the per-file statistics instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for methylbed operations
#[derive(Debug, Error)]
pub enum MethylBedError {
    /// Reference asset loading errors
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Settings file errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Conversion errors
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading a reference asset (Gencode, NCBI, HGNC)
///
/// These are always fatal for the run: partial annotation state must not
/// be trusted.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Asset file is missing
    #[error("Reference asset not found: {0}")]
    NotFound(PathBuf),

    /// Asset file exists but cannot be read
    #[error("Failed to read reference asset {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    /// Wrap an I/O error with the asset path it refers to
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            AssetError::NotFound(path.to_path_buf())
        } else {
            AssetError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Errors raised while loading the settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file is missing or unreadable
    #[error("Settings file not readable: {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML
    #[error("Invalid settings file {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Errors raised during file conversion
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input file cannot be opened
    #[error("Input file not readable: {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file cannot be written
    #[error("Failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while streaming the input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for methylbed operations
pub type Result<T> = std::result::Result<T, MethylBedError>;

/// Result type alias for asset loading
pub type AssetResult<T> = std::result::Result<T, AssetError>;

/// Result type alias for conversion
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
