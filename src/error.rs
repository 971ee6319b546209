//! Error types for cable conversion.

use std::io;
use std::path::PathBuf;

/// Error type for conversion operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input root is unusable: no `cable` marker, missing, or unreadable.
    #[error("configuration error: {0}")]
    Config(String),

    /// An input file could not be opened. Aborts the whole run.
    #[error("error opening {}: {source}", .path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The expected header table or body block is missing.
    #[error("parse error: {0}")]
    Parse(String),

    /// The input path cannot be mapped below the output root.
    #[error("path error: {0}")]
    Path(String),

    /// Creating the output directory or writing the output file failed.
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Fatal errors end the run; everything else only skips the current file.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_) | Error::InputOpen { .. })
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
