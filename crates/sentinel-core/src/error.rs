//! Error types for sentinel-core

use std::path::PathBuf;

/// Result type for sentinel-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sentinel-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The baseline document does not exist.
    #[error("baseline file not found: {path}")]
    BaselineMissing { path: PathBuf },

    /// The baseline document parsed to nothing usable.
    #[error("baseline file is empty or invalid: {path}")]
    BaselineInvalid { path: PathBuf },

    /// A seal exists but its recorded digest does not match the document.
    /// Entries loaded alongside this error must not be trusted.
    #[error(
        "baseline tamper guard failed: seal digest mismatch; \
         the baseline may have been modified outside Sentinel"
    )]
    SealMismatch,

    /// A seal file exists but carries no digest field.
    #[error("baseline seal file is invalid: {path}")]
    SealInvalid { path: PathBuf },

    /// Hashing a file failed where a digest was required.
    #[error("failed to hash {path}")]
    HashFailed { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fs(#[from] sentinel_fs::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means "no baseline exists" as opposed to
    /// "a baseline exists but cannot be trusted or read".
    pub fn is_baseline_missing(&self) -> bool {
        matches!(self, Self::BaselineMissing { .. })
    }
}
