//! Error type for loading a store.

use std::path::PathBuf;

use routestore_artifacts::ArtifactError;
use thiserror::Error;

use crate::region::RegionName;

#[derive(Debug, Error)]
pub enum DatastoreError {
    /// A required artifact path was not configured.
    #[error("no path configured for {0}")]
    MissingConfig(&'static str),

    #[error("artifact not found: {}", path.display())]
    MissingArtifact { path: PathBuf },

    /// The path exists but is a directory or other non-regular file.
    #[error("{} is not a regular file", path.display())]
    NotAFile { path: PathBuf },

    #[error("{} is empty", path.display())]
    EmptyArtifact { path: PathBuf },

    /// Fewer bytes or records than a header declared.
    #[error("{artifact}: truncated {what}: expected {expected}, found {found}")]
    TruncatedFile {
        artifact: String,
        what: &'static str,
        expected: u64,
        found: u64,
    },

    /// A header value is structurally invalid.
    #[error("{artifact} is corrupt: {reason}")]
    CorruptArtifact { artifact: String, reason: String },

    #[error("cannot allocate {size} bytes for region {region}: {reason}")]
    Allocation {
        region: RegionName,
        size: usize,
        reason: String,
    },

    #[error("region {0} was already published in this run")]
    AlreadyPublished(RegionName),

    #[error("store at {} is locked by another loader: {reason}", path.display())]
    StoreLocked { path: PathBuf, reason: String },

    #[error("invalid config file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ArtifactError> for DatastoreError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::Io(e) => DatastoreError::Io(e),
            ArtifactError::Truncated {
                source,
                what,
                expected,
                found,
            } => DatastoreError::TruncatedFile {
                artifact: source,
                what,
                expected,
                found,
            },
            ArtifactError::Invalid(m) => {
                DatastoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, m))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DatastoreError>;
