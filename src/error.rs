//! Error types for the wallpaper saver

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaverError {
    /// The lock-screen cache directory is missing or cannot be listed
    #[error("cannot read source directory {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read destination directory {}: {source}", .path.display())]
    DestinationUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading a single candidate failed (e.g. it vanished after listing)
    #[error("cannot read candidate {}: {source}", .path.display())]
    CandidateUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {reason}", .path.display())]
    CandidateWriteFailed { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SaverError {
    /// True when the source directory does not exist at all, which usually
    /// means the lock-screen slideshow feature is turned off.
    pub fn is_source_missing(&self) -> bool {
        matches!(
            self,
            SaverError::SourceUnreadable { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, SaverError>;
