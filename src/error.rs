//! Error types for the word list build
//!
//! Only conditions that terminate the run live in [`BuildError`]. Metadata
//! lookup failures and unreadable archive members are recovered from where
//! they happen and never reach this level.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of a build run
#[derive(Debug, Error)]
pub enum BuildError {
    /// Invalid startup configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The archive could not be fetched
    #[error("download of {url} failed")]
    Download {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The archive is not a readable gzip-compressed tarball
    #[error("failed to read archive")]
    Archive(#[source] std::io::Error),

    /// Nothing survived the filter
    #[error(
        "no words found; the archive layout may have changed \
         or the level bounds exclude every word file"
    )]
    EmptyWordSet,

    /// An output file could not be written
    #[error("failed to write {path:?}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn download<E>(url: &str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Download {
            url: url.to_string(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
