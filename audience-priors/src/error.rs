//! Error types raised while reading, validating, or writing prior tables.
#![forbid(unsafe_code)]

use audience_core::SegmentPriorError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while handling prior-table artefacts.
#[derive(Debug, Error)]
pub enum PriorTableError {
    /// Opening the artefact for reading failed.
    #[error("failed to open prior table at {path}")]
    Open {
        /// Requested artefact path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The artefact was not a valid JSON prior table.
    #[error("failed to parse prior table at {path}")]
    Parse {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The artefact parsed but its entries were refused.
    #[error("invalid prior table at {path}")]
    Invalid {
        /// Artefact path.
        path: Utf8PathBuf,
        /// The entry that was refused.
        #[source]
        source: SegmentPriorError,
    },
    /// Creating the parent directory for the output artefact failed.
    #[error("failed to create parent directory {path}")]
    CreateParent {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Writing the artefact failed.
    #[error("failed to write prior table at {path}")]
    Write {
        /// Target artefact path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Serialising the table failed.
    #[error("failed to serialise prior table into {path}")]
    Serialise {
        /// Target artefact path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}
