//! Error types emitted by the audience CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use audience_core::IngressError;
use audience_priors::PriorTableError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the audience CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass it as an argument or set {env})")]
    MissingArgument {
        /// Name of the missing argument.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name of the offending option.
        field: &'static str,
        /// Path that was not found.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name of the offending option.
        field: &'static str,
        /// Path that is not a regular file.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name of the offending option.
        field: &'static str,
        /// Path that could not be inspected.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Loading or writing a prior table failed.
    #[error(transparent)]
    Priors(#[from] PriorTableError),
    /// Opening the session file failed.
    #[error("failed to open session at {path:?}: {source}")]
    OpenSession {
        /// Session path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Session JSON could not be decoded.
    #[error("failed to parse session JSON at {path:?}: {source}")]
    ParseSession {
        /// Session path.
        path: Utf8PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// A login in the session was rejected.
    #[error("login #{index} in session was rejected: {source}")]
    RejectedLogin {
        /// Zero-based position within `logins`.
        index: usize,
        /// Rejection reported by the profile service.
        #[source]
        source: IngressError,
    },
    /// An event in the session was rejected.
    #[error("event #{index} in session was rejected: {source}")]
    RejectedEvent {
        /// Zero-based position within `events`.
        index: usize,
        /// Rejection reported by the profile service.
        #[source]
        source: IngressError,
    },
    /// A requested profile could not be produced.
    #[error("profile lookup failed: {0}")]
    Profile(#[source] IngressError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
