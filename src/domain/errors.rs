//! Structured error types for scope-trace
//!
//! Using thiserror for automatic Display implementation and error chaining.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    /// The session could not open its destination; the session stays
    /// inactive and no partial header is written.
    #[error("failed to open trace destination {path}: {source}")]
    DestinationOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A mid-session write or flush failed. Surfaced per call; the document
    /// may be left malformed (accepted degradation, no automatic recovery).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
