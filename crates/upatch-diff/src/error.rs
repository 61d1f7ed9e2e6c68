//! Error types for patch rendering.

use std::fmt;
use std::io;

/// Which input of a comparison an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

/// Errors that can occur while rendering a patch.
///
/// Every variant is terminal for the comparison in progress. Bytes already
/// written to the sink are not rolled back.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Both sides of the comparison are absent.
    #[error("no objects to compare, both are absent")]
    EmptyComparison,

    /// Reading one of the content streams failed.
    #[error("failed to read {side} content: {source}")]
    StreamRead {
        side: Side,
        #[source]
        source: io::Error,
    },

    /// Writing to the output sink failed.
    #[error("failed to write patch output: {0}")]
    SinkWrite(#[source] io::Error),
}

/// Convenience alias for patch results.
pub type PatchResult<T> = Result<T, PatchError>;
