//! Client error types.

use thiserror::Error;

use atlink_codec::{CodecError, ParseFailure};

use crate::constants::*;

/// Errors surfaced by the transport layer.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-specific numeric error code.
    #[error("transport error code {0}")]
    Code(i32),

    /// A binary frame could not be completed before its deadline.
    #[error("timed out mid-frame waiting for transport data")]
    Timeout,
}

impl TransportError {
    /// Numeric code retained for `last_io_error` queries.
    pub fn code(&self) -> i32 {
        match self {
            TransportError::Io(err) => err.raw_os_error().unwrap_or(STATUS_IO_ERROR),
            TransportError::Code(code) => *code,
            TransportError::Timeout => STATUS_TIMEOUT,
        }
    }
}

/// Errors produced by command execution.
///
/// A remote `ERROR` is a normal, expected command outcome and is reported
/// here rather than panicking or aborting anything.
#[derive(Error, Debug)]
pub enum AtError {
    /// Remote responded with a plain `ERROR`.
    #[error("remote responded ERROR")]
    ServerError,

    /// Remote responded with `ERROR:<code>`.
    #[error("remote responded ERROR:{0}")]
    ExtendedError(i32),

    /// No terminal status line arrived within the command timeout.
    #[error("command timed out")]
    Timeout,

    /// The transport failed; the original error is retained.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// A command or poll was issued from inside a direct-dispatch URC
    /// handler, which runs on the receive stack and would deadlock.
    #[error("engine busy: called from a direct-dispatch URC handler")]
    BusyReentry,

    /// Command argument formatting failed.
    #[error("command formatting failed: {0}")]
    Codec(#[from] CodecError),

    /// Response parameter parsing failed.
    #[error("response parsing failed: {0}")]
    Parse(#[from] ParseFailure),
}

impl AtError {
    /// The numeric status code for this error, following the
    /// [`crate::constants`] convention. Extended errors map to
    /// [`EXTENDED_ERROR_OFFSET`] minus the wire code.
    pub fn status_code(&self) -> i32 {
        match self {
            AtError::ServerError => STATUS_SERVER_ERROR,
            AtError::ExtendedError(code) => EXTENDED_ERROR_OFFSET - code,
            AtError::Timeout => STATUS_TIMEOUT,
            AtError::Transport(_) => STATUS_IO_ERROR,
            AtError::BusyReentry | AtError::Codec(_) | AtError::Parse(_) => {
                STATUS_PROTOCOL_ERROR
            }
        }
    }
}
