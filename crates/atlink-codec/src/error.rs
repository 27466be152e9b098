//! Codec error types.

use thiserror::Error;

/// Errors that can occur while formatting or parsing parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A quoted string ended without a closing quote.
    #[error("unterminated quoted string")]
    UnterminatedQuote,

    /// Input ended with a dangling backslash escape.
    #[error("dangling escape at end of input")]
    DanglingEscape,

    /// Unrecognized escape sequence inside a quoted string.
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),

    /// Integer parameter contains non-digit characters or overflows.
    #[error("invalid integer parameter: {0}")]
    InvalidInt(String),

    /// Hex-encoded parameter has an odd number of digits.
    #[error("odd-length hex parameter")]
    OddHexLength,

    /// Non-hex character where a hex digit was expected.
    #[error("invalid hex digit 0x{0:02X}")]
    InvalidHexDigit(u8),

    /// Malformed IPv4 address text.
    #[error("invalid IPv4 address: {0}")]
    InvalidIpv4(String),

    /// Malformed IPv6 address text.
    #[error("invalid IPv6 address: {0}")]
    InvalidIpv6(String),

    /// Malformed MAC address text.
    #[error("invalid MAC address: {0}")]
    InvalidMac(String),

    /// Malformed Bluetooth address text.
    #[error("invalid Bluetooth address: {0}")]
    InvalidBdAddress(String),

    /// Malformed `[a,b,c]` integer list.
    #[error("invalid integer list: {0}")]
    InvalidIntList(String),

    /// A binary argument appeared before the end of the argument list.
    #[error("binary argument must be the last argument")]
    BinaryNotLast,

    /// Binary argument exceeds the 2-byte length prefix.
    #[error("binary argument too long: {actual} bytes (max {max})")]
    BinaryTooLong {
        /// Maximum representable length.
        max: usize,
        /// Actual argument length.
        actual: usize,
    },

    /// String parameter is not valid UTF-8 after unescaping.
    #[error("invalid UTF-8 in string parameter")]
    InvalidUtf8,
}

/// A parameter-line decode failure.
///
/// Carries how many parameters decoded successfully before the failing one,
/// so callers can report which parameter of a response was malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parameter decode failed after {decoded} parameter(s): {source}")]
pub struct ParseFailure {
    /// Number of parameters successfully decoded before the failure.
    pub decoded: usize,
    /// The underlying decode error.
    #[source]
    pub source: CodecError,
}
