//! Wire format constants
//!
//! These constants define the framing bytes shared by the codec and the
//! protocol engine.

/// Marker byte introducing an inline binary transfer frame.
pub const BINARY_MARKER: u8 = 0x01;

/// Size of the binary transfer length prefix (big-endian u16).
pub const BINARY_LENGTH_SIZE: usize = 2;

/// Maximum payload length of a single binary transfer frame.
pub const MAX_BINARY_LENGTH: usize = u16::MAX as usize;

/// Line terminator appended to outgoing commands.
pub const COMMAND_TERMINATOR: u8 = b'\r';

/// Top-level parameter separator.
pub const PARAM_SEPARATOR: u8 = b',';
