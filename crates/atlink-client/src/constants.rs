//! Engine constants
//!
//! Status codes follow the protocol convention: `0` is success, small
//! negative values are engine-level failures, and extended error codes from
//! `ERROR:<n>` lines are reported as `EXTENDED_ERROR_OFFSET - n` so they can
//! never collide with the fixed codes.

/// Command completed with `OK`.
pub const STATUS_OK: i32 = 0;

/// Remote responded with a plain `ERROR`.
pub const STATUS_SERVER_ERROR: i32 = -1;

/// No terminal status line arrived within the command timeout.
pub const STATUS_TIMEOUT: i32 = -2;

/// The transport reported a read or write failure.
pub const STATUS_IO_ERROR: i32 = -3;

/// Local usage or codec failure (never sent by the remote side).
pub const STATUS_PROTOCOL_ERROR: i32 = -4;

/// Base for extended error codes: `ERROR:<n>` maps to this offset minus `n`.
pub const EXTENDED_ERROR_OFFSET: i32 = -100;

/// Terminal success line.
pub const OK_RESPONSE: &str = "OK";

/// Terminal failure line (optionally followed by `:<digits>`).
pub const ERROR_RESPONSE: &str = "ERROR";

/// Prefix identifying an echoed command line.
pub const COMMAND_ECHO_PREFIX: &str = "AT";

/// Default receive line buffer capacity in bytes.
pub const DEFAULT_RX_BUFFER_SIZE: usize = 1024;

/// Default URC arena capacity in bytes.
pub const DEFAULT_URC_ARENA_SIZE: usize = 2048;

/// Default command timeout in milliseconds.
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 10_000;

/// Default per-iteration transport read timeout in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 20;

/// Upper bound for completing an in-flight binary frame outside a command.
pub const BINARY_FRAME_TIMEOUT_MS: u64 = 1_000;

/// Transport read chunk size.
pub(crate) const RX_CHUNK_SIZE: usize = 256;
