//! AT Command Link Parameter Codec
//!
//! This crate provides the wire-level parameter codec used by the AT command
//! link client. It is vocabulary-agnostic: it knows how to render typed
//! command arguments into the comma-separated parameter syntax and how to
//! destructure a received parameter line back into typed values, but it knows
//! nothing about any particular `AT+XXX` command.
//!
//! # Wire syntax
//!
//! - Parameters are separated by top-level commas (not inside a quoted span,
//!   not inside a bracketed `[...]` list, not preceded by an odd run of
//!   backslash escapes).
//! - Strings are wrapped in `"..."`; escapes `\"` `\\` `\n` `\r` `\t` `\b`
//!   `\0` and `\xHH` are expanded on decode.
//! - Byte buffers are hex-encoded (two uppercase hex chars per byte) or sent
//!   raw via the binary-transfer framing (marker byte + 2-byte big-endian
//!   length + raw bytes).
//! - Addresses (IPv4, IPv6, MAC, Bluetooth) have dedicated text forms.
//!
//! # Example
//!
//! ```rust
//! use atlink_codec::{format_command, parse_params, Arg, ParamKind, ParamValue};
//!
//! let mut wire = Vec::new();
//! format_command(&mut wire, "AT+FOO=", &[Arg::Int(42), Arg::String("bar")]).unwrap();
//! assert_eq!(wire, b"AT+FOO=42,\"bar\"");
//!
//! let mut line = b"42,\"bar\"".to_vec();
//! let values = parse_params(&mut line, &[ParamKind::Int, ParamKind::String]).unwrap();
//! assert_eq!(values[0], ParamValue::Int(42));
//! ```

mod address;
mod args;
mod constants;
mod error;
mod params;

pub use address::*;
pub use args::*;
pub use constants::*;
pub use error::*;
pub use params::*;
