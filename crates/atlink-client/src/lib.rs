//! Blocking AT command client for companion radio modules.
//!
//! This crate drives a module that speaks a line-oriented AT dialect over a
//! byte stream: commands go out as `AT+NAME=arg,arg\r`, the module answers
//! with response lines and a terminal `OK` / `ERROR` / `ERROR:<code>`, and
//! may interleave unsolicited result codes (URCs, lines starting with `+` or
//! `*`) at any time, including mid-command. Binary payloads ride inline,
//! introduced by a marker byte and a big-endian length.
//!
//! [`AtClient`] is the engine; [`Transport`] abstracts the byte stream
//! ([`SerialTransport`] behind the `serial` feature, [`MockTransport`] for
//! tests). Argument and parameter encoding live in `atlink-codec` and are
//! re-exported here for convenience.
//!
//! ```
//! use atlink_client::{AtClient, AtClientConfig, Arg, MockTransport};
//!
//! let mock = MockTransport::new();
//! mock.push_read(b"+GMI:\"acme\"\r\nOK\r\n");
//!
//! let client = AtClient::new(mock.clone(), AtClientConfig::default());
//! let response = client
//!     .command("AT+GMI")
//!     .expect_prefix("+GMI:")
//!     .execute()
//!     .unwrap();
//! assert_eq!(response.params_raw(), Some(&b"\"acme\""[..]));
//! assert_eq!(mock.written(), b"AT+GMI\r");
//! ```

// ============================================================================
// Modules
// ============================================================================

mod client;
mod constants;
mod error;
#[cfg(feature = "serial")]
mod serial;
mod transport;
mod urc;

pub use client::{AtClient, AtClientConfig, CommandBuilder, CommandResponse, UrcHandler};
pub use constants::*;
pub use error::{AtError, TransportError};
#[cfg(feature = "serial")]
pub use serial::{available_ports, SerialTransport};
pub use transport::{MockTransport, Transport};
pub use urc::{UrcEntry, UrcQueue};

pub use atlink_codec::{Arg, CodecError, ParamKind, ParamValue, ParseFailure};
