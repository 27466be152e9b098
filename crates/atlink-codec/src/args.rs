//! Command argument formatting.
//!
//! Outgoing commands are rendered from a typed argument sequence rather than
//! a runtime format string, so argument-count and type mismatches are caught
//! at compile time.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::address::{encode_hex_upper, format_ipv4, format_ipv6, BdAddress, MacAddress};
use crate::constants::{BINARY_MARKER, MAX_BINARY_LENGTH, PARAM_SEPARATOR};
use crate::error::CodecError;

/// A typed command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg<'a> {
    /// Signed decimal integer.
    Int(i64),
    /// Quoted string. The formatter wraps it in `"..."` without applying any
    /// escaping; callers must not embed raw quotes.
    String(&'a str),
    /// Hex-encoded byte buffer (two uppercase hex chars per byte).
    HexBytes(&'a [u8]),
    /// Raw byte buffer sent via the binary-transfer framing. Must be the last
    /// argument; the engine suppresses the line terminator after it.
    Binary(&'a [u8]),
    /// IPv4 address.
    Ipv4(Ipv4Addr),
    /// IPv6 address (rendered in the full 8-group form).
    Ipv6(Ipv6Addr),
    /// MAC address.
    Mac(MacAddress),
    /// Bluetooth device address.
    Bd(BdAddress),
}

/// Render a command line into `out`: the command name followed by the
/// comma-joined arguments.
///
/// A [`Arg::Binary`] argument is rendered as the binary-transfer frame
/// (marker + 2-byte big-endian length + raw bytes) with no comma before it
/// and nothing after it. Returns `true` if the command ended with a binary
/// transfer, in which case no line terminator must be appended: the remote
/// side is expecting raw bytes, not another line.
pub fn format_command(
    out: &mut Vec<u8>,
    name: &str,
    args: &[Arg<'_>],
) -> Result<bool, CodecError> {
    out.extend_from_slice(name.as_bytes());

    let mut ends_binary = false;
    for (i, arg) in args.iter().enumerate() {
        if ends_binary {
            // A binary argument was not the last one.
            return Err(CodecError::BinaryNotLast);
        }
        match arg {
            Arg::Int(v) => {
                if i > 0 {
                    out.push(PARAM_SEPARATOR);
                }
                out.extend_from_slice(v.to_string().as_bytes());
            }
            Arg::String(s) => {
                if i > 0 {
                    out.push(PARAM_SEPARATOR);
                }
                out.push(b'"');
                out.extend_from_slice(s.as_bytes());
                out.push(b'"');
            }
            Arg::HexBytes(bytes) => {
                if i > 0 {
                    out.push(PARAM_SEPARATOR);
                }
                encode_hex_upper(bytes, out);
            }
            Arg::Binary(bytes) => {
                if bytes.len() > MAX_BINARY_LENGTH {
                    return Err(CodecError::BinaryTooLong {
                        max: MAX_BINARY_LENGTH,
                        actual: bytes.len(),
                    });
                }
                out.push(BINARY_MARKER);
                out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
                out.extend_from_slice(bytes);
                ends_binary = true;
            }
            Arg::Ipv4(addr) => {
                if i > 0 {
                    out.push(PARAM_SEPARATOR);
                }
                out.extend_from_slice(format_ipv4(addr).as_bytes());
            }
            Arg::Ipv6(addr) => {
                if i > 0 {
                    out.push(PARAM_SEPARATOR);
                }
                out.extend_from_slice(format_ipv6(addr).as_bytes());
            }
            Arg::Mac(mac) => {
                if i > 0 {
                    out.push(PARAM_SEPARATOR);
                }
                out.extend_from_slice(mac.to_string().as_bytes());
            }
            Arg::Bd(bd) => {
                if i > 0 {
                    out.push(PARAM_SEPARATOR);
                }
                out.extend_from_slice(bd.to_string().as_bytes());
            }
        }
    }
    Ok(ends_binary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_no_args() {
        let mut out = Vec::new();
        let ends_binary = format_command(&mut out, "AT+FOO", &[]).unwrap();
        assert!(!ends_binary);
        assert_eq!(out, b"AT+FOO");
    }

    #[test]
    fn test_format_comma_joined() {
        let mut out = Vec::new();
        format_command(
            &mut out,
            "AT+FOO=",
            &[Arg::Int(-7), Arg::String("hej"), Arg::HexBytes(&[0xDE, 0xAD])],
        )
        .unwrap();
        assert_eq!(out, b"AT+FOO=-7,\"hej\",DEAD");
    }

    #[test]
    fn test_format_ipv4_example() {
        let mut out = Vec::new();
        format_command(
            &mut out,
            "AT+FOO=",
            &[Arg::Ipv4(std::net::Ipv4Addr::from(0x0010_2030u32))],
        )
        .unwrap();
        assert_eq!(out, b"AT+FOO=0.16.32.48");
    }

    #[test]
    fn test_format_binary_frame() {
        let mut out = Vec::new();
        let ends_binary =
            format_command(&mut out, "AT+WR=", &[Arg::Int(3), Arg::Binary(b"abc")]).unwrap();
        assert!(ends_binary);
        // "AT+WR=3" then marker, big-endian length, raw bytes; no comma
        // before the frame and nothing after it.
        assert_eq!(out, b"AT+WR=3\x01\x00\x03abc");
    }

    #[test]
    fn test_format_binary_must_be_last() {
        let mut out = Vec::new();
        let err = format_command(&mut out, "AT+WR=", &[Arg::Binary(b"abc"), Arg::Int(1)]);
        assert_eq!(err, Err(CodecError::BinaryNotLast));
    }

    #[test]
    fn test_format_binary_too_long() {
        let big = vec![0u8; MAX_BINARY_LENGTH + 1];
        let mut out = Vec::new();
        let err = format_command(&mut out, "AT+WR=", &[Arg::Binary(&big)]);
        assert!(matches!(err, Err(CodecError::BinaryTooLong { .. })));
    }
}
