//! Typed address codecs.
//!
//! Each address kind has a dedicated text form on the wire:
//!
//! - IPv4: four dot-separated decimal octets (`192.168.0.1`)
//! - IPv6: eight colon-separated hex groups, optionally wrapped in `[...]`.
//!   The encoder always emits the full 8-group form; the decoder additionally
//!   accepts `::` zero-compression shorthand.
//! - MAC: six colon-separated uppercase hex byte pairs (`AA:BB:CC:DD:EE:FF`)
//! - Bluetooth: twelve hex digits plus an optional trailing `p` (public) or
//!   `r` (random) type suffix.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::CodecError;

// ============================================================================
// Hex helpers
// ============================================================================

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Encode bytes as uppercase hex with no separators.
pub fn encode_hex_upper(bytes: &[u8], out: &mut Vec<u8>) {
    for &b in bytes {
        out.push(HEX_UPPER[(b >> 4) as usize]);
        out.push(HEX_UPPER[(b & 0x0F) as usize]);
    }
}

/// Decode a single hex digit (either case).
pub fn hex_digit(b: u8) -> Result<u8, CodecError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        other => Err(CodecError::InvalidHexDigit(other)),
    }
}

fn hex_byte(hi: u8, lo: u8) -> Result<u8, CodecError> {
    Ok((hex_digit(hi)? << 4) | hex_digit(lo)?)
}

// ============================================================================
// IPv4
// ============================================================================

/// Render an IPv4 address as four dot-separated decimal octets.
pub fn format_ipv4(addr: &Ipv4Addr) -> String {
    let o = addr.octets();
    format!("{}.{}.{}.{}", o[0], o[1], o[2], o[3])
}

/// Parse an IPv4 address. Strict: exactly four octets, digits only, 0-255,
/// no surrounding garbage.
pub fn parse_ipv4(text: &str) -> Result<Ipv4Addr, CodecError> {
    let bad = || CodecError::InvalidIpv4(text.to_string());
    let mut octets = [0u8; 4];
    let mut count = 0;
    for part in text.split('.') {
        if count == 4 || part.is_empty() || part.len() > 3 {
            return Err(bad());
        }
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        octets[count] = part.parse::<u8>().map_err(|_| bad())?;
        count += 1;
    }
    if count != 4 {
        return Err(bad());
    }
    Ok(Ipv4Addr::from(octets))
}

// ============================================================================
// IPv6
// ============================================================================

/// Render an IPv6 address as the full eight-group form, lowercase hex,
/// no zero compression.
pub fn format_ipv6(addr: &Ipv6Addr) -> String {
    let s = addr.segments();
    format!(
        "{:x}:{:x}:{:x}:{:x}:{:x}:{:x}:{:x}:{:x}",
        s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7]
    )
}

/// Parse an IPv6 address.
///
/// Accepts the full 8-group form as well as `::` zero-compression, and an
/// optional `[...]` wrapping. Embedded IPv4 tails are not part of this
/// protocol and are rejected.
pub fn parse_ipv6(text: &str) -> Result<Ipv6Addr, CodecError> {
    let bad = || CodecError::InvalidIpv6(text.to_string());

    let inner = if let Some(stripped) = text.strip_prefix('[') {
        stripped.strip_suffix(']').ok_or_else(bad)?
    } else {
        text
    };
    if inner.is_empty() || inner.contains('.') {
        return Err(bad());
    }

    let parse_groups = |s: &str| -> Result<Vec<u16>, CodecError> {
        if s.is_empty() {
            return Ok(Vec::new());
        }
        s.split(':')
            .map(|g| {
                if g.is_empty() || g.len() > 4 {
                    return Err(bad());
                }
                let mut v: u16 = 0;
                for b in g.bytes() {
                    v = (v << 4) | u16::from(hex_digit(b).map_err(|_| bad())?);
                }
                Ok(v)
            })
            .collect()
    };

    let mut segments = [0u16; 8];
    match inner.split_once("::") {
        Some((head, tail)) => {
            if tail.contains("::") {
                return Err(bad());
            }
            let head = parse_groups(head)?;
            let tail = parse_groups(tail)?;
            if head.len() + tail.len() > 7 {
                return Err(bad());
            }
            segments[..head.len()].copy_from_slice(&head);
            segments[8 - tail.len()..].copy_from_slice(&tail);
        }
        None => {
            let groups = parse_groups(inner)?;
            if groups.len() != 8 {
                return Err(bad());
            }
            segments.copy_from_slice(&groups);
        }
    }
    Ok(Ipv6Addr::from(segments))
}

// ============================================================================
// MAC
// ============================================================================

/// A 6-byte MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Create from raw bytes.
    pub fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Parse a colon-separated MAC address.
pub fn parse_mac(text: &str) -> Result<MacAddress, CodecError> {
    let bad = || CodecError::InvalidMac(text.to_string());
    let mut bytes = [0u8; 6];
    let mut count = 0;
    for part in text.split(':') {
        if count == 6 {
            return Err(bad());
        }
        let p = part.as_bytes();
        if p.len() != 2 {
            return Err(bad());
        }
        bytes[count] = hex_byte(p[0], p[1]).map_err(|_| bad())?;
        count += 1;
    }
    if count != 6 {
        return Err(bad());
    }
    Ok(MacAddress(bytes))
}

// ============================================================================
// Bluetooth
// ============================================================================

/// Bluetooth address type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BdAddressType {
    /// Public device address.
    #[default]
    Public,
    /// Random device address.
    Random,
}

/// A Bluetooth device address with its address type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BdAddress {
    /// The 6 address bytes, most significant first.
    pub bytes: [u8; 6],
    /// Public or random.
    pub kind: BdAddressType,
}

impl BdAddress {
    /// Create a public address from raw bytes.
    pub fn public(bytes: [u8; 6]) -> Self {
        BdAddress {
            bytes,
            kind: BdAddressType::Public,
        }
    }

    /// Create a random address from raw bytes.
    pub fn random(bytes: [u8; 6]) -> Self {
        BdAddress {
            bytes,
            kind: BdAddressType::Random,
        }
    }
}

impl std::fmt::Display for BdAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in &self.bytes {
            write!(f, "{:02X}", b)?;
        }
        match self.kind {
            BdAddressType::Public => write!(f, "p"),
            BdAddressType::Random => write!(f, "r"),
        }
    }
}

/// Parse a Bluetooth address: 12 hex digits plus an optional `p`/`r` type
/// suffix. A missing suffix means public.
pub fn parse_bd_address(text: &str) -> Result<BdAddress, CodecError> {
    let bad = || CodecError::InvalidBdAddress(text.to_string());
    let t = text.as_bytes();
    let (digits, kind) = match t.len() {
        12 => (t, BdAddressType::Public),
        13 => {
            let kind = match t[12] {
                b'p' | b'P' => BdAddressType::Public,
                b'r' | b'R' => BdAddressType::Random,
                _ => return Err(bad()),
            };
            (&t[..12], kind)
        }
        _ => return Err(bad()),
    };
    let mut bytes = [0u8; 6];
    for (i, pair) in digits.chunks_exact(2).enumerate() {
        bytes[i] = hex_byte(pair[0], pair[1]).map_err(|_| bad())?;
    }
    Ok(BdAddress { bytes, kind })
}
