//! Response parameter parsing.
//!
//! Parsing is destructive and zero-copy: the caller hands over a mutable
//! byte buffer holding the parameter text, the tokenizer splits it at
//! top-level commas, and decoders that need to rewrite bytes (unescaping,
//! hex decoding) do so in place, returning sub-slices of the same buffer.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::address::{
    hex_digit, parse_bd_address, parse_ipv4, parse_ipv6, parse_mac, BdAddress, MacAddress,
};
use crate::error::{CodecError, ParseFailure};

// ============================================================================
// Tokenizer
// ============================================================================

/// Splits a parameter line at top-level commas.
///
/// A comma is top-level when it is not inside a double-quoted span, not
/// inside a bracketed `[...]` list, and not preceded by an odd run of
/// backslash escapes. Tokenizing fails if the text ends inside a quoted span
/// or with a dangling escape.
pub struct Tokenizer<'a> {
    rest: Option<&'a mut [u8]>,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over a mutable parameter line.
    pub fn new(line: &'a mut [u8]) -> Self {
        Tokenizer { rest: Some(line) }
    }

    /// Return the next token, or `Ok(None)` when the line is exhausted.
    ///
    /// An empty leading parameter (comma at position 0) is valid and yields
    /// an empty token, as does a trailing comma.
    pub fn next_token(&mut self) -> Result<Option<&'a mut [u8]>, CodecError> {
        let rest = match self.rest.take() {
            Some(rest) => rest,
            None => return Ok(None),
        };

        let mut in_quote = false;
        let mut escaped = false;
        let mut bracket_depth = 0usize;
        let mut split_at = None;
        for (i, &b) in rest.iter().enumerate() {
            if escaped {
                escaped = false;
                continue;
            }
            match b {
                b'\\' => escaped = true,
                b'"' => in_quote = !in_quote,
                b'[' if !in_quote => bracket_depth += 1,
                b']' if !in_quote && bracket_depth > 0 => bracket_depth -= 1,
                b',' if !in_quote && bracket_depth == 0 => {
                    split_at = Some(i);
                    break;
                }
                _ => {}
            }
        }

        match split_at {
            Some(i) => {
                let (token, tail): (&'a mut [u8], &'a mut [u8]) = rest.split_at_mut(i);
                self.rest = Some(&mut tail[1..]);
                Ok(Some(token))
            }
            None => {
                if in_quote {
                    return Err(CodecError::UnterminatedQuote);
                }
                if escaped {
                    return Err(CodecError::DanglingEscape);
                }
                Ok(Some(rest))
            }
        }
    }
}

// ============================================================================
// Per-token decoders
// ============================================================================

/// Selects how a received token is decoded, aligned with successive tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Strict signed decimal integer.
    Int,
    /// String; a leading quote selects unquote + escape expansion.
    String,
    /// Hex digit pairs decoded to bytes in place.
    HexBytes,
    /// IPv4 address.
    Ipv4,
    /// IPv6 address (accepts `::` shorthand).
    Ipv6,
    /// MAC address.
    Mac,
    /// Bluetooth device address.
    Bd,
    /// `[a,b,c]` list of 16-bit integers.
    IntList,
    /// Consume and discard one token.
    Skip,
}

/// A decoded parameter value. String and hex values borrow from the parsed
/// line buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue<'a> {
    /// Decoded integer.
    Int(i64),
    /// Decoded (unquoted, unescaped) string.
    String(&'a str),
    /// Decoded byte buffer.
    HexBytes(&'a [u8]),
    /// Decoded IPv4 address.
    Ipv4(Ipv4Addr),
    /// Decoded IPv6 address.
    Ipv6(Ipv6Addr),
    /// Decoded MAC address.
    Mac(MacAddress),
    /// Decoded Bluetooth address.
    Bd(BdAddress),
    /// Decoded integer list.
    IntList(Vec<u16>),
}

/// Strict decimal integer: optional leading `-`, then digits only.
fn decode_int(token: &[u8]) -> Result<i64, CodecError> {
    let bad = || CodecError::InvalidInt(String::from_utf8_lossy(token).into_owned());
    let digits = match token.split_first() {
        Some((b'-', rest)) => rest,
        _ => token,
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(bad());
    }
    // Validated above, so from_utf8 cannot fail; parse still catches overflow.
    std::str::from_utf8(token)
        .map_err(|_| bad())?
        .parse::<i64>()
        .map_err(|_| bad())
}

/// If the token starts with a quote, strip the surrounding quotes and expand
/// escape sequences in place, shrinking the token. Bare tokens pass through
/// unchanged.
fn unquote_in_place(token: &mut [u8]) -> Result<&mut [u8], CodecError> {
    if token.first() != Some(&b'"') {
        return Ok(token);
    }
    if token.len() < 2 || token[token.len() - 1] != b'"' {
        return Err(CodecError::UnterminatedQuote);
    }
    let inner_len = token.len() - 1;
    let (_, tail) = token.split_at_mut(1);
    let (inner, _) = tail.split_at_mut(inner_len - 1);

    let mut write = 0;
    let mut read = 0;
    while read < inner.len() {
        let b = inner[read];
        read += 1;
        if b != b'\\' {
            inner[write] = b;
            write += 1;
            continue;
        }
        if read >= inner.len() {
            return Err(CodecError::DanglingEscape);
        }
        let esc = inner[read];
        read += 1;
        let expanded = match esc {
            b'"' => b'"',
            b'\\' => b'\\',
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'b' => 0x08,
            b'0' => 0x00,
            b'x' => {
                if read + 2 > inner.len() {
                    return Err(CodecError::DanglingEscape);
                }
                let value = (hex_digit(inner[read])? << 4) | hex_digit(inner[read + 1])?;
                read += 2;
                value
            }
            other => return Err(CodecError::InvalidEscape(other as char)),
        };
        inner[write] = expanded;
        write += 1;
    }
    Ok(&mut inner[..write])
}

/// Decode hex digit pairs to bytes in place. Odd length is an error.
fn decode_hex_in_place(token: &mut [u8]) -> Result<&[u8], CodecError> {
    if token.len() % 2 != 0 {
        return Err(CodecError::OddHexLength);
    }
    let out_len = token.len() / 2;
    for i in 0..out_len {
        let value = (hex_digit(token[2 * i])? << 4) | hex_digit(token[2 * i + 1])?;
        token[i] = value;
    }
    Ok(&token[..out_len])
}

/// Parse a `[a,b,c]` list of 16-bit integers. `[]` yields an empty list.
fn decode_int_list(token: &[u8]) -> Result<Vec<u16>, CodecError> {
    let bad = || CodecError::InvalidIntList(String::from_utf8_lossy(token).into_owned());
    let inner = token
        .strip_prefix(b"[")
        .and_then(|t| t.strip_suffix(b"]"))
        .ok_or_else(bad)?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(|&b| b == b',')
        .map(|part| {
            if part.is_empty() || !part.iter().all(u8::is_ascii_digit) {
                return Err(bad());
            }
            std::str::from_utf8(part)
                .map_err(|_| bad())?
                .parse::<u16>()
                .map_err(|_| bad())
        })
        .collect()
}

fn token_str<'t>(token: &'t [u8], bad: impl Fn() -> CodecError) -> Result<&'t str, CodecError> {
    std::str::from_utf8(token).map_err(|_| bad())
}

fn decode_token<'a>(
    token: &'a mut [u8],
    kind: ParamKind,
) -> Result<Option<ParamValue<'a>>, CodecError> {
    let value = match kind {
        ParamKind::Int => ParamValue::Int(decode_int(token)?),
        ParamKind::String => {
            let unquoted = unquote_in_place(token)?;
            let text = std::str::from_utf8(unquoted).map_err(|_| CodecError::InvalidUtf8)?;
            ParamValue::String(text)
        }
        ParamKind::HexBytes => ParamValue::HexBytes(decode_hex_in_place(token)?),
        ParamKind::Ipv4 => {
            let text = token_str(token, || {
                CodecError::InvalidIpv4(String::from_utf8_lossy(token).into_owned())
            })?;
            ParamValue::Ipv4(parse_ipv4(text)?)
        }
        ParamKind::Ipv6 => {
            let text = token_str(token, || {
                CodecError::InvalidIpv6(String::from_utf8_lossy(token).into_owned())
            })?;
            ParamValue::Ipv6(parse_ipv6(text)?)
        }
        ParamKind::Mac => {
            let text = token_str(token, || {
                CodecError::InvalidMac(String::from_utf8_lossy(token).into_owned())
            })?;
            ParamValue::Mac(parse_mac(text)?)
        }
        ParamKind::Bd => {
            let text = token_str(token, || {
                CodecError::InvalidBdAddress(String::from_utf8_lossy(token).into_owned())
            })?;
            ParamValue::Bd(parse_bd_address(text)?)
        }
        ParamKind::IntList => ParamValue::IntList(decode_int_list(token)?),
        ParamKind::Skip => return Ok(None),
    };
    Ok(Some(value))
}

// ============================================================================
// Line parsing
// ============================================================================

/// Destructively parse a parameter line against a kind sequence.
///
/// Decoding stops early (with fewer values) when the line runs out of tokens
/// before the kinds run out. On a decode failure the returned
/// [`ParseFailure`] carries how many parameters were consumed successfully
/// before the failing one ([`ParamKind::Skip`] counts as consumed).
pub fn parse_params<'a>(
    line: &'a mut [u8],
    kinds: &[ParamKind],
) -> Result<Vec<ParamValue<'a>>, ParseFailure> {
    let mut tokenizer = Tokenizer::new(line);
    let mut values = Vec::new();
    let mut decoded = 0;
    for &kind in kinds {
        let token = match tokenizer.next_token() {
            Ok(Some(token)) => token,
            Ok(None) => break,
            Err(source) => return Err(ParseFailure { decoded, source }),
        };
        match decode_token(token, kind) {
            Ok(Some(value)) => values.push(value),
            Ok(None) => {}
            Err(source) => return Err(ParseFailure { decoded, source }),
        }
        decoded += 1;
    }
    Ok(values)
}
