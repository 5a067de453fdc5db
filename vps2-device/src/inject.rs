//! Injection text parsing
//!
//! The text surfaces accept byte values with the usual numeric-literal
//! prefixes: `0x` for hex, a leading `0` for octal, decimal otherwise.
//! Validation is all-or-nothing; nothing is queued unless the whole line
//! parses.

use crate::error::DeviceError;

fn parse_token(token: &str) -> Result<u64, DeviceError> {
    let (digits, radix) = if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        (hex, 16)
    } else if token.len() > 1 && token.starts_with('0') {
        (&token[1..], 8)
    } else {
        (token, 10)
    };
    u64::from_str_radix(digits, radix).map_err(|_| DeviceError::InvalidToken {
        token: token.to_string(),
    })
}

fn parse_byte(token: &str) -> Result<u8, DeviceError> {
    let value = parse_token(token)?;
    u8::try_from(value).map_err(|_| DeviceError::ByteValue { value })
}

/// Parses a keyboard injection line: exactly one byte value.
pub(crate) fn parse_scancode(text: &str) -> Result<u8, DeviceError> {
    let mut tokens = text.split_whitespace();
    let first = tokens.next().ok_or(DeviceError::TokenCount { count: 0 })?;
    let extra = tokens.count();
    if extra != 0 {
        return Err(DeviceError::TokenCount { count: 1 + extra });
    }
    parse_byte(first)
}

/// Parses a pointer injection line: 3 or 4 whitespace-separated byte values.
pub(crate) fn parse_packet(text: &str) -> Result<Vec<u8>, DeviceError> {
    let mut bytes = Vec::with_capacity(4);
    for token in text.split_whitespace() {
        bytes.push(parse_byte(token)?);
    }
    if bytes.len() != 3 && bytes.len() != 4 {
        return Err(DeviceError::PacketLength { count: bytes.len() });
    }
    Ok(bytes)
}
