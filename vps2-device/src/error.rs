//! Device front-end error types

use thiserror::Error;

/// Errors from injection and control operations.
///
/// Every variant is rejected synchronously, before any device state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Control value outside its permitted range
    #[error("{name} must be {min}-{max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Injection token that does not parse as a number
    #[error("Invalid byte token {token:?}")]
    InvalidToken { token: String },

    /// Injection value that does not fit in a byte
    #[error("Invalid byte value 0x{value:X} (must be 0-255)")]
    ByteValue { value: u64 },

    /// Packet injection with a byte count that is neither 3 nor 4
    #[error("Expected 3 or 4 bytes, got {count}")]
    PacketLength { count: usize },

    /// Scan-code injection with anything but exactly one token
    #[error("Expected a single scan code, got {count} tokens")]
    TokenCount { count: usize },
}
