//! Error types for pack and unpack operations.

use crate::item::Major;
use thiserror::Error;

/// Error type for pack and unpack operations.
///
/// Every failure is final for the item being processed: the cursor that reported it has not
/// advanced, and the caller decides whether the surrounding message is still usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("buffer full: need {needed} bytes, {remaining} remaining")]
    BufferFull { needed: usize, remaining: usize },
    #[error("unexpected major type: expected {expected:?}, found {found}")]
    UnexpectedMajor { expected: Major, found: u8 },
    #[error("invalid additional field: {0}")]
    InvalidAdditional(u8),
    #[error("invalid bool: 0x{0:02x}")]
    InvalidBool(u8),
    #[error("invalid primitive: 0x{0:02x}")]
    InvalidPrimitive(u8),
    #[error("invalid on/off value: {0}")]
    InvalidOnOff(u64),
    #[error("value {value} out of range for {target}")]
    OutOfRange { value: i128, target: &'static str },
    #[error("length exceeded: {0} > {1}")]
    LengthExceeded(usize, usize), // found, max
    #[error("invalid length: {0}")]
    InvalidLength(usize),
    #[error("string not terminated within {0} bytes")]
    UnterminatedString(usize),
    #[error("invalid utf-8 in text string")]
    InvalidUtf8,
    #[error("unexpected semantic tag: expected {expected}, found {found}")]
    UnexpectedTag { expected: u16, found: u16 },
    #[error("unknown semantic tag: {0}")]
    UnknownTag(u16),
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
}
