//! Semantic tags.
//!
//! A tag is a 16-bit discriminator placed before an item to give it out-of-band meaning, such
//! as "this integer is a reference" or "this tuple is an output string pointer". Tags always use
//! the two-byte form: they come from a small closed set and are matched by value, so a fixed
//! width keeps them cheap to scan for.

use crate::{
    int,
    item::{Major, TWO_BYTES},
    Error,
};
use bytes::{Buf, BufMut};
use std::any::type_name;

/// Encoded size of a semantic tag.
pub const SIZE: usize = 3;

/// Identifiers of the semantic tags understood by the RPC layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SemanticTag {
    /// An object reference.
    Reference = 40,
    /// A reference to a handler's context pointer.
    ContextPtrReference = 41,
    /// A reference to an asynchronous handler.
    AsyncHandlerReference = 42,
    /// `(size, pointer)` of an input string.
    InStringPointer = 43,
    /// `(size, pointer)` of an output string.
    OutStringPointer = 44,
    /// `(size, pointer)` of an input byte string.
    InByteStrPointer = 45,
    /// `(size, pointer)` of an output byte string.
    OutByteStrPointer = 46,
    /// Capacity of an output string.
    OutStringSize = 47,
    /// Capacity of an output byte string.
    OutByteStrSize = 48,
    /// Identifier of a file stream carried alongside a call.
    FileStreamId = 49,
    /// Flags qualifying a file stream.
    FileStreamFlag = 50,
    /// Number of bytes requested from a file stream.
    FileStreamRequestSize = 51,
    /// Content returned for an output string.
    OutStringResponse = 52,
    /// Content returned for an output byte string.
    OutByteStrResponse = 53,
}

impl SemanticTag {
    /// Returns the 16-bit identifier of this tag.
    #[inline]
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Returns true if this tag marks a reference of any kind.
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            Self::Reference | Self::ContextPtrReference | Self::AsyncHandlerReference
        )
    }

    /// Returns true if this tag prefixes a `(size, pointer)` tuple.
    pub const fn is_pointer_tuple(self) -> bool {
        matches!(
            self,
            Self::InStringPointer
                | Self::OutStringPointer
                | Self::InByteStrPointer
                | Self::OutByteStrPointer
        )
    }

    /// Returns true if this tag carries file stream metadata.
    pub const fn is_file_stream(self) -> bool {
        matches!(
            self,
            Self::FileStreamId | Self::FileStreamFlag | Self::FileStreamRequestSize
        )
    }
}

impl TryFrom<u16> for SemanticTag {
    type Error = Error;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        let tag = match id {
            40 => Self::Reference,
            41 => Self::ContextPtrReference,
            42 => Self::AsyncHandlerReference,
            43 => Self::InStringPointer,
            44 => Self::OutStringPointer,
            45 => Self::InByteStrPointer,
            46 => Self::OutByteStrPointer,
            47 => Self::OutStringSize,
            48 => Self::OutByteStrSize,
            49 => Self::FileStreamId,
            50 => Self::FileStreamFlag,
            51 => Self::FileStreamRequestSize,
            52 => Self::OutStringResponse,
            53 => Self::OutByteStrResponse,
            _ => return Err(Error::UnknownTag(id)),
        };
        Ok(tag)
    }
}

impl From<SemanticTag> for u16 {
    fn from(tag: SemanticTag) -> Self {
        tag.id()
    }
}

/// Writes a semantic tag in its fixed two-byte form.
#[inline]
pub fn write(id: u16, buf: &mut impl BufMut) {
    buf.put_u8(Major::SemanticTag.header(TWO_BYTES));
    buf.put_u16(id);
}

/// Reads a semantic tag identifier.
///
/// Any width is accepted on input, but the identifier must fit in 16 bits.
pub fn read(buf: &mut impl Buf) -> Result<u16, Error> {
    let id = int::read(buf, Major::SemanticTag)?;
    u16::try_from(id).map_err(|_| Error::OutOfRange {
        value: id as i128,
        target: type_name::<u16>(),
    })
}

/// Reads a semantic tag and checks that it equals `expected`.
pub fn expect(buf: &mut impl Buf, expected: u16) -> Result<(), Error> {
    let found = read(buf)?;
    if found != expected {
        return Err(Error::UnexpectedTag { expected, found });
    }
    Ok(())
}
