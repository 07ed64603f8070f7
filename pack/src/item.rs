//! Item headers and type introspection.
//!
//! Every item starts with a single header byte: the top 3 bits select the [Major] type and the
//! bottom 5 bits (the "additional" field) carry either a literal value below 24, a marker that
//! selects how many big-endian bytes follow, or a primitive sub-code.
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! +-----------+-------------------+
//! |   major   |    additional     |
//! +-----------+-------------------+
//! ```

use crate::Error;

/// Largest value that fits directly in the additional field.
pub const MAX_TINY: u8 = 23;

/// Additional field: one byte follows.
pub const ONE_BYTE: u8 = 24;

/// Additional field: two bytes follow.
pub const TWO_BYTES: u8 = 25;

/// Additional field: four bytes follow.
pub const FOUR_BYTES: u8 = 26;

/// Additional field: eight bytes follow.
pub const EIGHT_BYTES: u8 = 27;

/// Additional field: indefinite length (arrays only).
pub const INDEFINITE: u8 = 31;

/// Primitive sub-code for `false`.
pub const FALSE: u8 = 20;

/// Primitive sub-code for `true`.
pub const TRUE: u8 = 21;

/// Primitive sub-code for an IEEE-754 double (eight bytes follow).
pub const DOUBLE: u8 = 27;

/// Primitive sub-code for the end of an indefinite-length array.
pub const BREAK: u8 = 31;

const MAJOR_SHIFT: u8 = 5;
const ADDITIONAL_MASK: u8 = 0x1F;

/// The major type of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Major {
    PosInteger = 0,
    NegInteger = 1,
    ByteString = 2,
    TextString = 3,
    ItemArray = 4,
    SemanticTag = 6,
    Primitive = 7,
}

impl Major {
    /// Decodes the major type from the top 3 bits of a header byte.
    ///
    /// Returns `None` for major 5 (maps), which this format never uses.
    #[inline]
    pub fn from_header(byte: u8) -> Option<Self> {
        match byte >> MAJOR_SHIFT {
            0 => Some(Self::PosInteger),
            1 => Some(Self::NegInteger),
            2 => Some(Self::ByteString),
            3 => Some(Self::TextString),
            4 => Some(Self::ItemArray),
            6 => Some(Self::SemanticTag),
            7 => Some(Self::Primitive),
            _ => None,
        }
    }

    /// Combines this major type with an additional field into a header byte.
    #[inline]
    pub const fn header(self, additional: u8) -> u8 {
        ((self as u8) << MAJOR_SHIFT) | (additional & ADDITIONAL_MASK)
    }
}

/// Returns the additional field of a header byte.
#[inline]
pub const fn additional(byte: u8) -> u8 {
    byte & ADDITIONAL_MASK
}

/// Returns the number of bytes that follow a header with the given additional field.
///
/// Values below 24 are literal and have no extra bytes. Reserved values (28..=31) yield
/// `None`.
#[inline]
pub const fn extra_bytes(additional: u8) -> Option<usize> {
    match additional {
        0..=MAX_TINY => Some(0),
        ONE_BYTE => Some(1),
        TWO_BYTES => Some(2),
        FOUR_BYTES => Some(4),
        EIGHT_BYTES => Some(8),
        _ => None,
    }
}

/// Trait for values with a bounded encoded size.
///
/// Integers are minimally encoded, so their size depends on the value. `MAX_SIZE` is the size of
/// the widest form, which callers can use to reserve space before packing.
pub trait MaxSize {
    /// The largest number of bytes an encoding of this type can occupy.
    const MAX_SIZE: usize;
}

macro_rules! impl_max_size {
    ($($type:ty => $size:expr),* $(,)?) => {
        $(
            impl MaxSize for $type {
                const MAX_SIZE: usize = $size;
            }
        )*
    };
}

impl_max_size!(
    u8 => 2, u16 => 3, u32 => 5, u64 => 9, usize => 9,
    i8 => 2, i16 => 3, i32 => 5, i64 => 9,
    bool => 1, f64 => 9,
);

/// Largest encoded semantic tag.
pub const SEMANTIC_TAG_MAX_SIZE: usize = 3;

/// Largest encoded array, text-string, or byte-string header.
pub const HEADER_MAX_SIZE: usize = 9;

/// Encoded size of an indefinite-length array header.
pub const INDEF_ARRAY_HEADER_MAX_SIZE: usize = 1;

/// Encoded size of the end-of-array marker.
pub const INDEF_END_MAX_SIZE: usize = 1;

/// Largest encoded `(size, pointer)` tuple, excluding its semantic tag.
pub const SIZE_POINTER_TUPLE_MAX_SIZE: usize = 1 + usize::MAX_SIZE + u64::MAX_SIZE;

/// The category of the item at a buffer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    PosInteger,
    NegInteger,
    ByteString,
    TextString,
    ItemArray,
    SemanticTag,
    Boolean,
    Double,
    IndefEnd,
    Invalid,
}

/// Classifies the item starting at `buf[0]` without consuming it.
///
/// Returns the category together with the number of header bytes that follow the first byte.
/// The count is `None` when it is not known from the header alone (an indefinite-length array)
/// or when the item is invalid.
pub fn get_type(buf: &[u8]) -> (ItemType, Option<usize>) {
    let Some(&byte) = buf.first() else {
        return (ItemType::Invalid, None);
    };
    let additional = additional(byte);
    let Some(major) = Major::from_header(byte) else {
        return (ItemType::Invalid, None);
    };
    let item_type = match major {
        Major::PosInteger => ItemType::PosInteger,
        Major::NegInteger => ItemType::NegInteger,
        Major::ByteString => ItemType::ByteString,
        Major::TextString => ItemType::TextString,
        Major::SemanticTag => ItemType::SemanticTag,
        Major::ItemArray if additional == INDEFINITE => return (ItemType::ItemArray, None),
        Major::ItemArray => ItemType::ItemArray,
        Major::Primitive => {
            return match additional {
                FALSE | TRUE => (ItemType::Boolean, Some(0)),
                DOUBLE => (ItemType::Double, Some(8)),
                BREAK => (ItemType::IndefEnd, Some(0)),
                _ => (ItemType::Invalid, None),
            };
        }
    };
    match extra_bytes(additional) {
        Some(extra) => (item_type, Some(extra)),
        None => (ItemType::Invalid, None),
    }
}

/// Reads the header byte at the front of `buf` and checks its major type.
///
/// Does not consume anything.
#[inline]
pub(crate) fn peek_major(buf: &[u8], expected: Major) -> Result<u8, Error> {
    let &byte = buf.first().ok_or(Error::EndOfBuffer)?;
    if byte >> MAJOR_SHIFT != expected as u8 {
        return Err(Error::UnexpectedMajor {
            expected,
            found: byte >> MAJOR_SHIFT,
        });
    }
    Ok(byte)
}
