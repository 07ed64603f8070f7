//! Minimal-width integer encoding and decoding.
//!
//! An integer is stored in the header of an item. Values below 24 live in the additional field
//! itself; larger values use the smallest of 1, 2, 4, or 8 big-endian bytes that can hold them.
//!
//! Negative integers are stored as the magnitude `-1 - value` under [Major::NegInteger], so
//! every `i64` (including `i64::MIN`) maps onto a `u64` magnitude.
//!
//! The same header mechanics carry string lengths, array counts, and semantic tags.

use crate::{
    item::{self, Major, EIGHT_BYTES, FOUR_BYTES, MAX_TINY, ONE_BYTE, TWO_BYTES},
    util::at_least,
    Error,
};
use bytes::{Buf, BufMut};
use std::any::type_name;

/// Returns the number of bytes needed to encode an unsigned value in a header.
#[inline]
pub const fn size(value: u64) -> usize {
    if value <= MAX_TINY as u64 {
        1
    } else if value <= u8::MAX as u64 {
        2
    } else if value <= u16::MAX as u64 {
        3
    } else if value <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Returns the number of bytes needed to encode a signed value.
#[inline]
pub const fn size_signed(value: i64) -> usize {
    size(split_signed(value).1)
}

/// Encodes `value` under the given major type using the minimal width.
pub fn write(major: Major, value: u64, buf: &mut impl BufMut) {
    if value <= MAX_TINY as u64 {
        buf.put_u8(major.header(value as u8));
    } else if value <= u8::MAX as u64 {
        buf.put_u8(major.header(ONE_BYTE));
        buf.put_u8(value as u8);
    } else if value <= u16::MAX as u64 {
        buf.put_u8(major.header(TWO_BYTES));
        buf.put_u16(value as u16);
    } else if value <= u32::MAX as u64 {
        buf.put_u8(major.header(FOUR_BYTES));
        buf.put_u32(value as u32);
    } else {
        buf.put_u8(major.header(EIGHT_BYTES));
        buf.put_u64(value);
    }
}

/// Encodes a signed integer as a positive or negative integer item.
pub fn write_signed(value: i64, buf: &mut impl BufMut) {
    let (major, magnitude) = split_signed(value);
    write(major, magnitude, buf);
}

/// Decodes the value carried by a header of the expected major type.
///
/// Nothing is consumed if the major type does not match or the buffer is too short for the
/// declared width. Non-minimal encodings are accepted.
pub fn read(buf: &mut impl Buf, expected: Major) -> Result<u64, Error> {
    let header = item::peek_major(buf.chunk(), expected)?;
    read_argument(buf, header)
}

/// Decodes a positive or negative integer item into an `i64`.
pub fn read_signed(buf: &mut impl Buf) -> Result<i64, Error> {
    let &header = buf.chunk().first().ok_or(Error::EndOfBuffer)?;
    match Major::from_header(header) {
        Some(Major::PosInteger) => {
            let value = read_argument(buf, header)?;
            i64::try_from(value).map_err(|_| Error::OutOfRange {
                value: value as i128,
                target: type_name::<i64>(),
            })
        }
        Some(Major::NegInteger) => {
            let magnitude = read_argument(buf, header)?;
            let value = -1 - magnitude as i128;
            i64::try_from(value).map_err(|_| Error::OutOfRange {
                value,
                target: type_name::<i64>(),
            })
        }
        _ => Err(Error::UnexpectedMajor {
            expected: Major::PosInteger,
            found: header >> 5,
        }),
    }
}

/// Decodes an unsigned integer and narrows it to `T`.
pub fn read_uint<T: TryFrom<u64>>(buf: &mut impl Buf) -> Result<T, Error> {
    let value = read(buf, Major::PosInteger)?;
    T::try_from(value).map_err(|_| Error::OutOfRange {
        value: value as i128,
        target: type_name::<T>(),
    })
}

/// Decodes a signed integer and narrows it to `T`.
pub fn read_sint<T: TryFrom<i64>>(buf: &mut impl Buf) -> Result<T, Error> {
    let value = read_signed(buf)?;
    T::try_from(value).map_err(|_| Error::OutOfRange {
        value: value as i128,
        target: type_name::<T>(),
    })
}

/// Splits a signed value into its major type and magnitude.
#[inline]
const fn split_signed(value: i64) -> (Major, u64) {
    if value >= 0 {
        (Major::PosInteger, value as u64)
    } else {
        // Cannot overflow: -1 - i64::MIN == i64::MAX
        (Major::NegInteger, (-1 - value) as u64)
    }
}

/// Checks that the header and its extra bytes are all present.
#[inline]
fn at_least_argument(buf: &impl Buf, header: u8) -> Result<(), Error> {
    let additional = item::additional(header);
    let extra = item::extra_bytes(additional).ok_or(Error::InvalidAdditional(additional))?;
    at_least(buf, 1 + extra)
}

/// Consumes a header whose major type has already been checked and returns its argument.
fn read_argument(buf: &mut impl Buf, header: u8) -> Result<u64, Error> {
    at_least_argument(&*buf, header)?;
    buf.advance(1);
    let value = match item::additional(header) {
        ONE_BYTE => buf.get_u8() as u64,
        TWO_BYTES => buf.get_u16() as u64,
        FOUR_BYTES => buf.get_u32() as u64,
        EIGHT_BYTES => buf.get_u64(),
        tiny => tiny as u64,
    };
    Ok(value)
}
