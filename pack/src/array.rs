//! Fixed-count and indefinite-length array headers.
//!
//! A fixed-count array is a header carrying the element count followed by that many items. An
//! indefinite-length array opens with a single header byte and is closed by the break marker,
//! which lets a producer stream elements without knowing their number up front.

use crate::{
    int,
    item::{self, Major, INDEFINITE},
    primitive, Error,
};
use bytes::{Buf, BufMut};
use std::any::type_name;

const INDEF_ARRAY_BYTE: u8 = Major::ItemArray.header(INDEFINITE);

/// Returns the encoded size of an array header for `count` elements.
#[inline]
pub fn header_size(count: usize) -> usize {
    int::size(count as u64)
}

#[inline]
pub fn write_header(count: usize, buf: &mut impl BufMut) {
    int::write(Major::ItemArray, count as u64, buf);
}

/// Reads a fixed-count array header, failing if the count exceeds `max_count`.
pub fn read_header(buf: &mut impl Buf, max_count: usize) -> Result<usize, Error> {
    if buf.chunk().first() == Some(&INDEF_ARRAY_BYTE) {
        return Err(Error::InvalidAdditional(INDEFINITE));
    }
    let count = int::read(buf, Major::ItemArray)?;
    let count = usize::try_from(count).map_err(|_| Error::OutOfRange {
        value: count as i128,
        target: type_name::<usize>(),
    })?;
    if count > max_count {
        return Err(Error::LengthExceeded(count, max_count));
    }
    Ok(count)
}

#[inline]
pub fn write_indef_header(buf: &mut impl BufMut) {
    buf.put_u8(INDEF_ARRAY_BYTE);
}

pub fn read_indef_header(buf: &mut impl Buf) -> Result<(), Error> {
    let &byte = buf.chunk().first().ok_or(Error::EndOfBuffer)?;
    if byte != INDEF_ARRAY_BYTE {
        item::peek_major(&[byte], Major::ItemArray)?;
        return Err(Error::InvalidAdditional(item::additional(byte)));
    }
    buf.advance(1);
    Ok(())
}

/// Closes an indefinite-length array.
#[inline]
pub fn write_end(buf: &mut impl BufMut) {
    primitive::write_break(buf);
}

/// Consumes the marker closing an indefinite-length array.
#[inline]
pub fn read_end(buf: &mut impl Buf) -> Result<(), Error> {
    primitive::read_break(buf)
}
