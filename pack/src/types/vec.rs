//! Codec implementations for sequences.
//!
//! A `Vec<T>` is written as a fixed-count array. [Indefinite] writes the same elements as an
//! indefinite-length array closed by the break marker.

use crate::{array, primitive, EncodeSize, Error, RangeCfg, Read, Write};
use bytes::{Buf, BufMut};

/// Reads one element, failing if it consumed no input.
///
/// An element that occupies no bytes could otherwise repeat without bound on a hostile count or
/// a missing break marker.
#[inline]
fn read_element<T: Read>(buf: &mut impl Buf, cfg: &T::Cfg) -> Result<T, Error> {
    let remaining = buf.remaining();
    let item = T::read_cfg(buf, cfg)?;
    if buf.remaining() == remaining {
        return Err(Error::EndOfBuffer);
    }
    Ok(item)
}

impl<T: Write> Write for Vec<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        array::write_header(self.len(), buf);
        for item in self {
            item.write(buf);
        }
    }
}

impl<T: EncodeSize> EncodeSize for Vec<T> {
    #[inline]
    fn encode_size(&self) -> usize {
        array::header_size(self.len()) + self.iter().map(EncodeSize::encode_size).sum::<usize>()
    }
}

impl<T: Read> Read for Vec<T> {
    type Cfg = (RangeCfg<usize>, T::Cfg);

    #[inline]
    fn read_cfg(buf: &mut impl Buf, (range, cfg): &Self::Cfg) -> Result<Self, Error> {
        let len = range.check(array::read_header(buf, usize::MAX)?)?;

        // Every element occupies at least one byte
        let mut vec = Vec::with_capacity(len.min(buf.remaining()));
        for _ in 0..len {
            vec.push(read_element(buf, cfg)?);
        }
        Ok(vec)
    }
}

/// A sequence written as an indefinite-length array.
///
/// Useful when a producer streams elements whose number is not known when the header is
/// written; the decoder reads elements until it meets the break marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indefinite<T>(pub Vec<T>);

impl<T> From<Vec<T>> for Indefinite<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T: Write> Write for Indefinite<T> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        array::write_indef_header(buf);
        for item in &self.0 {
            item.write(buf);
        }
        array::write_end(buf);
    }
}

impl<T: EncodeSize> EncodeSize for Indefinite<T> {
    #[inline]
    fn encode_size(&self) -> usize {
        2 + self.0.iter().map(EncodeSize::encode_size).sum::<usize>()
    }
}

impl<T: Read> Read for Indefinite<T> {
    type Cfg = (RangeCfg<usize>, T::Cfg);

    fn read_cfg(buf: &mut impl Buf, (range, cfg): &Self::Cfg) -> Result<Self, Error> {
        array::read_indef_header(buf)?;
        let mut vec = Vec::new();
        while !primitive::is_break(&*buf) {
            if range.exceeded_by(vec.len() + 1) {
                return Err(Error::InvalidLength(vec.len() + 1));
            }
            vec.push(read_element(buf, cfg)?);
        }
        array::read_end(buf)?;
        range.check(vec.len())?;
        Ok(Self(vec))
    }
}
