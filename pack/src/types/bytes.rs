//! Codec implementations for text and byte strings.
//!
//! A `String` is written as a text string and a [`Bytes`] as a byte string. Both are written in
//! full: embedded NUL bytes are payload, not terminators. Decoding bounds the length with a
//! [`RangeCfg`].

use crate::{string, util::at_least, EncodeSize, Error, RangeCfg, Read, Write};
use bytes::{Buf, BufMut, Bytes};

impl Write for String {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        string::write_str_header(self.len(), buf);
        buf.put_slice(self.as_bytes());
    }
}

impl EncodeSize for String {
    #[inline]
    fn encode_size(&self) -> usize {
        string::size(self.len())
    }
}

impl Read for String {
    type Cfg = RangeCfg<usize>;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, range: &Self::Cfg) -> Result<Self, Error> {
        let len = range.check(string::read_str_header(buf)?)?;
        at_least(&*buf, len)?;
        let mut data = vec![0; len];
        buf.copy_to_slice(&mut data);
        String::from_utf8(data).map_err(|_| Error::InvalidUtf8)
    }
}

impl Write for Bytes {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        string::write_byte_str(self, buf);
    }
}

impl EncodeSize for Bytes {
    #[inline]
    fn encode_size(&self) -> usize {
        string::size(self.len())
    }
}

impl Read for Bytes {
    type Cfg = RangeCfg<usize>;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, range: &Self::Cfg) -> Result<Self, Error> {
        let len = range.check(string::read_byte_str_header(buf)?)?;
        at_least(&*buf, len)?;
        Ok(buf.copy_to_bytes(len))
    }
}
