//! Cursors for sequencing pack and unpack calls over a flat buffer.
//!
//! A [Packer] writes items into a caller-supplied slice and an [Unpacker] reads them back. Both
//! carry an offset into their slice and every method is atomic: if it fails, the offset is left
//! where it was. Composite methods (arrays, tuples) rewind to their starting offset when any
//! step fails.
//!
//! Pack methods check the space they need before writing anything, so a failed single-item pack
//! never touches the slice. A failed composite pack may leave bytes beyond the offset modified;
//! those bytes are not part of the output.
//!
//! # Example
//!
//! ```
//! use rpc_pack::{Packer, SemanticTag, Unpacker};
//!
//! let mut buf = [0u8; 64];
//! let mut packer = Packer::new(&mut buf);
//! packer.pack_u32(1_000_000).unwrap();
//! packer.pack_str("hi", 16).unwrap();
//! packer.pack_reference(7).unwrap();
//! let written = packer.into_written();
//! assert_eq!(&written[..5], &[0x1A, 0x00, 0x0F, 0x42, 0x40]);
//!
//! let mut unpacker = Unpacker::new(written);
//! assert_eq!(unpacker.unpack_u32().unwrap(), 1_000_000);
//! let mut out = [0u8; 16];
//! assert_eq!(unpacker.unpack_str_into(Some(&mut out[..]), 16).unwrap(), 2);
//! assert_eq!(&out[..3], b"hi\0");
//! assert_eq!(unpacker.unpack_reference().unwrap(), 7);
//! assert!(unpacker.is_empty());
//! ```

use crate::{
    array, int,
    item::{self, ItemType, Major},
    primitive, string, tag,
    util::{at_least, fits},
    EncodeSize, Error, OnOff, Read, RangeCfg, SemanticTag, Write,
};
use bytes::BufMut;
use paste::paste;
use tracing::{debug, trace};

/// Encoded size of a tag followed by a two-element array header.
const TUPLE_PREFIX_SIZE: usize = tag::SIZE + 1;

macro_rules! impl_pack_scalar {
    ($($type:ty),*) => {
        paste! {
            $(
                #[doc = concat!("Packs a `", stringify!($type), "`.")]
                pub fn [<pack_ $type>](&mut self, value: $type) -> Result<(), Error> {
                    self.pack(&value)
                }
            )*
        }
    };
}

macro_rules! impl_unpack_scalar {
    ($($type:ty),*) => {
        paste! {
            $(
                #[doc = concat!("Unpacks a `", stringify!($type), "`.")]
                pub fn [<unpack_ $type>](&mut self) -> Result<$type, Error> {
                    self.read()
                }
            )*
        }
    };
}

/// Writes items into a fixed-capacity buffer.
pub struct Packer<'a> {
    buf: &'a mut [u8],
    offset: usize,
}

impl<'a> Packer<'a> {
    /// Creates a packer that writes from the start of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Returns the number of bytes written so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of bytes that can still be written.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Returns the bytes written so far.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.offset]
    }

    /// Consumes the packer, returning the bytes written.
    pub fn into_written(self) -> &'a [u8] {
        let Self { buf, offset } = self;
        let buf: &'a [u8] = buf;
        &buf[..offset]
    }

    /// Writes exactly `len` bytes with `f`, failing without writing if they do not fit.
    fn put(&mut self, len: usize, f: impl FnOnce(&mut &mut [u8])) -> Result<(), Error> {
        if let Err(err) = fits(self.remaining(), len) {
            debug!(offset = self.offset, ?err, "pack failed");
            return Err(err);
        }
        let mut window = &mut self.buf[self.offset..self.offset + len];
        f(&mut window);
        debug_assert!(window.is_empty(), "write did not fill the reserved space");
        self.offset += len;
        Ok(())
    }

    /// Runs a multi-step pack, restoring the offset if any step fails.
    fn atomic(&mut self, f: impl FnOnce(&mut Self) -> Result<(), Error>) -> Result<(), Error> {
        let start = self.offset;
        let result = f(self);
        if let Err(err) = &result {
            debug!(offset = start, ?err, "composite pack failed");
            self.offset = start;
        }
        result
    }

    /// Packs any value implementing the codec traits.
    pub fn pack<T: Write + EncodeSize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.put(value.encode_size(), |buf| value.write(buf))
    }

    /// Packs `value` as a minimal-width header of the given major type.
    pub fn pack_unsigned_integer(&mut self, value: u64, major: Major) -> Result<(), Error> {
        self.put(int::size(value), |buf| int::write(major, value, buf))
    }

    /// Packs a signed integer as a positive- or negative-integer item.
    pub fn pack_signed_integer(&mut self, value: i64) -> Result<(), Error> {
        self.put(int::size_signed(value), |buf| int::write_signed(value, buf))
    }

    impl_pack_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, bool);

    pub fn pack_double(&mut self, value: f64) -> Result<(), Error> {
        self.pack(&value)
    }

    /// Packs a size as an unsigned integer.
    pub fn pack_size(&mut self, value: usize) -> Result<(), Error> {
        self.pack(&value)
    }

    /// Packs a single character byte.
    pub fn pack_char(&mut self, value: u8) -> Result<(), Error> {
        self.pack(&value)
    }

    /// Packs a result code. Negative values are errors.
    pub fn pack_result(&mut self, value: i32) -> Result<(), Error> {
        self.pack(&value)
    }

    pub fn pack_on_off(&mut self, value: OnOff) -> Result<(), Error> {
        self.pack(&value)
    }

    /// Packs an object reference, tagged [SemanticTag::Reference].
    pub fn pack_reference(&mut self, reference: u64) -> Result<(), Error> {
        self.pack_tagged_reference(SemanticTag::Reference, reference)
    }

    /// Packs a reference under a specific tag, such as a context pointer or async handler.
    pub fn pack_tagged_reference(&mut self, tag: SemanticTag, reference: u64) -> Result<(), Error> {
        let len = tag::SIZE + int::size(reference);
        self.put(len, |buf| {
            tag::write(tag.id(), buf);
            int::write(Major::PosInteger, reference, buf);
        })
    }

    /// Packs a text string of at most `max_len` bytes.
    ///
    /// The string ends at its first NUL, if any. Fails if that end is beyond `max_len`.
    pub fn pack_str(&mut self, s: &str, max_len: usize) -> Result<(), Error> {
        let len = match string::bounded_len(s.as_bytes(), max_len) {
            Ok(len) => len,
            Err(err) => {
                debug!(offset = self.offset, ?err, "pack failed");
                return Err(err);
            }
        };
        self.put(string::size(len), |buf| {
            string::write_str_header(len, buf);
            buf.put_slice(&s.as_bytes()[..len]);
        })
    }

    /// Packs only the header of a text string; the caller follows it with `len` payload bytes.
    pub fn pack_str_header(&mut self, len: usize) -> Result<(), Error> {
        self.put(int::size(len as u64), |buf| string::write_str_header(len, buf))
    }

    pub fn pack_byte_str(&mut self, data: &[u8]) -> Result<(), Error> {
        self.put(string::size(data.len()), |buf| string::write_byte_str(data, buf))
    }

    /// Packs only the header of a byte string; the caller follows it with `len` payload bytes.
    pub fn pack_byte_str_header(&mut self, len: usize) -> Result<(), Error> {
        self.put(int::size(len as u64), |buf| {
            string::write_byte_str_header(len, buf)
        })
    }

    /// Copies raw bytes, such as a payload following a header packed on its own.
    pub fn pack_raw(&mut self, data: &[u8]) -> Result<(), Error> {
        self.put(data.len(), |buf| buf.put_slice(data))
    }

    pub fn pack_array_header(&mut self, count: usize) -> Result<(), Error> {
        self.put(array::header_size(count), |buf| array::write_header(count, buf))
    }

    /// Opens an indefinite-length array. Close it with [Self::pack_end_of_indef_array].
    pub fn pack_indef_array_header(&mut self) -> Result<(), Error> {
        self.put(item::INDEF_ARRAY_HEADER_MAX_SIZE, |buf| array::write_indef_header(buf))?;
        trace!(offset = self.offset, "opened indefinite array");
        Ok(())
    }

    pub fn pack_end_of_indef_array(&mut self) -> Result<(), Error> {
        self.put(item::INDEF_END_MAX_SIZE, |buf| array::write_end(buf))?;
        trace!(offset = self.offset, "closed indefinite array");
        Ok(())
    }

    /// Packs a fixed-count array, calling `pack_elem` for each element.
    ///
    /// Fails without writing if `items` holds more than `max_count` elements.
    pub fn pack_array<T>(
        &mut self,
        items: &[T],
        max_count: usize,
        mut pack_elem: impl FnMut(&mut Self, &T) -> Result<(), Error>,
    ) -> Result<(), Error> {
        if items.len() > max_count {
            debug!(offset = self.offset, count = items.len(), max_count, "array too long");
            return Err(Error::LengthExceeded(items.len(), max_count));
        }
        self.atomic(|packer| {
            packer.pack_array_header(items.len())?;
            for item in items {
                pack_elem(packer, item)?;
            }
            Ok(())
        })
    }

    /// Packs a semantic tag, always in its two-byte form.
    pub fn pack_semantic_tag(&mut self, id: u16) -> Result<(), Error> {
        self.put(tag::SIZE, |buf| tag::write(id, buf))
    }

    /// Packs a tagged `(size, pointer)` tuple describing a caller buffer.
    pub fn pack_tagged_size_pointer_tuple(
        &mut self,
        tag: SemanticTag,
        size: usize,
        pointer: u64,
    ) -> Result<(), Error> {
        self.pack_tuple(tag.id(), size as u64, pointer)
    }

    /// Packs a tagged tuple of two 32-bit members.
    pub fn pack_u32_tuple(&mut self, tag: u16, size: u32, value: u32) -> Result<(), Error> {
        self.pack_tuple(tag, size as u64, value as u64)
    }

    /// Packs a tagged tuple of two 64-bit members.
    pub fn pack_u64_tuple(&mut self, tag: u16, size: u64, value: u64) -> Result<(), Error> {
        self.pack_tuple(tag, size, value)
    }

    fn pack_tuple(&mut self, id: u16, first: u64, second: u64) -> Result<(), Error> {
        let len = TUPLE_PREFIX_SIZE + int::size(first) + int::size(second);
        self.put(len, |buf| {
            tag::write(id, buf);
            array::write_header(2, buf);
            int::write(Major::PosInteger, first, buf);
            int::write(Major::PosInteger, second, buf);
        })
    }
}

/// Reads items from a buffer.
pub struct Unpacker<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Unpacker<'a> {
    /// Creates an unpacker that reads from the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Returns the number of bytes consumed so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Returns true if every byte has been consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Classifies the next item without consuming it.
    pub fn peek_type(&self) -> (ItemType, Option<usize>) {
        item::get_type(&self.buf[self.offset..])
    }

    /// Runs `f` over the unread bytes and commits what it consumed only if it succeeds.
    fn get<T>(&mut self, f: impl FnOnce(&mut &'a [u8]) -> Result<T, Error>) -> Result<T, Error> {
        let mut window = &self.buf[self.offset..];
        match f(&mut window) {
            Ok(value) => {
                self.offset = self.buf.len() - window.len();
                Ok(value)
            }
            Err(err) => {
                debug!(offset = self.offset, ?err, "unpack failed");
                Err(err)
            }
        }
    }

    /// Runs a multi-step unpack, restoring the offset if any step fails.
    fn atomic<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        let start = self.offset;
        let result = f(self);
        if let Err(err) = &result {
            debug!(offset = start, ?err, "composite unpack failed");
            self.offset = start;
        }
        result
    }

    /// Unpacks any value implementing [Read] with the given configuration.
    pub fn unpack<T: Read>(&mut self, cfg: &T::Cfg) -> Result<T, Error> {
        self.get(|buf| T::read_cfg(buf, cfg))
    }

    /// Unpacks any value implementing [Read] that needs no configuration.
    pub fn read<T: Read<Cfg = ()>>(&mut self) -> Result<T, Error> {
        self.unpack(&())
    }

    /// Unpacks the argument of a header with the given major type.
    pub fn unpack_positive_integer(&mut self, major: Major) -> Result<u64, Error> {
        self.get(|buf| int::read(buf, major))
    }

    /// Unpacks a positive- or negative-integer item as an `i64`.
    pub fn unpack_integer(&mut self) -> Result<i64, Error> {
        self.get(int::read_signed)
    }

    impl_unpack_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, bool);

    pub fn unpack_double(&mut self) -> Result<f64, Error> {
        self.read()
    }

    /// Unpacks a size, failing if it does not fit in `usize`.
    pub fn unpack_size(&mut self) -> Result<usize, Error> {
        self.read()
    }

    pub fn unpack_char(&mut self) -> Result<u8, Error> {
        self.read()
    }

    pub fn unpack_result(&mut self) -> Result<i32, Error> {
        self.read()
    }

    pub fn unpack_on_off(&mut self) -> Result<OnOff, Error> {
        self.read()
    }

    /// Unpacks an object reference, which must be tagged [SemanticTag::Reference].
    pub fn unpack_reference(&mut self) -> Result<u64, Error> {
        self.get(|buf| {
            tag::expect(buf, SemanticTag::Reference.id())?;
            int::read(buf, Major::PosInteger)
        })
    }

    /// Unpacks a reference under any tag, returning the tag with the reference.
    pub fn unpack_tagged_reference(&mut self) -> Result<(u16, u64), Error> {
        self.get(|buf| {
            let id = tag::read(buf)?;
            Ok((id, int::read(buf, Major::PosInteger)?))
        })
    }

    /// Unpacks a text string into `out` and appends a NUL terminator.
    ///
    /// Returns the string length, excluding the terminator.
    pub fn unpack_str_into(
        &mut self,
        out: Option<&mut [u8]>,
        max_len: usize,
    ) -> Result<usize, Error> {
        self.get(|buf| string::read_str_into(buf, out, max_len))
    }

    /// Unpacks a text string of at most `max_len` bytes into an owned `String`.
    pub fn unpack_string(&mut self, max_len: usize) -> Result<String, Error> {
        self.get(|buf| string::read_string(buf, max_len))
    }

    /// Unpacks a text string of at most `max_len` bytes without copying it.
    pub fn unpack_str(&mut self, max_len: usize) -> Result<&'a str, Error> {
        self.get(|buf| {
            let len = string::read_str_header(buf)?;
            if len > max_len {
                return Err(Error::LengthExceeded(len, max_len));
            }
            let data = take(buf, len)?;
            core::str::from_utf8(data).map_err(|_| Error::InvalidUtf8)
        })
    }

    pub fn unpack_str_header(&mut self) -> Result<usize, Error> {
        self.get(string::read_str_header)
    }

    /// Unpacks a byte string into `out`, returning the number of bytes copied.
    pub fn unpack_byte_str_into(&mut self, out: Option<&mut [u8]>) -> Result<usize, Error> {
        self.get(|buf| string::read_byte_str_into(buf, out))
    }

    /// Unpacks a byte string of at most `max_len` bytes without copying it.
    pub fn unpack_byte_str(&mut self, max_len: usize) -> Result<&'a [u8], Error> {
        self.get(|buf| {
            let len = string::read_byte_str_header(buf)?;
            if len > max_len {
                return Err(Error::LengthExceeded(len, max_len));
            }
            take(buf, len)
        })
    }

    pub fn unpack_byte_str_header(&mut self) -> Result<usize, Error> {
        self.get(string::read_byte_str_header)
    }

    /// Consumes `len` raw bytes, such as a payload following a header unpacked on its own.
    pub fn unpack_raw(&mut self, len: usize) -> Result<&'a [u8], Error> {
        self.get(|buf| take(buf, len))
    }

    /// Unpacks a fixed-count array header, failing if the count exceeds `max_count`.
    pub fn unpack_array_header(&mut self, max_count: usize) -> Result<usize, Error> {
        self.get(|buf| array::read_header(buf, max_count))
    }

    pub fn unpack_indef_array_header(&mut self) -> Result<(), Error> {
        self.get(array::read_indef_header)?;
        trace!(offset = self.offset, "opened indefinite array");
        Ok(())
    }

    pub fn unpack_end_of_indef_array(&mut self) -> Result<(), Error> {
        self.get(array::read_end)?;
        trace!(offset = self.offset, "closed indefinite array");
        Ok(())
    }

    /// Returns true if the next item closes an indefinite-length array.
    pub fn is_end_of_indef_array(&self) -> bool {
        primitive::is_break(&&self.buf[self.offset..])
    }

    /// Unpacks a fixed-count array into `out`, calling `unpack_elem` for each element.
    ///
    /// Fails if the count exceeds `max_count` or the length of `out`. `out` may be `None` only
    /// when the array is empty. Returns the element count. On failure the offset is restored,
    /// but elements already unpacked into `out` are left there.
    pub fn unpack_array<T>(
        &mut self,
        out: Option<&mut [T]>,
        max_count: usize,
        mut unpack_elem: impl FnMut(&mut Self) -> Result<T, Error>,
    ) -> Result<usize, Error> {
        self.atomic(|unpacker| {
            let count = unpacker.unpack_array_header(max_count)?;
            let out = match out {
                Some(out) if count > out.len() => {
                    return Err(Error::LengthExceeded(count, out.len()))
                }
                Some(out) => out,
                None if count == 0 => return Ok(0),
                None => return Err(Error::LengthExceeded(count, 0)),
            };
            for slot in &mut out[..count] {
                *slot = unpack_elem(unpacker)?;
            }
            Ok(count)
        })
    }

    /// Unpacks a semantic tag identifier.
    pub fn unpack_semantic_tag(&mut self) -> Result<u16, Error> {
        self.get(tag::read)
    }

    /// Unpacks a semantic tag and checks that it is `expected`.
    pub fn expect_semantic_tag(&mut self, expected: SemanticTag) -> Result<(), Error> {
        self.get(|buf| tag::expect(buf, expected.id()))
    }

    /// Unpacks a tagged `(size, pointer)` tuple, returning the tag with both members.
    pub fn unpack_size_pointer_tuple(&mut self) -> Result<(u16, usize, u64), Error> {
        self.get(|buf| {
            let id = tag::read(buf)?;
            read_pair_header(buf)?;
            let size = int::read_uint(buf)?;
            let pointer = int::read(buf, Major::PosInteger)?;
            Ok((id, size, pointer))
        })
    }

    /// Unpacks a tagged tuple of two 32-bit members.
    pub fn unpack_u32_tuple(&mut self) -> Result<(u16, u32, u32), Error> {
        self.get(|buf| {
            let id = tag::read(buf)?;
            read_pair_header(buf)?;
            Ok((id, int::read_uint(buf)?, int::read_uint(buf)?))
        })
    }

    /// Unpacks a tagged tuple of two 64-bit members.
    pub fn unpack_u64_tuple(&mut self) -> Result<(u16, u64, u64), Error> {
        self.get(|buf| {
            let id = tag::read(buf)?;
            read_pair_header(buf)?;
            Ok((id, int::read_uint(buf)?, int::read_uint(buf)?))
        })
    }
}

/// Splits `len` bytes off the front of `buf`.
fn take<'a>(buf: &mut &'a [u8], len: usize) -> Result<&'a [u8], Error> {
    at_least(&*buf, len)?;
    let slice: &'a [u8] = *buf;
    let (data, rest) = slice.split_at(len);
    *buf = rest;
    Ok(data)
}

/// Reads the array header of a tagged tuple, which must hold exactly two members.
fn read_pair_header(buf: &mut &[u8]) -> Result<(), Error> {
    RangeCfg::exact(2).check(array::read_header(buf, usize::MAX)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_u32() {
        let mut buf = [0u8; 8];
        let mut packer = Packer::new(&mut buf);
        packer.pack_u32(1_000_000).unwrap();
        assert_eq!(packer.written(), &[0x1A, 0x00, 0x0F, 0x42, 0x40]);

        let mut unpacker = Unpacker::new(packer.into_written());
        assert_eq!(unpacker.unpack_u32(), Ok(1_000_000));
        assert_eq!(unpacker.offset(), 5);
    }

    #[test]
    fn test_scenario_negative() {
        let mut buf = [0u8; 8];
        let mut packer = Packer::new(&mut buf);
        packer.pack_signed_integer(-5).unwrap();
        assert_eq!(packer.written(), &[0x24]);

        let mut unpacker = Unpacker::new(packer.into_written());
        assert_eq!(unpacker.unpack_integer(), Ok(-5));
    }

    #[test]
    fn test_scenario_string() {
        let mut buf = [0u8; 8];
        let mut packer = Packer::new(&mut buf);
        packer.pack_str("hi", 2).unwrap();
        assert_eq!(packer.written(), &[0x62, 0x68, 0x69]);

        let mut unpacker = Unpacker::new(packer.into_written());
        let mut out = [0xAAu8; 16];
        assert_eq!(unpacker.unpack_str_into(Some(&mut out[..]), 16), Ok(2));
        assert_eq!(&out[..3], b"hi\0");
        assert_eq!(unpacker.offset(), 3);
    }

    #[test]
    fn test_buffer_full_leaves_offset() {
        let mut buf = [0u8; 4];
        let mut packer = Packer::new(&mut buf);
        packer.pack_u8(1).unwrap();
        assert_eq!(
            packer.pack_u32(1_000_000),
            Err(Error::BufferFull {
                needed: 5,
                remaining: 3
            })
        );
        assert_eq!(packer.offset(), 1);
        assert_eq!(packer.pack_str("ab", 8), Ok(()));
        assert_eq!(packer.remaining(), 0);
        assert!(matches!(
            packer.pack_bool(true),
            Err(Error::BufferFull { .. })
        ));
    }

    #[test]
    fn test_pack_str_unterminated() {
        let mut buf = [0u8; 16];
        let mut packer = Packer::new(&mut buf);
        assert_eq!(
            packer.pack_str("hello", 4),
            Err(Error::UnterminatedString(4))
        );
        assert_eq!(packer.offset(), 0);

        // The string ends at its first NUL
        packer.pack_str("ab\0cdef", 4).unwrap();
        assert_eq!(packer.written(), &[0x62, b'a', b'b']);
    }

    #[test]
    fn test_failed_unpack_leaves_offset() {
        // Text string "hello" truncated to three payload bytes
        let data = [0x65, b'h', b'e', b'l'];
        let mut unpacker = Unpacker::new(&data);
        let mut out = [0u8; 16];
        assert_eq!(
            unpacker.unpack_str_into(Some(&mut out[..]), 16),
            Err(Error::EndOfBuffer)
        );
        assert_eq!(unpacker.offset(), 0);
        assert_eq!(unpacker.unpack_string(3), Err(Error::LengthExceeded(5, 3)));
        assert_eq!(unpacker.offset(), 0);
        assert!(matches!(
            unpacker.unpack_u8(),
            Err(Error::UnexpectedMajor { .. })
        ));
        assert_eq!(unpacker.unpack_str_header(), Ok(5));
        assert_eq!(unpacker.offset(), 1);
    }

    #[test]
    fn test_str_into_capacity() {
        let data = [0x62, b'h', b'i'];
        let mut out = [0u8; 2];
        let mut unpacker = Unpacker::new(&data);
        assert_eq!(
            unpacker.unpack_str_into(Some(&mut out[..]), 16),
            Err(Error::LengthExceeded(2, 1))
        );
        assert_eq!(
            unpacker.unpack_str_into(None, 16),
            Err(Error::LengthExceeded(2, 0))
        );

        let mut unpacker = Unpacker::new(&[0x60]);
        assert_eq!(unpacker.unpack_str_into(None, 16), Ok(0));
        assert!(unpacker.is_empty());
    }

    #[test]
    fn test_zero_copy_strings() {
        let mut buf = [0u8; 32];
        let mut packer = Packer::new(&mut buf);
        packer.pack_str("héllo", 16).unwrap();
        packer.pack_byte_str(&[1, 2, 3]).unwrap();
        let written = packer.into_written();

        let mut unpacker = Unpacker::new(written);
        assert_eq!(unpacker.unpack_str(16), Ok("héllo"));
        assert_eq!(unpacker.unpack_byte_str(2), Err(Error::LengthExceeded(3, 2)));
        assert_eq!(unpacker.unpack_byte_str(3), Ok(&[1u8, 2, 3][..]));
        assert!(unpacker.is_empty());
    }

    #[test]
    fn test_headers_then_raw() {
        let payload = [7u8; 40];
        let mut buf = [0u8; 64];
        let mut packer = Packer::new(&mut buf);
        packer.pack_byte_str_header(payload.len()).unwrap();
        packer.pack_raw(&payload[..20]).unwrap();
        packer.pack_raw(&payload[20..]).unwrap();
        packer.pack_str_header(0).unwrap();
        let written = packer.into_written();
        assert_eq!(&written[..2], &[0x58, 40]);

        let mut unpacker = Unpacker::new(written);
        let len = unpacker.unpack_byte_str_header().unwrap();
        assert_eq!(unpacker.unpack_raw(len), Ok(&payload[..]));
        assert_eq!(unpacker.unpack_str_header(), Ok(0));
        assert_eq!(unpacker.unpack_raw(1), Err(Error::EndOfBuffer));
    }

    #[test]
    fn test_scalars() {
        let mut buf = [0u8; 64];
        let mut packer = Packer::new(&mut buf);
        packer.pack_size(usize::MAX).unwrap();
        packer.pack_char(b'x').unwrap();
        packer.pack_result(-6).unwrap();
        packer.pack_on_off(OnOff::On).unwrap();
        packer.pack_bool(false).unwrap();
        packer.pack_double(2.5).unwrap();
        packer.pack_i64(i64::MIN).unwrap();
        let written = packer.into_written();

        let mut unpacker = Unpacker::new(written);
        assert_eq!(unpacker.unpack_size(), Ok(usize::MAX));
        assert_eq!(unpacker.unpack_char(), Ok(b'x'));
        assert_eq!(unpacker.unpack_result(), Ok(-6));
        assert_eq!(unpacker.unpack_on_off(), Ok(OnOff::On));
        assert_eq!(unpacker.unpack_bool(), Ok(false));
        assert_eq!(unpacker.unpack_double(), Ok(2.5));
        assert_eq!(unpacker.unpack_i64(), Ok(i64::MIN));
        assert!(unpacker.is_empty());
    }

    #[test]
    fn test_narrowing_leaves_offset() {
        let mut buf = [0u8; 4];
        let mut packer = Packer::new(&mut buf);
        packer.pack_u16(300).unwrap();

        let mut unpacker = Unpacker::new(packer.into_written());
        assert!(matches!(
            unpacker.unpack_u8(),
            Err(Error::OutOfRange { value: 300, .. })
        ));
        assert_eq!(unpacker.offset(), 0);
        assert_eq!(unpacker.unpack_u16(), Ok(300));
    }

    #[test]
    fn test_references() {
        let mut buf = [0u8; 32];
        let mut packer = Packer::new(&mut buf);
        packer.pack_reference(0x1234).unwrap();
        packer
            .pack_tagged_reference(SemanticTag::AsyncHandlerReference, 9)
            .unwrap();
        let written = packer.into_written();
        assert_eq!(&written[..6], &[0xD9, 0x00, 0x28, 0x19, 0x12, 0x34]);

        let mut unpacker = Unpacker::new(written);
        assert_eq!(unpacker.unpack_reference(), Ok(0x1234));
        assert_eq!(
            unpacker.unpack_reference(),
            Err(Error::UnexpectedTag {
                expected: 40,
                found: 42
            })
        );
        assert_eq!(
            unpacker.unpack_tagged_reference(),
            Ok((SemanticTag::AsyncHandlerReference.id(), 9))
        );
    }

    #[test]
    fn test_tuples() {
        let mut buf = [0u8; 64];
        let mut packer = Packer::new(&mut buf);
        packer
            .pack_tagged_size_pointer_tuple(SemanticTag::OutStringPointer, 256, 0xDEAD_BEEF)
            .unwrap();
        packer.pack_u32_tuple(SemanticTag::OutStringSize.id(), 10, 20).unwrap();
        packer.pack_u64_tuple(7, u64::MAX, 0).unwrap();
        let written = packer.into_written();
        assert_eq!(&written[..7], &[0xD9, 0x00, 0x2C, 0x82, 0x19, 0x01, 0x00]);

        let mut unpacker = Unpacker::new(written);
        assert_eq!(
            unpacker.unpack_size_pointer_tuple(),
            Ok((SemanticTag::OutStringPointer.id(), 256, 0xDEAD_BEEF))
        );
        assert_eq!(unpacker.unpack_u32_tuple(), Ok((47, 10, 20)));
        assert_eq!(unpacker.unpack_u64_tuple(), Ok((7, u64::MAX, 0)));
        assert!(unpacker.is_empty());
    }

    #[test]
    fn test_tuple_wrong_arity() {
        let mut buf = [0u8; 16];
        let mut packer = Packer::new(&mut buf);
        packer.pack_semantic_tag(47).unwrap();
        packer.pack_array_header(3).unwrap();
        let written = packer.into_written();

        let mut unpacker = Unpacker::new(written);
        assert_eq!(unpacker.unpack_u32_tuple(), Err(Error::InvalidLength(3)));
        assert_eq!(unpacker.offset(), 0);
    }

    #[test]
    fn test_u32_tuple_narrowing() {
        let mut buf = [0u8; 32];
        let mut packer = Packer::new(&mut buf);
        packer.pack_u64_tuple(1, 1 << 40, 1).unwrap();

        let mut unpacker = Unpacker::new(packer.into_written());
        assert!(matches!(
            unpacker.unpack_u32_tuple(),
            Err(Error::OutOfRange { .. })
        ));
        assert_eq!(unpacker.offset(), 0);
    }

    #[test]
    fn test_arrays() {
        let items = [1u16, 500, 65535];
        let mut buf = [0u8; 32];
        let mut packer = Packer::new(&mut buf);
        packer
            .pack_array(&items, 8, |packer, item| packer.pack_u16(*item))
            .unwrap();
        let written = packer.into_written();
        assert_eq!(written[0], 0x83);

        let mut unpacker = Unpacker::new(written);
        let mut out = [0u16; 2];
        assert_eq!(
            unpacker.unpack_array(Some(&mut out[..]), 8, Unpacker::unpack_u16),
            Err(Error::LengthExceeded(3, 2))
        );
        assert_eq!(
            unpacker.unpack_array(Some(&mut out[..]), 2, Unpacker::unpack_u16),
            Err(Error::LengthExceeded(3, 2))
        );
        assert_eq!(unpacker.offset(), 0);

        let mut out = [0u16; 4];
        assert_eq!(
            unpacker.unpack_array(Some(&mut out[..]), 8, Unpacker::unpack_u16),
            Ok(3)
        );
        assert_eq!(out, [1, 500, 65535, 0]);
        assert!(unpacker.is_empty());
    }

    #[test]
    fn test_array_none_output() {
        let mut buf = [0u8; 8];
        let mut packer = Packer::new(&mut buf);
        packer.pack_array_header(0).unwrap();
        packer.pack_array_header(1).unwrap();
        let written = packer.into_written();

        let mut unpacker = Unpacker::new(written);
        assert_eq!(unpacker.unpack_array(None, 4, Unpacker::unpack_u8), Ok(0));
        assert_eq!(
            unpacker.unpack_array(None, 4, Unpacker::unpack_u8),
            Err(Error::LengthExceeded(1, 0))
        );
        assert_eq!(unpacker.offset(), 1);
    }

    #[test]
    fn test_array_element_failure_rewinds() {
        let mut buf = [0u8; 8];
        let mut packer = Packer::new(&mut buf);
        packer.pack_array_header(2).unwrap();
        packer.pack_u8(1).unwrap();
        packer.pack_bool(true).unwrap();
        let written = packer.into_written();

        let mut unpacker = Unpacker::new(written);
        let mut out = [0u8; 2];
        assert!(matches!(
            unpacker.unpack_array(Some(&mut out[..]), 2, Unpacker::unpack_u8),
            Err(Error::UnexpectedMajor { .. })
        ));
        assert_eq!(unpacker.offset(), 0);
    }

    #[test]
    fn test_pack_array_rewinds() {
        let items = ["a", "bb", "this one is too long"];
        let mut buf = [0u8; 8];
        let mut packer = Packer::new(&mut buf);
        packer.pack_u8(9).unwrap();
        assert!(matches!(
            packer.pack_array(&items, 8, |packer, s| packer.pack_str(s, 32)),
            Err(Error::BufferFull { .. })
        ));
        assert_eq!(packer.written(), &[0x09]);
    }

    #[test]
    fn test_pack_array_max_count() {
        let items = [1u8, 2, 3];
        let mut buf = [0u8; 8];
        let mut packer = Packer::new(&mut buf);
        assert_eq!(
            packer.pack_array(&items, 2, |packer, item| packer.pack_u8(*item)),
            Err(Error::LengthExceeded(3, 2))
        );
        assert_eq!(packer.offset(), 0);

        packer
            .pack_array(&items, 3, |packer, item| packer.pack_u8(*item))
            .unwrap();
        assert_eq!(packer.written(), &[0x83, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_indefinite_array() {
        let mut buf = [0u8; 32];
        let mut packer = Packer::new(&mut buf);
        packer.pack_indef_array_header().unwrap();
        for value in [3i32, -3, 300] {
            packer.pack_i32(value).unwrap();
        }
        packer.pack_end_of_indef_array().unwrap();
        let written = packer.into_written();

        let mut unpacker = Unpacker::new(written);
        assert!(matches!(
            unpacker.unpack_array_header(8),
            Err(Error::InvalidAdditional(31))
        ));
        unpacker.unpack_indef_array_header().unwrap();
        let mut values = Vec::new();
        while !unpacker.is_end_of_indef_array() {
            values.push(unpacker.unpack_i32().unwrap());
        }
        unpacker.unpack_end_of_indef_array().unwrap();
        assert_eq!(values, [3, -3, 300]);
        assert!(unpacker.is_empty());
        assert!(!unpacker.is_end_of_indef_array());
        assert_eq!(
            unpacker.unpack_end_of_indef_array(),
            Err(Error::EndOfBuffer)
        );
    }

    #[test]
    fn test_peek_type() {
        let mut buf = [0u8; 32];
        let mut packer = Packer::new(&mut buf);
        packer.pack_semantic_tag(SemanticTag::Reference.id()).unwrap();
        packer.pack_u32(70_000).unwrap();
        packer.pack_double(1.0).unwrap();
        let written = packer.into_written();

        let mut unpacker = Unpacker::new(written);
        assert_eq!(unpacker.peek_type(), (ItemType::SemanticTag, Some(2)));
        unpacker.expect_semantic_tag(SemanticTag::Reference).unwrap();
        assert_eq!(unpacker.peek_type(), (ItemType::PosInteger, Some(4)));
        assert_eq!(
            unpacker.unpack_positive_integer(Major::PosInteger),
            Ok(70_000)
        );
        assert_eq!(unpacker.peek_type(), (ItemType::Double, Some(8)));
        assert_eq!(unpacker.unpack_double(), Ok(1.0));
        assert_eq!(unpacker.peek_type(), (ItemType::Invalid, None));
    }

    #[test]
    fn test_trait_bridge() {
        let value = (String::from("key"), vec![1u64, 2, 3]);
        let mut buf = [0u8; 32];
        let mut packer = Packer::new(&mut buf);
        packer.pack(&value).unwrap();
        let written = packer.into_written();

        let mut unpacker = Unpacker::new(written);
        let cfg = (RangeCfg::up_to(8), (RangeCfg::up_to(8), ()));
        let decoded: (String, Vec<u64>) = unpacker.unpack(&cfg).unwrap();
        assert_eq!(decoded, value);
        assert!(unpacker.is_empty());
    }
}
