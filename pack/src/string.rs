//! Text strings and byte strings.
//!
//! Both are a length header (minimal-width, like any integer) followed by the raw payload. Text
//! strings carry UTF-8 and are never NUL-terminated on the wire; when a text string is unpacked
//! into a caller buffer a terminating NUL is appended so the buffer can be handed to code that
//! expects C strings.
//!
//! Header and length errors are detected before the payload is touched. Once the header has been
//! read, a failing payload check leaves the header consumed; [crate::Unpacker] rewinds in that
//! case.

use crate::{int, item::Major, util::at_least, Error};
use bytes::{Buf, BufMut, Bytes};
use std::any::type_name;

/// Returns the length of `s` up to (not including) its first NUL byte.
///
/// Fails if that length exceeds `max_len`: a string that is not terminated within its bound is
/// rejected rather than truncated.
pub fn bounded_len(s: &[u8], max_len: usize) -> Result<usize, Error> {
    let len = s.iter().position(|&b| b == 0).unwrap_or(s.len());
    if len > max_len {
        return Err(Error::UnterminatedString(max_len));
    }
    Ok(len)
}

/// Returns the encoded size of a string or byte string with a payload of `len` bytes.
#[inline]
pub fn size(len: usize) -> usize {
    int::size(len as u64) + len
}

#[inline]
pub fn write_str_header(len: usize, buf: &mut impl BufMut) {
    int::write(Major::TextString, len as u64, buf);
}

#[inline]
pub fn write_byte_str_header(len: usize, buf: &mut impl BufMut) {
    int::write(Major::ByteString, len as u64, buf);
}

/// Reads a text-string header and returns the payload length.
///
/// The payload itself is left in the buffer.
pub fn read_str_header(buf: &mut impl Buf) -> Result<usize, Error> {
    read_header(buf, Major::TextString)
}

/// Reads a byte-string header and returns the payload length.
pub fn read_byte_str_header(buf: &mut impl Buf) -> Result<usize, Error> {
    read_header(buf, Major::ByteString)
}

/// Writes a text string of at most `max_len` bytes.
///
/// The string ends at its first NUL byte, if any. Nothing is written on failure.
pub fn write_str(s: &str, max_len: usize, buf: &mut impl BufMut) -> Result<(), Error> {
    let len = bounded_len(s.as_bytes(), max_len)?;
    write_str_header(len, buf);
    buf.put_slice(&s.as_bytes()[..len]);
    Ok(())
}

/// Writes a byte string.
pub fn write_byte_str(data: &[u8], buf: &mut impl BufMut) {
    write_byte_str_header(data.len(), buf);
    buf.put_slice(data);
}

/// Reads a text string into `out` and appends a NUL terminator.
///
/// Fails if the length exceeds `max_len` or does not leave room for the terminator in `out`.
/// `out` may be `None` only when the string is empty. Returns the string length, excluding the
/// terminator.
pub fn read_str_into(
    buf: &mut impl Buf,
    out: Option<&mut [u8]>,
    max_len: usize,
) -> Result<usize, Error> {
    let len = read_str_header(buf)?;
    if len > max_len {
        return Err(Error::LengthExceeded(len, max_len));
    }
    let Some(out) = out else {
        if len > 0 {
            return Err(Error::LengthExceeded(len, 0));
        }
        return Ok(0);
    };
    if len >= out.len() {
        return Err(Error::LengthExceeded(len, out.len().saturating_sub(1)));
    }
    at_least(&*buf, len)?;
    buf.copy_to_slice(&mut out[..len]);
    out[len] = 0;
    Ok(len)
}

/// Reads a text string of at most `max_len` bytes into an owned `String`.
pub fn read_string(buf: &mut impl Buf, max_len: usize) -> Result<String, Error> {
    let len = read_str_header(buf)?;
    if len > max_len {
        return Err(Error::LengthExceeded(len, max_len));
    }
    at_least(&*buf, len)?;
    let mut data = vec![0; len];
    buf.copy_to_slice(&mut data);
    String::from_utf8(data).map_err(|_| Error::InvalidUtf8)
}

/// Reads a byte string into `out`, returning the number of bytes copied.
///
/// Fails if the length exceeds `out`. `out` may be `None` only when the byte string is empty.
pub fn read_byte_str_into(buf: &mut impl Buf, out: Option<&mut [u8]>) -> Result<usize, Error> {
    let len = read_byte_str_header(buf)?;
    let out = match out {
        Some(out) => out,
        None if len == 0 => return Ok(0),
        None => return Err(Error::LengthExceeded(len, 0)),
    };
    if len > out.len() {
        return Err(Error::LengthExceeded(len, out.len()));
    }
    at_least(&*buf, len)?;
    buf.copy_to_slice(&mut out[..len]);
    Ok(len)
}

/// Reads a byte string of at most `max_len` bytes.
pub fn read_byte_str(buf: &mut impl Buf, max_len: usize) -> Result<Bytes, Error> {
    let len = read_byte_str_header(buf)?;
    if len > max_len {
        return Err(Error::LengthExceeded(len, max_len));
    }
    at_least(&*buf, len)?;
    Ok(buf.copy_to_bytes(len))
}

fn read_header(buf: &mut impl Buf, major: Major) -> Result<usize, Error> {
    let len = int::read(buf, major)?;
    usize::try_from(len).map_err(|_| Error::OutOfRange {
        value: len as i128,
        target: type_name::<usize>(),
    })
}
