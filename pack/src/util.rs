//! Buffer helpers shared by the codec modules.

use crate::Error;
use bytes::Buf;

/// Checks that at least `len` bytes remain in the buffer.
#[inline]
pub fn at_least<B: Buf>(buf: &B, len: usize) -> Result<(), Error> {
    if buf.remaining() < len {
        return Err(Error::EndOfBuffer);
    }
    Ok(())
}

/// Checks that `len` bytes fit in a writer with `remaining` bytes of space.
#[inline]
pub fn fits(remaining: usize, len: usize) -> Result<(), Error> {
    if remaining < len {
        return Err(Error::BufferFull {
            needed: len,
            remaining,
        });
    }
    Ok(())
}
