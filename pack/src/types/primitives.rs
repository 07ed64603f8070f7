//! Codec implementations for Rust primitive types.
//!
//! Integers are always minimally encoded, so none of them has a fixed size. Unsigned types are
//! positive-integer items; signed types use a positive- or negative-integer item depending on
//! their sign. Decoding narrows the value to the target type and fails if it does not fit.
//!
//! `usize` is carried as a 64-bit value on the wire so that both 32-bit and 64-bit peers agree on
//! the encoding; decoding on a 32-bit target fails for values above `u32::MAX`.

use crate::{int, primitive, EncodeSize, Error, OnOff, Read, Write};
use bytes::{Buf, BufMut};

macro_rules! impl_unsigned {
    ($($type:ty),*) => {
        $(
            impl Write for $type {
                #[inline]
                fn write(&self, buf: &mut impl BufMut) {
                    int::write(crate::Major::PosInteger, *self as u64, buf);
                }
            }

            impl EncodeSize for $type {
                #[inline]
                fn encode_size(&self) -> usize {
                    int::size(*self as u64)
                }
            }

            impl Read for $type {
                type Cfg = ();

                #[inline]
                fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
                    int::read_uint(buf)
                }
            }
        )*
    };
}

macro_rules! impl_signed {
    ($($type:ty),*) => {
        $(
            impl Write for $type {
                #[inline]
                fn write(&self, buf: &mut impl BufMut) {
                    int::write_signed(*self as i64, buf);
                }
            }

            impl EncodeSize for $type {
                #[inline]
                fn encode_size(&self) -> usize {
                    int::size_signed(*self as i64)
                }
            }

            impl Read for $type {
                type Cfg = ();

                #[inline]
                fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
                    int::read_sint(buf)
                }
            }
        )*
    };
}

impl_unsigned!(u8, u16, u32, u64, usize);
impl_signed!(i8, i16, i32, i64);

impl Write for bool {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        primitive::write_bool(*self, buf);
    }
}

impl EncodeSize for bool {
    #[inline]
    fn encode_size(&self) -> usize {
        1
    }
}

impl Read for bool {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        primitive::read_bool(buf)
    }
}

impl Write for f64 {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        primitive::write_double(*self, buf);
    }
}

impl EncodeSize for f64 {
    #[inline]
    fn encode_size(&self) -> usize {
        primitive::DOUBLE_SIZE
    }
}

impl Read for f64 {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        primitive::read_double(buf)
    }
}

impl Write for OnOff {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        (*self as u8).write(buf);
    }
}

impl EncodeSize for OnOff {
    #[inline]
    fn encode_size(&self) -> usize {
        1
    }
}

impl Read for OnOff {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        OnOff::try_from(int::read(buf, crate::Major::PosInteger)?)
    }
}

impl Write for () {
    #[inline]
    fn write(&self, _: &mut impl BufMut) {}
}

impl EncodeSize for () {
    #[inline]
    fn encode_size(&self) -> usize {
        0
    }
}

impl Read for () {
    type Cfg = ();

    #[inline]
    fn read_cfg(_: &mut impl Buf, _: &()) -> Result<Self, Error> {
        Ok(())
    }
}
