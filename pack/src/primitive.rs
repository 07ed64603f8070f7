//! Booleans, doubles, and the end-of-array marker.
//!
//! Primitives share [Major::Primitive] and are told apart by a fixed sub-code in the additional
//! field. Doubles are always followed by the full eight bytes of their IEEE-754 bit pattern.

use crate::{
    item::{self, Major, BREAK, DOUBLE, FALSE, TRUE},
    util::at_least,
    Error,
};
use bytes::{Buf, BufMut};

const FALSE_BYTE: u8 = Major::Primitive.header(FALSE);
const TRUE_BYTE: u8 = Major::Primitive.header(TRUE);
const DOUBLE_BYTE: u8 = Major::Primitive.header(DOUBLE);
const BREAK_BYTE: u8 = Major::Primitive.header(BREAK);

/// Encoded size of a double.
pub const DOUBLE_SIZE: usize = 9;

#[inline]
pub fn write_bool(value: bool, buf: &mut impl BufMut) {
    buf.put_u8(if value { TRUE_BYTE } else { FALSE_BYTE });
}

pub fn read_bool(buf: &mut impl Buf) -> Result<bool, Error> {
    let byte = peek(&*buf)?;
    let value = match byte {
        FALSE_BYTE => false,
        TRUE_BYTE => true,
        _ => return Err(Error::InvalidBool(byte)),
    };
    buf.advance(1);
    Ok(value)
}

#[inline]
pub fn write_double(value: f64, buf: &mut impl BufMut) {
    buf.put_u8(DOUBLE_BYTE);
    buf.put_u64(value.to_bits());
}

pub fn read_double(buf: &mut impl Buf) -> Result<f64, Error> {
    let byte = peek(&*buf)?;
    if byte != DOUBLE_BYTE {
        return Err(Error::InvalidPrimitive(byte));
    }
    at_least(&*buf, DOUBLE_SIZE)?;
    buf.advance(1);
    Ok(f64::from_bits(buf.get_u64()))
}

/// Writes the marker that closes an indefinite-length array.
#[inline]
pub fn write_break(buf: &mut impl BufMut) {
    buf.put_u8(BREAK_BYTE);
}

/// Consumes the marker that closes an indefinite-length array.
pub fn read_break(buf: &mut impl Buf) -> Result<(), Error> {
    let byte = peek(&*buf)?;
    if byte != BREAK_BYTE {
        return Err(Error::InvalidPrimitive(byte));
    }
    buf.advance(1);
    Ok(())
}

/// Returns true if the next item is the end-of-array marker.
#[inline]
pub fn is_break(buf: &impl Buf) -> bool {
    buf.chunk().first() == Some(&BREAK_BYTE)
}

/// A two-state switch, packed as the unsigned integer 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OnOff {
    Off = 0,
    On = 1,
}

impl From<bool> for OnOff {
    fn from(value: bool) -> Self {
        if value {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl TryFrom<u64> for OnOff {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            _ => Err(Error::InvalidOnOff(value)),
        }
    }
}

/// Peeks at the header byte, checking it is a primitive.
fn peek(buf: &impl Buf) -> Result<u8, Error> {
    item::peek_major(buf.chunk(), Major::Primitive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_bool() {
        for value in [true, false] {
            let mut buf = Vec::new();
            write_bool(value, &mut buf);
            assert_eq!(buf.len(), 1);
            assert_eq!(read_bool(&mut &buf[..]).unwrap(), value);
        }
        let mut buf = Vec::new();
        write_bool(true, &mut buf);
        write_bool(false, &mut buf);
        assert_eq!(buf, [0xF5, 0xF4]);
    }

    #[test]
    fn test_invalid_bool() {
        let mut buf = Bytes::from_static(&[0xF6]);
        assert_eq!(read_bool(&mut buf), Err(Error::InvalidBool(0xF6)));
        assert_eq!(buf.len(), 1);

        // An integer 1 is not a boolean
        let mut buf = Bytes::from_static(&[0x01]);
        assert!(matches!(
            read_bool(&mut buf),
            Err(Error::UnexpectedMajor { .. })
        ));
    }

    #[test]
    fn test_double() {
        let values = [
            0.0f64,
            -0.0,
            1.0,
            -1.5,
            f64::MIN,
            f64::MAX,
            f64::EPSILON,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ];
        for value in values {
            let mut buf = Vec::new();
            write_double(value, &mut buf);
            assert_eq!(buf.len(), DOUBLE_SIZE);
            let decoded = read_double(&mut &buf[..]).unwrap();
            assert_eq!(decoded.to_bits(), value.to_bits());
        }

        let mut buf = Vec::new();
        write_double(f64::NAN, &mut buf);
        assert!(read_double(&mut &buf[..]).unwrap().is_nan());
    }

    #[test]
    fn test_double_conformity() {
        let mut buf = Vec::new();
        write_double(1.0, &mut buf);
        assert_eq!(buf, [0xFB, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_double_truncated() {
        let mut buf = Bytes::from_static(&[0xFB, 0x3F, 0xF0, 0x00]);
        assert_eq!(read_double(&mut buf), Err(Error::EndOfBuffer));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn test_break() {
        let mut buf = Vec::new();
        write_break(&mut buf);
        assert_eq!(buf, [0xFF]);
        assert!(is_break(&&buf[..]));
        assert!(read_break(&mut &buf[..]).is_ok());
        assert_eq!(
            read_break(&mut &[0xF5u8][..]),
            Err(Error::InvalidPrimitive(0xF5))
        );
        assert!(!is_break(&&[0x00u8][..]));
    }

    #[test]
    fn test_on_off() {
        assert_eq!(OnOff::try_from(0u64).unwrap(), OnOff::Off);
        assert_eq!(OnOff::try_from(1u64).unwrap(), OnOff::On);
        assert_eq!(OnOff::try_from(2u64), Err(Error::InvalidOnOff(2)));
        assert_eq!(OnOff::from(true), OnOff::On);
    }
}
