#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use rpc_pack::{
    Decode, DecodeExt, Encode, EncodeSize, Indefinite, MaxSize, OnOff, Packer, RangeCfg, Read,
    SemanticTag, Unpacker, Write,
};
use std::fmt::Debug;

fn roundtrip_primitive<T>(value: T)
where
    T: Write + EncodeSize + MaxSize + Read<Cfg = ()> + PartialEq + Debug,
{
    let encoded = value.encode();
    assert_eq!(value.encode_size(), encoded.len());
    assert!(encoded.len() <= T::MAX_SIZE);
    let decoded = T::decode(encoded).expect("Failed to decode a successfully encoded input!");
    assert_eq!(value, decoded);
}

fn roundtrip_f64(value: f64) {
    let encoded = value.encode();
    let decoded = f64::decode(encoded).expect("Failed to decode f64!");
    if value.is_nan() {
        assert!(decoded.is_nan());
    } else {
        assert_eq!(value, decoded);
    }
}

fn roundtrip_string(value: String) {
    let encoded = value.encode();
    assert_eq!(value.encode_size(), encoded.len());
    let len = value.len();
    let decoded = String::decode_cfg(encoded, &RangeCfg::exact(len)).expect("Failed to decode!");
    assert_eq!(value, decoded);
}

fn roundtrip_bytes(value: Bytes) {
    let encoded = value.encode();
    assert_eq!(value.encode_size(), encoded.len());
    let decoded = Bytes::decode_cfg(encoded, &RangeCfg::default()).expect("Failed to decode!");
    assert_eq!(value, decoded);
}

fn roundtrip_vec(value: Vec<i32>) {
    let encoded = value.encode();
    assert_eq!(value.encode_size(), encoded.len());
    let cfg = (RangeCfg::up_to(value.len()), ());
    let decoded = Vec::<i32>::decode_cfg(encoded, &cfg).expect("Failed to decode Vec!");
    assert_eq!(value, decoded);
}

fn roundtrip_indefinite(value: Vec<u64>) {
    let value = Indefinite(value);
    let encoded = value.encode();
    assert_eq!(value.encode_size(), encoded.len());
    let cfg = (RangeCfg::default(), ());
    let decoded = Indefinite::<u64>::decode_cfg(encoded, &cfg).expect("Failed to decode!");
    assert_eq!(value, decoded);
}

fn roundtrip_tuple(value: (u8, i64, bool)) {
    let encoded = value.encode();
    assert_eq!(value.encode_size(), encoded.len());
    let decoded =
        <(u8, i64, bool)>::decode_cfg(encoded, &((), (), ())).expect("Failed to decode tuple!");
    assert_eq!(value, decoded);
}

fn roundtrip_str(value: &str, max_len: u8) {
    let max_len = max_len as usize;
    let mut buf = vec![0u8; 2 * value.len() + 16];
    let mut packer = Packer::new(&mut buf);
    let len = value.find('\0').unwrap_or(value.len());
    let result = packer.pack_str(value, max_len);
    if len > max_len {
        assert!(result.is_err());
        assert_eq!(packer.offset(), 0);
        return;
    }
    result.expect("Failed to pack string!");
    let written = packer.into_written();

    let mut unpacker = Unpacker::new(written);
    let mut out = vec![0u8; len + 1];
    assert_eq!(unpacker.unpack_str_into(Some(&mut out[..]), max_len), Ok(len));
    assert_eq!(&out[..len], &value.as_bytes()[..len]);
    assert_eq!(out[len], 0);
    assert!(unpacker.is_empty());
}

fn roundtrip_tuples(tag: u16, size: u64, value: u64) {
    let mut buf = [0u8; 64];
    let mut packer = Packer::new(&mut buf);
    packer.pack_u64_tuple(tag, size, value).unwrap();
    packer.pack_semantic_tag(tag).unwrap();
    let written = packer.into_written();

    let mut unpacker = Unpacker::new(written);
    assert_eq!(unpacker.unpack_u64_tuple(), Ok((tag, size, value)));
    assert_eq!(unpacker.unpack_semantic_tag(), Ok(tag));
    assert!(unpacker.is_empty());
}

fn roundtrip_reference(tag: u8, reference: u64) {
    let tag = SemanticTag::try_from(40 + (tag % 3) as u16).unwrap();
    let mut buf = [0u8; 16];
    let mut packer = Packer::new(&mut buf);
    packer.pack_tagged_reference(tag, reference).unwrap();
    let mut unpacker = Unpacker::new(packer.into_written());
    assert_eq!(unpacker.unpack_tagged_reference(), Ok((tag.id(), reference)));
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    // Strings
    Str(&'a str, u8),
    String(String),
    Bytes(&'a [u8]),

    // Arrays
    Vec(Vec<i32>),
    Indefinite(Vec<u64>),
    Tuple(u8, i64, bool),

    // Tagged items
    Tuple64(u16, u64, u64),
    Reference(u8, u64),

    // Primitives
    Bool(bool),
    OnOff(bool),
    Usize(usize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F64(f64),
}

fn fuzz(input: FuzzInput) {
    match input {
        // Strings
        FuzzInput::Str(s, max_len) => roundtrip_str(s, max_len),
        FuzzInput::String(s) => roundtrip_string(s),
        FuzzInput::Bytes(it) => roundtrip_bytes(Bytes::from(it.to_vec())),
        // Arrays
        FuzzInput::Vec(it) => roundtrip_vec(it),
        FuzzInput::Indefinite(it) => roundtrip_indefinite(it),
        FuzzInput::Tuple(a, b, c) => roundtrip_tuple((a, b, c)),
        // Tagged items
        FuzzInput::Tuple64(tag, size, value) => roundtrip_tuples(tag, size, value),
        FuzzInput::Reference(tag, reference) => roundtrip_reference(tag, reference),
        // Primitives
        FuzzInput::Bool(v) => roundtrip_primitive(v),
        FuzzInput::OnOff(v) => {
            let v = OnOff::from(v);
            assert_eq!(OnOff::decode(v.encode()), Ok(v));
        }
        FuzzInput::Usize(v) => roundtrip_primitive(v),
        FuzzInput::U8(v) => roundtrip_primitive(v),
        FuzzInput::U16(v) => roundtrip_primitive(v),
        FuzzInput::U32(v) => roundtrip_primitive(v),
        FuzzInput::U64(v) => roundtrip_primitive(v),
        FuzzInput::I8(v) => roundtrip_primitive(v),
        FuzzInput::I16(v) => roundtrip_primitive(v),
        FuzzInput::I32(v) => roundtrip_primitive(v),
        FuzzInput::I64(v) => roundtrip_primitive(v),
        FuzzInput::F64(v) => roundtrip_f64(v),
    };
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
