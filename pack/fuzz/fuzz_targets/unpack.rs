#![no_main]

use libfuzzer_sys::fuzz_target;
use rpc_pack::{get_type, ItemType, Major, Unpacker};

const MAX_LEN: usize = 1024;

/// Walks arbitrary input item by item, checking that every failed unpack leaves the cursor
/// where it was and every successful one makes progress.
fn fuzz(data: &[u8]) {
    let mut unpacker = Unpacker::new(data);
    let mut out = [0u8; 64];
    while !unpacker.is_empty() {
        let offset = unpacker.offset();
        let (item_type, extra) = unpacker.peek_type();
        assert_eq!((item_type, extra), get_type(&data[offset..]));
        let result = match item_type {
            ItemType::PosInteger => unpacker.unpack_u64().map(|_| ()),
            ItemType::NegInteger => unpacker.unpack_integer().map(|_| ()),
            ItemType::ByteString => unpacker
                .unpack_byte_str_into(Some(&mut out[..]))
                .map(|_| ()),
            ItemType::TextString => unpacker
                .unpack_str_into(Some(&mut out[..]), MAX_LEN)
                .map(|_| ()),
            ItemType::ItemArray if extra.is_none() => unpacker.unpack_indef_array_header(),
            ItemType::ItemArray => unpacker.unpack_array_header(MAX_LEN).map(|_| ()),
            ItemType::SemanticTag => unpacker.unpack_semantic_tag().map(|_| ()),
            ItemType::Boolean => unpacker.unpack_bool().map(|_| ()),
            ItemType::Double => unpacker.unpack_double().map(|_| ()),
            ItemType::IndefEnd => unpacker.unpack_end_of_indef_array(),
            ItemType::Invalid => unpacker
                .unpack_positive_integer(Major::PosInteger)
                .map(|_| ()),
        };
        match result {
            Ok(()) => assert!(unpacker.offset() > offset),
            Err(_) => {
                assert_eq!(unpacker.offset(), offset);
                return;
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    fuzz(data);
});
