//! Pack and unpack RPC message fields.
//!
//! # Overview
//!
//! A compact, self-describing binary format for the arguments and results of remote procedure
//! calls. Every field is an item: a one-byte header naming its major type, an optional big-endian
//! argument of 1, 2, 4 or 8 bytes, and for strings a payload. The format is a subset of CBOR:
//! - Integers: minimally encoded positive and negative integers up to 64 bits
//! - Primitives: `true`, `false`, IEEE-754 doubles and the break marker
//! - Strings: length-prefixed UTF-8 text strings and byte strings
//! - Arrays: fixed-count and indefinite-length (break-terminated)
//! - Semantic tags: a fixed-width 16-bit tag giving the next item out-of-band meaning
//!
//! Decoding never reads past the end of its input and checks every length against a caller
//! bound before trusting it.
//!
//! # Layers
//!
//! - [int], [primitive], [string], [array], [tag]: free functions over [bytes::Buf] and
//!   [bytes::BufMut], one module per item kind.
//! - [Packer] and [Unpacker]: cursors over a flat buffer whose methods are atomic, leaving the
//!   offset untouched on failure.
//! - [Write], [Read] and friends: traits for composing typed messages.
//! - [get_type]: classifies the item at a position without decoding it.
//!
//! # Example
//!
//! ```
//! use bytes::{Buf, BufMut};
//! use rpc_pack::{DecodeExt, Encode, EncodeSize, Error, Read, Write};
//!
//! // A request carrying an object reference and a size
//! #[derive(Debug, PartialEq)]
//! struct GetRequest {
//!     reference: u64,
//!     size: usize,
//! }
//!
//! impl Write for GetRequest {
//!     fn write(&self, buf: &mut impl BufMut) {
//!         (self.reference, self.size).write(buf);
//!     }
//! }
//!
//! impl EncodeSize for GetRequest {
//!     fn encode_size(&self) -> usize {
//!         (self.reference, self.size).encode_size()
//!     }
//! }
//!
//! impl Read for GetRequest {
//!     type Cfg = ();
//!
//!     fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
//!         let (reference, size) = <(u64, usize)>::read_cfg(buf, &((), ()))?;
//!         Ok(Self { reference, size })
//!     }
//! }
//!
//! let request = GetRequest { reference: 42, size: 300 };
//! let encoded = request.encode();
//! assert_eq!(&encoded[..], &[0x82, 0x18, 0x2A, 0x19, 0x01, 0x2C]);
//! assert_eq!(GetRequest::decode(encoded).unwrap(), request);
//! ```

pub mod array;
pub mod codec;
pub mod config;
pub mod cursor;
pub mod error;
pub mod int;
pub mod item;
pub mod primitive;
pub mod string;
pub mod tag;
pub mod types;
pub mod util;

// Re-export main types and traits
pub use codec::{Codec, Decode, DecodeExt, Encode, EncodeSize, Read, ReadExt, Write};
pub use config::RangeCfg;
pub use cursor::{Packer, Unpacker};
pub use error::Error;
pub use item::{get_type, ItemType, Major, MaxSize};
pub use primitive::OnOff;
pub use tag::SemanticTag;
pub use types::vec::Indefinite;
