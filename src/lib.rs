//! Lossless compression of fixed-width integer words.
//!
//! Two independent codecs are provided:
//! - Run-Length Encoding, using the top bit of each word to tell counts from literals
//!   ([`tools::rle`]).
//! - Huffman coding, with the code tree serialized at the front of the bitstream
//!   ([`huffman_coding::huffman`]).
//!
//! Both work on any of the primitive integer types, signed or unsigned, from 8 to 64 bits.
//! They are pure functions over in-memory slices and can be chained, RLE first.
//!
//! ```
//! use wordpack::{huf_decode, huf_encode, rle_decode, rle_encode};
//!
//! let data = [5_i8, 5, 5, 5, 2, 2, 9];
//! let runs = rle_encode(&data)?;
//! let packed = huf_encode(&runs)?;
//! assert_eq!(rle_decode(&huf_decode::<i8>(&packed)?)?, data);
//! # Ok::<(), wordpack::CodecError>(())
//! ```
//!
//! The `wordpack` binary wraps the codecs in a small container file format (see [`compression`]).
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use bitstream::Bitstream;
pub use error::CodecError;
pub use huffman_coding::huffman::{huf_decode, huf_decode_with, huf_encode, huf_encode_with};
pub use tools::rle::{rle_decode, rle_encode, rle_tokens, RleToken};
pub use tools::word::Word;
