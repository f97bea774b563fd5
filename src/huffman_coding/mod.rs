//! The huffman module builds Huffman trees and codes, and encodes and decodes word sequences with them.
//!
//! - tree: greedy min-weight merge construction, pre-order serialization and recursive reconstruction.
//! - code_table: root-to-leaf paths as codewords (left = 0, right = 1).
//! - huffman: the codec, `huf_encode` and `huf_decode`.
//!
//! A tree and its table are built fresh for each encode and dropped afterwards. Decoding needs
//! nothing but the stream: the tree travels at the front of it, with no length field, and is
//! followed by one codeword per input word.
//!
//! A sequence with only one distinct word gives a tree that is a single leaf. That word is
//! given the 1-bit code `0`, so each occurrence still costs one bit and decoding stays simple.
//!

pub mod code_table;
pub mod huffman;
pub mod tree;
