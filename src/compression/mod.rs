//! The compression module wraps the codecs for whole files.
//!
//! A file is read in full and split into big-endian unsigned words of the chosen width.
//! The last word is padded with zero bytes, and the number of pad bytes is kept in the
//! header so decompression can trim them off again.
//!
//! Container layout (see [`crate::bitstream::bitwriter`]):
//! - `WPK`, format version, codec tag, word width in bits, pad byte count
//! - payload length in bits, big-endian u64
//! - payload: Huffman bitstream, or RLE words written big-endian
//!
//! Codecs:
//! - Rle: run-length encoding only.
//! - Huffman: Huffman coding only.
//! - Chain: run-length encoding, then Huffman coding of the RLE words.
//!

pub mod compress;
pub mod decompress;

use crate::tools::word::Word;

/// Bytes per word.
#[inline(always)]
fn word_bytes<W: Word>() -> usize {
    (W::BITS / 8) as usize
}

/// Split `bytes` into big-endian words, zero padding the last one. Returns the words
/// and how many pad bytes were added.
pub fn words_from_bytes<W: Word>(bytes: &[u8]) -> (Vec<W>, u8) {
    let size = word_bytes::<W>();
    let words = bytes
        .chunks(size)
        .map(|chunk| {
            let value = chunk.iter().fold(0_u64, |acc, &b| acc << 8 | b as u64);
            // Short last chunk: shift its bytes up to the top of the word
            W::from_bits(value << (8 * (size - chunk.len())))
        })
        .collect();
    let pad = (size - bytes.len() % size) % size;
    (words, pad as u8)
}

/// Write words out as big-endian bytes.
pub fn bytes_from_words<W: Word>(words: &[W]) -> Vec<u8> {
    let size = word_bytes::<W>();
    let mut out = Vec::with_capacity(words.len() * size);
    for w in words {
        let bits = w.to_bits();
        out.extend((0..size).rev().map(|i| (bits >> (8 * i)) as u8));
    }
    out
}
