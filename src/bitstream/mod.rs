//! The bitstream module forms the I/O subsystem for wordpack.
//!
//! - bitpacker: packs codewords and tree bits MSB-first into memory.
//! - bitreader: a bounded cursor over a packed bitstream, used to rebuild trees and walk codes.
//! - bitwriter: writes a finished container (header and payload) to a file or stdout.
//!
//! The Huffman wire format has no length field of its own. A [`Bitstream`] therefore carries
//! the exact bit count next to the packed bytes, and readers are bounded by it.
//!
pub mod bitpacker;
pub mod bitreader;
pub mod bitwriter;

use bitreader::BitReader;

/// Packed bits plus the number of them that are meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitstream {
    /// Bits packed MSB-first, the last byte zero padded.
    pub bytes: Vec<u8>,
    /// Number of valid bits in `bytes`.
    pub bit_len: u64,
}

impl Bitstream {
    /// Wrap packed bytes whose valid length is known out of band.
    pub fn new(bytes: Vec<u8>, bit_len: u64) -> Self {
        Self { bytes, bit_len }
    }

    /// A reader over exactly the valid bits.
    pub fn reader(&self) -> BitReader<'_> {
        BitReader::with_limit(&self.bytes, self.bit_len)
    }
}
