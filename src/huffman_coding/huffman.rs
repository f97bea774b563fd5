use log::Level;

use super::code_table::CodeTable;
use super::tree::{HuffNode, HuffmanTree};
use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::Bitstream;
use crate::error::CodecError;
use crate::tools::freq_count::freqs;
use crate::tools::report::{NoReport, Report};
use crate::tools::word::Word;

/// Huffman encode `data`. The output is the serialized tree followed by one codeword per word.
pub fn huf_encode<W: Word>(data: &[W]) -> Result<Bitstream, CodecError> {
    huf_encode_with(data, &mut NoReport)
}

/// Huffman encode `data`, sending statistics to `report`.
pub fn huf_encode_with<W: Word>(
    data: &[W],
    report: &mut dyn Report,
) -> Result<Bitstream, CodecError> {
    if data.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    // Count, build the tree, and turn it into codes
    let freqs = freqs(data);
    let tree = HuffmanTree::from_freqs(&freqs)?;
    let table = CodeTable::from_tree(&tree)?;

    let tree_bits = tree.serialized_bits();
    let payload_bits = table.payload_bits(&freqs);
    report.report(
        Level::Debug,
        format_args!(
            "Huffman tree: {} symbols, depth {}, {} bits serialized",
            tree.leaf_count(),
            tree.depth(),
            tree_bits
        ),
    );

    // Size the output for the whole stream up front
    let mut bp = BitPacker::new(((tree_bits + payload_bits) / 8 + 1) as usize);
    tree.serialize(&mut bp);

    write_codes(data, &table, &mut bp)?;

    let stream = bp.finish();
    report.report(
        Level::Debug,
        format_args!(
            "Huffman encoded {} words ({} bits) into {} bits",
            data.len(),
            data.len() as u64 * W::BITS as u64,
            stream.bit_len
        ),
    );
    Ok(stream)
}

/// Write the codeword for each word of `data`. A word missing from `table` is an error.
fn write_codes<W: Word>(
    data: &[W],
    table: &CodeTable<W>,
    bp: &mut BitPacker,
) -> Result<(), CodecError> {
    for sym in data {
        let code = table
            .get(sym)
            .ok_or_else(|| CodecError::UnknownSymbol(sym.to_bits()))?;
        bp.out(code.bits, code.len);
    }
    Ok(())
}

/// Decode a Huffman bitstream produced by [`huf_encode`] with the same word type.
pub fn huf_decode<W: Word>(stream: &Bitstream) -> Result<Vec<W>, CodecError> {
    huf_decode_with(stream, &mut NoReport)
}

/// Decode a Huffman bitstream, sending statistics to `report`.
pub fn huf_decode_with<W: Word>(
    stream: &Bitstream,
    report: &mut dyn Report,
) -> Result<Vec<W>, CodecError> {
    let mut br = stream.reader();
    let tree = HuffmanTree::<W>::reconstruct(&mut br)?;
    report.report(
        Level::Trace,
        format_args!(
            "Rebuilt tree with {} symbols, {} payload bits follow",
            tree.leaf_count(),
            br.remaining()
        ),
    );

    let mut out = Vec::with_capacity(br.remaining() as usize);
    match tree.root() {
        // One symbol: each word is a single placeholder bit, whatever its value
        HuffNode::Leaf { symbol } => {
            while br.bit().is_some() {
                out.push(*symbol);
            }
        }
        root => {
            // Start each symbol at the root and follow bits down to a leaf
            'symbol: while !br.is_empty() {
                let mut node = root;
                loop {
                    match node {
                        HuffNode::Leaf { symbol } => {
                            out.push(*symbol);
                            continue 'symbol;
                        }
                        HuffNode::Internal { left, right } => {
                            node = match br.bool_bit() {
                                Some(false) => left.as_ref(),
                                Some(true) => right.as_ref(),
                                None => return Err(CodecError::TruncatedStream),
                            };
                        }
                    }
                }
            }
        }
    }

    report.report(
        Level::Debug,
        format_args!("Huffman decoded {} words", out.len()),
    );
    Ok(out)
}
