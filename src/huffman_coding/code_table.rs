//! Derives the codeword for each symbol from a Huffman tree.
//!
//! A codeword is the root-to-leaf path: 0 for each left edge, 1 for each right edge,
//! read MSB first. Since the tree is full, no codeword is a prefix of another.

use std::collections::BTreeMap;

use super::tree::{HuffNode, HuffmanTree};
use crate::error::{CodecError, MAX_CODE_LEN};
use crate::tools::word::Word;

/// A codeword: the low `len` bits of `bits`, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    pub bits: u64,
    pub len: u8,
}

impl Code {
    /// True if this code's bits are a prefix of (or equal to) `other`'s.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        // A 64 bit shift clears everything, so an empty code prefixes all
        self.len <= other.len
            && other.bits.checked_shr((other.len - self.len) as u32).unwrap_or(0) == self.bits
    }
}

/// Symbol to codeword map, ordered by symbol value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<W> {
    codes: BTreeMap<W, Code>,
}

impl<W: Word> CodeTable<W> {
    /// Walk the tree and record the path to every leaf.
    pub fn from_tree(tree: &HuffmanTree<W>) -> Result<Self, CodecError> {
        let mut codes = BTreeMap::new();
        match tree.root() {
            // A lone leaf would get an empty code. Give it one bit so every symbol costs something.
            HuffNode::Leaf { symbol } => {
                codes.insert(*symbol, Code { bits: 0, len: 1 });
            }
            root => return_leaves(root, 0, 0, &mut codes)?,
        }
        Ok(CodeTable { codes })
    }

    /// Codeword for `symbol`, if it was in the tree.
    pub fn get(&self, symbol: &W) -> Option<Code> {
        self.codes.get(symbol).copied()
    }

    /// Iterate (symbol, code) in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&W, &Code)> {
        self.codes.iter()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Longest codeword length.
    pub fn max_len(&self) -> u8 {
        self.codes.values().map(|c| c.len).max().unwrap_or(0)
    }

    /// Bits needed to encode symbols with the given frequencies. Symbols missing from the table count as 0.
    pub fn payload_bits(&self, freqs: &[(W, u64)]) -> u64 {
        freqs
            .iter()
            .filter_map(|(sym, f)| self.get(sym).map(|c| c.len as u64 * f))
            .sum()
    }
}

/// Recursively walk the tree and record in `codes` each leaf's path and depth.
/// Depth is the code length.
fn return_leaves<W: Word>(
    node: &HuffNode<W>,
    path: u64,
    depth: usize,
    codes: &mut BTreeMap<W, Code>,
) -> Result<(), CodecError> {
    if depth > MAX_CODE_LEN {
        return Err(CodecError::TreeTooDeep(depth));
    }
    match node {
        HuffNode::Internal { left, right } => {
            // Shifting a 64 bit path left drops its top bit, but a depth of 64 is caught above first
            return_leaves(left, path << 1, depth + 1, codes)?;
            return_leaves(right, (path << 1) | 1, depth + 1, codes)?;
        }
        HuffNode::Leaf { symbol } => {
            codes.insert(
                *symbol,
                Code {
                    bits: path,
                    len: depth as u8,
                },
            );
        }
    }
    Ok(())
}
