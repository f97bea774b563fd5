//! Huffman tree construction, serialization and reconstruction.
//!
//! The tree is built by repeatedly merging the two lightest nodes. Node weights only
//! exist while merging; the finished tree holds nothing but its shape and the leaf symbols.
//!
//! Serialized form (pre-order, no length prefix):
//! - leaf: a `1` bit, then the symbol as W bits, MSB first.
//! - internal: a `0` bit, then the left subtree, then the right subtree.
//!
//! Node kinds and the symbol width are always known, so the end of each subtree is
//! unambiguous and the decoder consumes exactly what the encoder wrote.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitreader::BitReader;
use crate::error::{CodecError, MAX_CODE_LEN};
use crate::tools::freq_count::freqs;
use crate::tools::word::Word;

/// A node of a full binary tree: every internal node has exactly two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode<W> {
    Leaf {
        symbol: W,
    },
    Internal {
        left: Box<HuffNode<W>>,
        right: Box<HuffNode<W>>,
    },
}

impl<W> HuffNode<W> {
    /// Join two subtrees under a new internal node.
    pub fn merge(left: Self, right: Self) -> Self {
        HuffNode::Internal {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns true if the node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }
}

/// Queue entry used while building. `seq` is the insertion order and breaks weight ties.
#[derive(Debug)]
struct Pending<W> {
    weight: u64,
    seq: usize,
    node: HuffNode<W>,
}

impl<W> PartialEq for Pending<W> {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl<W> Eq for Pending<W> {}

impl<W> PartialOrd for Pending<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W> Ord for Pending<W> {
    /// Sort by decreasing weight, then decreasing sequence, so the max-heap pops the
    /// lightest and oldest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A Huffman tree that owns all of its nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<W> {
    root: HuffNode<W>,
}

impl<W: Word> HuffmanTree<W> {
    /// Count the symbols in `data` and build a tree from those counts.
    pub fn from_symbols(data: &[W]) -> Result<Self, CodecError> {
        Self::from_freqs(&freqs(data))
    }

    /// Build a tree from (symbol, weight) pairs. Each symbol should appear once.
    ///
    /// Leaves enter the queue in slice order and merged nodes after them in creation order;
    /// among equal weights the earlier entry is popped first and becomes the left child.
    /// A single pair produces a tree that is one leaf.
    pub fn from_freqs(freqs: &[(W, u64)]) -> Result<Self, CodecError> {
        if freqs.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let mut heap: BinaryHeap<Pending<W>> = freqs
            .iter()
            .enumerate()
            .map(|(seq, &(symbol, weight))| Pending {
                weight,
                seq,
                node: HuffNode::Leaf { symbol },
            })
            .collect();
        let mut seq = freqs.len();

        // Pare the queue down to a single node, merging the two lightest each time.
        // When the second pop comes back empty, the first one is the root.
        while let Some(left) = heap.pop() {
            match heap.pop() {
                Some(right) => {
                    heap.push(Pending {
                        weight: left.weight.saturating_add(right.weight),
                        seq,
                        node: HuffNode::merge(left.node, right.node),
                    });
                    seq += 1;
                }
                None => return Ok(HuffmanTree { root: left.node }),
            }
        }
        Err(CodecError::EmptyInput)
    }

    /// Wrap an existing root node.
    pub fn from_root(root: HuffNode<W>) -> Self {
        HuffmanTree { root }
    }

    pub fn root(&self) -> &HuffNode<W> {
        &self.root
    }

    /// Number of distinct symbols.
    pub fn leaf_count(&self) -> usize {
        fn count<W>(node: &HuffNode<W>) -> usize {
            match node {
                HuffNode::Leaf { .. } => 1,
                HuffNode::Internal { left, right } => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        fn depth<W>(node: &HuffNode<W>) -> usize {
            match node {
                HuffNode::Leaf { .. } => 0,
                HuffNode::Internal { left, right } => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root)
    }

    /// Size of the serialized tree: one framing bit per node plus W bits per leaf.
    pub fn serialized_bits(&self) -> u64 {
        let leaves = self.leaf_count() as u64;
        (2 * leaves - 1) + leaves * W::BITS as u64
    }

    /// Write the tree in pre-order onto the packer.
    pub fn serialize(&self, bp: &mut BitPacker) {
        serialize_node(&self.root, bp);
    }

    /// Rebuild a tree from the reader, leaving the cursor just past the serialized tree.
    pub fn reconstruct(br: &mut BitReader<'_>) -> Result<Self, CodecError> {
        Ok(HuffmanTree {
            root: read_node(br, 0)?,
        })
    }
}

/// Recursively write a node and its children.
fn serialize_node<W: Word>(node: &HuffNode<W>, bp: &mut BitPacker) {
    match node {
        HuffNode::Leaf { symbol } => {
            bp.out_bit(true);
            bp.out(symbol.to_bits(), W::BITS as u8);
        }
        HuffNode::Internal { left, right } => {
            bp.out_bit(false);
            serialize_node(left, bp);
            serialize_node(right, bp);
        }
    }
}

/// Recursively read a node at `depth`. Refuses to go deeper than any valid code could.
fn read_node<W: Word>(br: &mut BitReader<'_>, depth: usize) -> Result<HuffNode<W>, CodecError> {
    if depth > MAX_CODE_LEN {
        return Err(CodecError::TreeTooDeep(depth));
    }
    let is_leaf = br.bool_bit().ok_or(CodecError::TruncatedStream)?;
    if is_leaf {
        let bits = br
            .bint(W::BITS as usize)
            .ok_or(CodecError::TruncatedStream)?;
        Ok(HuffNode::Leaf {
            symbol: W::from_bits(bits),
        })
    } else {
        let left = read_node(br, depth + 1)?;
        let right = read_node(br, depth + 1)?;
        Ok(HuffNode::merge(left, right))
    }
}

#[cfg(test)]
mod test {
    use super::{HuffNode, HuffmanTree};
    use crate::bitstream::bitpacker::BitPacker;
    use crate::bitstream::bitreader::BitReader;
    use crate::error::CodecError;

    fn leaf<W>(symbol: W) -> HuffNode<W> {
        HuffNode::Leaf { symbol }
    }

    #[test]
    fn build_test() {
        // A=5, B=3, C=2: C and B merge first (C lighter, so left), then A joins them
        let tree = HuffmanTree::from_freqs(&[(b'A', 5), (b'B', 3), (b'C', 2)]).unwrap();
        let expected = HuffNode::merge(leaf(b'A'), HuffNode::merge(leaf(b'C'), leaf(b'B')));
        assert_eq!(tree.root(), &expected);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn tie_break_test() {
        // Equal weights pop in insertion order
        let tree = HuffmanTree::from_freqs(&[(1_u8, 1), (2, 1), (3, 1), (4, 1)]).unwrap();
        let expected = HuffNode::merge(
            HuffNode::merge(leaf(1), leaf(2)),
            HuffNode::merge(leaf(3), leaf(4)),
        );
        assert_eq!(tree.root(), &expected);
        // And building twice gives the same tree
        assert_eq!(
            tree,
            HuffmanTree::from_freqs(&[(1_u8, 1), (2, 1), (3, 1), (4, 1)]).unwrap()
        );
    }

    #[test]
    fn single_symbol_test() {
        let tree = HuffmanTree::from_symbols(&[7_i32; 10]).unwrap();
        assert_eq!(tree.root(), &leaf(7));
        assert!(tree.root().is_leaf());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.serialized_bits(), 33);
    }

    #[test]
    fn empty_test() {
        assert_eq!(
            HuffmanTree::<u8>::from_freqs(&[]),
            Err(CodecError::EmptyInput)
        );
        assert_eq!(
            HuffmanTree::<u16>::from_symbols(&[]),
            Err(CodecError::EmptyInput)
        );
    }

    #[test]
    fn deep_clone_test() {
        let tree = HuffmanTree::from_symbols("mississippi river".as_bytes()).unwrap();
        let copy = tree.clone();
        drop(tree);
        assert_eq!(copy.leaf_count(), 8);
    }

    #[test]
    fn serialize_layout_test() {
        let tree = HuffmanTree::from_freqs(&[(b'A', 5), (b'B', 3), (b'C', 2)]).unwrap();
        let mut bp = BitPacker::new(16);
        tree.serialize(&mut bp);
        assert_eq!(bp.bit_len(), tree.serialized_bits());
        let stream = bp.finish();
        // 0 1'A' 0 1'C' 1'B'
        let mut br = stream.reader();
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.byte(), Some(b'A'));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.byte(), Some(b'C'));
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.byte(), Some(b'B'));
        assert!(br.is_empty());
    }

    #[test]
    fn reconstruct_test() {
        let data = [-300_i16, 12, 12, 12, -300, 5, 999, 12];
        let tree = HuffmanTree::from_symbols(&data).unwrap();
        let mut bp = BitPacker::new(64);
        tree.serialize(&mut bp);
        // Trailing bits after the tree must be left alone
        bp.out(0b101, 3);
        let stream = bp.finish();

        let mut br = stream.reader();
        let rebuilt = HuffmanTree::<i16>::reconstruct(&mut br).unwrap();
        assert_eq!(rebuilt, tree);
        assert_eq!(br.remaining(), 3);
    }

    #[test]
    fn truncated_tree_test() {
        let tree = HuffmanTree::from_symbols("abc".as_bytes()).unwrap();
        let mut bp = BitPacker::new(16);
        tree.serialize(&mut bp);
        let stream = bp.finish();
        for cut in 0..stream.bit_len {
            let mut br = BitReader::with_limit(&stream.bytes, cut);
            assert_eq!(
                HuffmanTree::<u8>::reconstruct(&mut br),
                Err(CodecError::TruncatedStream)
            );
        }
    }

    #[test]
    fn too_deep_test() {
        // 70 internal-node bits in a row can't be a real tree
        let bytes = [0_u8; 16];
        let mut br = BitReader::new(&bytes);
        assert_eq!(
            HuffmanTree::<u8>::reconstruct(&mut br),
            Err(CodecError::TreeTooDeep(65))
        );
    }
}
