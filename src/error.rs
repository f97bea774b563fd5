//! Error type shared by the RLE and Huffman codecs.
//!
//! Every failure is local to one call. The codecs are pure functions, so an error
//! leaves nothing half written behind.

use std::io;

/// Deepest tree we will build or read back. Codewords are held in a u64.
pub const MAX_CODE_LEN: usize = 64;

/// Reasons a compress or decompress call can fail.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Compress was handed zero words. There is no first word to seed a run or a tree.
    #[error("cannot compress an empty sequence")]
    EmptyInput,
    /// The input ran out in the middle of a tree, a codeword or a run.
    #[error("compressed stream ended unexpectedly")]
    TruncatedStream,
    /// A tree (or a code read back from a stream) was deeper than a u64 codeword allows.
    #[error("huffman tree depth {0} exceeds the 64 bit code limit")]
    TreeTooDeep(usize),
    /// An RLE count word asks for more words than this machine can hold.
    #[error("run of {0} words is too long to expand")]
    RunTooLong(u64),
    /// The encoder met a word its code table has no entry for.
    #[error("no huffman code for symbol {0:#x}")]
    UnknownSymbol(u64),
}

impl From<CodecError> for io::Error {
    fn from(e: CodecError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

#[cfg(test)]
mod test {
    use super::CodecError;
    use std::io;

    #[test]
    fn io_conversion_test() {
        let e: io::Error = CodecError::TruncatedStream.into();
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);
        assert_eq!(e.to_string(), "compressed stream ended unexpectedly");
    }

    #[test]
    fn display_test() {
        assert_eq!(
            CodecError::TreeTooDeep(70).to_string(),
            "huffman tree depth 70 exceeds the 64 bit code limit"
        );
        assert_eq!(
            CodecError::UnknownSymbol(0xff).to_string(),
            "no huffman code for symbol 0xff"
        );
    }
}
