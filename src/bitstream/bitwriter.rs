use std::io::{self, Write};

use crate::tools::cli::{Codec, Width};

/// Container signature.
pub const MAGIC: [u8; 3] = *b"WPK";
/// Container format version written by this crate.
pub const VERSION: u8 = 1;
/// Bytes in a container header: magic, version, codec, width, pad, bit length.
pub const HEADER_LEN: usize = 3 + 1 + 1 + 1 + 1 + 8;

/// Everything a reader needs to decode the payload that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub codec: Codec,
    pub width: Width,
    /// Zero bytes appended to the input to fill the last word.
    pub pad: u8,
    /// Valid bits in the payload.
    pub bit_len: u64,
}

/// Writes a container for output: the header, then the packed payload.
pub struct BitWriter<O> {
    /// Output buffer used to assemble the container.
    output: Vec<u8>,
    /// Handle to the output stream
    writer: O,
}

impl<O: Write> BitWriter<O> {
    /// Create a new BitWriter that writes to `writer`.
    pub fn new(writer: O) -> Self {
        Self {
            writer,
            output: Vec::with_capacity(HEADER_LEN),
        }
    }

    /// Push the container header to the output buffer.
    fn push_header(&mut self, header: &Header) {
        MAGIC.iter().for_each(|&x| self.out8(x));
        self.out8(VERSION);
        self.out8(header.codec as u8);
        self.out8(header.width.bits());
        self.out8(header.pad);
        header
            .bit_len
            .to_be_bytes()
            .iter()
            .for_each(|&x| self.out8(x));
    }

    /// Put a byte on the output buffer.
    fn out8(&mut self, data: u8) {
        self.output.push(data);
    }

    /// Write a complete container. Returns the number of bytes written.
    pub fn write_container(&mut self, header: &Header, payload: &[u8]) -> io::Result<usize> {
        self.push_header(header);
        self.output.extend_from_slice(payload);

        // Write out everything in the buffer, then drain it
        self.writer.write_all(&self.output)?;
        self.writer.flush()?;
        let written = self.output.len();
        self.output.clear();
        Ok(written)
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> O {
        self.writer
    }
}
