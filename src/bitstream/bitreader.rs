//! BitReader: reads a packed, MSB-first bitstream held in memory.
//!
//! The reader is bounded by an explicit bit count rather than by the byte length, so
//! the zero padding in the last byte is never mistaken for data. Every read returns
//! None once that bound is reached.
//!

const BIT_MASK: u8 = 0xff;

/// Cursor over a packed bitstream.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
    /// Total number of readable bits.
    limit: u64,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader over every bit of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_limit(buffer, buffer.len() as u64 * 8)
    }

    /// Creates a new BitReader that stops after `limit` bits (clamped to the buffer size).
    pub fn with_limit(buffer: &'a [u8], limit: u64) -> Self {
        Self {
            buffer,
            cursor: 0,
            bit_index: 0,
            limit: limit.min(buffer.len() as u64 * 8),
        }
    }

    /// Number of bits consumed so far.
    pub fn position(&self) -> u64 {
        self.cursor as u64 * 8 + self.bit_index as u64
    }

    /// Number of bits left before the limit.
    pub fn remaining(&self) -> u64 {
        self.limit - self.position()
    }

    /// True once every bit up to the limit has been read.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let bit =
            (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Return Option<u64> of the next n bits (0-64), or None if fewer than n bits remain.
    /// Nothing is consumed when the read fails.
    pub fn bint(&mut self, mut n: usize) -> Option<u64> {
        /*
        Read as many bits as possible per step. First finish off a partial byte, then
        take whole bytes, then the leading bits of one more byte.
        */
        if n as u64 > self.remaining() {
            return None;
        }
        let mut result = 0_u64;

        // Test if we have a partial byte of data. If we do, read from it.
        if self.bit_index > 0 && n > 0 {
            // Set up to read the minimum of the partial byte and what we need to read
            let needed = n.min(8 - self.bit_index);

            // Get what we need/can from this partial byte
            result = ((self.buffer[self.cursor] & BIT_MASK >> self.bit_index)
                >> (8 - self.bit_index - needed)) as u64;
            self.bit_index += needed;
            if self.bit_index == 8 {
                self.cursor += 1;
            }
            self.bit_index %= 8;
            n -= needed;
        }
        // Get as many full bytes as we need.
        while n >= 8 {
            result = result << 8 | self.buffer[self.cursor] as u64;
            self.cursor += 1;
            n -= 8;
        }
        // If we still need a partial byte, get whatever bits we still need.
        if n > 0 {
            result = result << n | (self.buffer[self.cursor] >> (8 - n)) as u64;
            self.bit_index += n;
        }
        Some(result)
    }

    /// Returns a byte as an Option<u8>, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;

    #[test]
    fn basic_test() {
        let x = [0b10000001_u8];
        let mut br = BitReader::new(&x);
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bit(), None);
    }

    #[test]
    fn bint_test() {
        let x = [0b00011011];
        let mut br = BitReader::new(&x);
        assert_eq!(br.bint(5), Some(3));
        assert_eq!(br.bint(1), Some(0));
        assert_eq!(br.bint(2), Some(3));
        assert_eq!(br.bint(1), None);
    }

    #[test]
    fn bint_across_bytes_test() {
        let x = [0b1010_1100, 0b0011_1111, 0b1000_0000];
        let mut br = BitReader::new(&x);
        assert_eq!(br.bint(3), Some(0b101));
        assert_eq!(br.bint(14), Some(0b01100_0011_1111_1));
        assert_eq!(br.loc(), "[2.1]");
        assert_eq!(br.bint(0), Some(0));
        assert_eq!(br.remaining(), 7);
    }

    #[test]
    fn bint_64_test() {
        let x = [0xff, 0, 0, 0, 0, 0, 0, 0x01, 0x80];
        let mut br = BitReader::new(&x);
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bint(64), Some(0xfe00_0000_0000_0003));
    }

    #[test]
    fn byte_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        assert_eq!(br.byte(), Some(b'H'));
        assert_eq!(br.byte(), Some(b'e'));
        assert_eq!(br.byte(), Some(b'l'));
        assert_eq!(br.byte(), Some(b'l'));
    }

    #[test]
    fn limit_test() {
        let x = [0b1100_0000];
        let mut br = BitReader::with_limit(&x, 3);
        assert_eq!(br.bint(4), None);
        // A failed read leaves the cursor where it was
        assert_eq!(br.position(), 0);
        assert_eq!(br.bool_bit(), Some(true));
        assert_eq!(br.bool_bit(), Some(true));
        assert_eq!(br.bool_bit(), Some(false));
        assert!(br.is_empty());
        assert_eq!(br.bool_bit(), None);
    }

    #[test]
    fn limit_clamped_test() {
        let x = [0_u8; 2];
        let br = BitReader::with_limit(&x, 1000);
        assert_eq!(br.remaining(), 16);
    }
}
