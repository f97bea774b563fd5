use log::error;

/// Packs bits MSB-first into a byte buffer. Call flush() (or finish()) before reading
/// the output, or up to 7 bits may be left in the internal queue.
#[derive(Debug)]
pub struct BitPacker {
    pub output: Vec<u8>,
    /// Number of valid bits in the last byte after flush(). 0 means the last byte is full.
    pub last_bits: u8,
    queue: u64,
    q_bits: u8,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of the size specified (in bytes).
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            last_bits: 0,
            queue: 0,
            q_bits: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /*
    The queue never holds more than 7 bits between calls, so up to 32 bits can be
    shifted in at once without losing anything off the top of the u64. Wider writes
    are split into a high and a low half.
    */
    /// Writes the low `depth` bits of `data` (0-32), most significant first.
    fn out_short(&mut self, data: u64, depth: u8) {
        if depth == 0 {
            return;
        }
        self.queue <<= depth; //shift queue by bit length
        self.queue |= data & (u64::MAX >> (64 - depth)); //add data portion to queue
        self.q_bits += depth; //update depth of queue bits
        self.write_stream();
    }

    /// Writes the low `depth` bits of `data` (0-64), most significant first.
    pub fn out(&mut self, data: u64, depth: u8) {
        if depth > 32 {
            self.out_short(data >> 32, depth - 32);
            self.out_short(data & 0xffff_ffff, 32);
        } else {
            self.out_short(data, depth);
        }
    }

    /// Writes a single bit.
    pub fn out_bit(&mut self, bit: bool) {
        self.out_short(bit as u64, 1);
    }

    /// Number of bits written so far, including any still queued.
    pub fn bit_len(&self) -> u64 {
        self.output.len() as u64 * 8 + self.q_bits as u64
    }

    /// Flushes the remaining bits (1-7) from the buffer, padding with 0s in the least
    /// signficant bits
    pub fn flush(&mut self) {
        self.last_bits = self.q_bits % 8;
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
    }

    /// Flush and hand back the packed bytes with their exact bit count.
    pub fn finish(mut self) -> super::Bitstream {
        let bit_len = self.bit_len();
        self.flush();
        super::Bitstream {
            bytes: self.output,
            bit_len,
        }
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format! {"[{}.{}]", self.bit_len() / 8, self.bit_len() % 8}
    }
}

#[cfg(test)]
mod test {
    use super::BitPacker;

    #[test]
    fn out16_test() {
        let mut bw = BitPacker::new(100);
        let data = 0b00100001_00100000;
        bw.out(data, 16);
        bw.flush();
        let out = bw.output;
        assert_eq!(out, "! ".as_bytes());
    }

    #[test]
    fn odd_bits_and_loc_test() {
        let mut bw = BitPacker::new(100);
        bw.out(0b1, 1);
        bw.out(0b01, 2);
        assert_eq!("[0.3]", &bw.loc());
        bw.out(0b00001, 5);
        assert_eq!("[1.0]", &bw.loc());
        bw.out_bit(true);
        bw.flush();
        assert_eq!(bw.last_bits, 1);
        assert_eq!(bw.output, vec![0b1010_0001, 0b1000_0000]);
    }

    #[test]
    fn out64_test() {
        let mut bw = BitPacker::new(100);
        bw.out_bit(false);
        bw.out(0x8000_0000_0000_0001, 64);
        let stream = bw.finish();
        assert_eq!(stream.bit_len, 65);
        assert_eq!(stream.bytes, vec![0x40, 0, 0, 0, 0, 0, 0, 0, 0x80]);
    }

    #[test]
    fn masks_high_bits_test() {
        let mut bw = BitPacker::new(100);
        // Only the low 4 bits of the data are written
        bw.out(0xfa, 4);
        bw.out(0x0, 4);
        bw.flush();
        assert_eq!(bw.output, vec![0xa0]);
    }
}
