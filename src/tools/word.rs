//! Fixed-width integer words, the unit both codecs work on.
//!
//! Only the primitive integer types implement [`Word`], and the trait is sealed, so
//! trying to compress floats or structs is rejected by the compiler.

use std::fmt::Debug;
use std::hash::Hash;

mod private {
    pub trait Sealed {}
}

/// A W-bit integer symbol. Signed types are handled through their two's complement pattern.
pub trait Word: private::Sealed + Copy + Eq + Ord + Hash + Debug {
    /// Width W in bits.
    const BITS: u32;

    /// Raw bit pattern, zero extended to 64 bits.
    fn to_bits(self) -> u64;

    /// Rebuild a word from the low W bits of `bits`. Higher bits are ignored.
    fn from_bits(bits: u64) -> Self;

    /// The top bit of the word, used by RLE to tag counts.
    #[inline(always)]
    fn msb() -> u64 {
        1 << (Self::BITS - 1)
    }

    /// Longest run a single RLE token can describe: 2^(W-1) - 1.
    #[inline(always)]
    fn max_count() -> u64 {
        Self::msb() - 1
    }

    /// True if the top bit is set.
    #[inline(always)]
    fn has_msb(self) -> bool {
        self.to_bits() & Self::msb() != 0
    }
}

macro_rules! impl_word {
    ($($t:ty => $u:ty),*) => {
        $(
            impl private::Sealed for $t {}

            impl Word for $t {
                const BITS: u32 = (std::mem::size_of::<$t>() * 8) as u32;

                #[inline(always)]
                fn to_bits(self) -> u64 {
                    self as $u as u64
                }

                #[inline(always)]
                fn from_bits(bits: u64) -> Self {
                    bits as $u as $t
                }
            }
        )*
    };
}

impl_word!(u8 => u8, i8 => u8, u16 => u16, i16 => u16, u32 => u32, i32 => u32, u64 => u64, i64 => u64);
