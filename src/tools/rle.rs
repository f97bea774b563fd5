//! Run-length encoding over fixed-width words.
//!
//! The top bit (MSB) of each emitted word is the only framing:
//! - MSB set: the word is a count, and the *next* word is repeated that many times.
//! - MSB clear: the word is a literal and is copied as is.
//!
//! A lone word whose MSB is already set can't be written as a literal, so it is
//! stored as a run of one. Runs longer than 2^(W-1) - 1 are split over several tokens.

use crate::error::CodecError;
use crate::tools::word::Word;

/// One unit of RLE output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RleToken<W> {
    /// A single word with a clear top bit, stored unchanged.
    Literal(W),
    /// `count` copies of `symbol`, stored as the pair `(MSB | count, symbol)`.
    Run { count: u64, symbol: W },
}

impl<W: Word> RleToken<W> {
    /// Number of words this token expands to.
    pub fn len(&self) -> u64 {
        match self {
            RleToken::Literal(_) => 1,
            RleToken::Run { count, .. } => *count,
        }
    }

    /// Tokens always describe at least one word, except a hand built zero count run.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the wire words for this token to `out`.
    fn push_words(&self, out: &mut Vec<W>) {
        match *self {
            RleToken::Literal(w) => out.push(w),
            RleToken::Run { count, symbol } => {
                out.push(W::from_bits(W::msb() | count));
                out.push(symbol);
            }
        }
    }
}

/// Build the token for a pending run of `count` copies of `last`.
#[inline(always)]
fn flush<W: Word>(last: W, count: u64) -> RleToken<W> {
    // Special case for one occurrence: only a clear MSB may stand alone
    if count == 1 && !last.has_msb() {
        RleToken::Literal(last)
    } else {
        RleToken::Run {
            count,
            symbol: last,
        }
    }
}

/// Split `data` into RLE tokens. Fails with `EmptyInput` if there is nothing to seed the first run.
pub fn rle_tokens<W: Word>(data: &[W]) -> Result<Vec<RleToken<W>>, CodecError> {
    let (&first, rest) = data.split_first().ok_or(CodecError::EmptyInput)?;
    let max_count = W::max_count();

    let mut tokens = Vec::with_capacity(data.len() / 2 + 1);
    let mut last = first;
    let mut count = 1_u64;

    for &w in rest {
        // Flush on a new value, or when the count word would overflow into the MSB
        if w != last || count == max_count {
            tokens.push(flush(last, count));
            last = w;
            count = 0;
        }
        count += 1;
    }
    // And whatever run is still pending at the end
    tokens.push(flush(last, count));
    Ok(tokens)
}

/// Run-length encode `data` into a flat word stream.
pub fn rle_encode<W: Word>(data: &[W]) -> Result<Vec<W>, CodecError> {
    let tokens = rle_tokens(data)?;
    let mut out = Vec::with_capacity(tokens.len() * 2);
    tokens.iter().for_each(|t| t.push_words(&mut out));
    Ok(out)
}

/// Read a flat word stream back into tokens. A count word with nothing after it is a `TruncatedStream`.
pub fn parse_tokens<W: Word>(words: &[W]) -> Result<Vec<RleToken<W>>, CodecError> {
    let mut tokens = Vec::with_capacity(words.len());
    let mut iter = words.iter();
    while let Some(&w) = iter.next() {
        if w.has_msb() {
            let count = w.to_bits() & !W::msb();
            let symbol = *iter.next().ok_or(CodecError::TruncatedStream)?;
            tokens.push(RleToken::Run { count, symbol });
        } else {
            tokens.push(RleToken::Literal(w));
        }
    }
    Ok(tokens)
}

/// Expand an RLE word stream. An empty stream decodes to an empty sequence.
/// A count that can't be allocated is a `RunTooLong`, not a panic.
pub fn rle_decode<W: Word>(words: &[W]) -> Result<Vec<W>, CodecError> {
    let mut out = Vec::with_capacity(words.len());
    let mut iter = words.iter();
    while let Some(&w) = iter.next() {
        if w.has_msb() {
            // w is a counter telling how many times the next word repeats
            let count = w.to_bits() & !W::msb();
            let symbol = *iter.next().ok_or(CodecError::TruncatedStream)?;
            let n = usize::try_from(count).map_err(|_| CodecError::RunTooLong(count))?;
            out.try_reserve(n).map_err(|_| CodecError::RunTooLong(count))?;
            out.extend(std::iter::repeat(symbol).take(n));
        } else {
            out.push(w);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::{parse_tokens, rle_decode, rle_encode, rle_tokens, RleToken};
    use crate::error::CodecError;
    use proptest::prelude::*;

    #[test]
    fn scenario_test() {
        let data = [5_i8, 5, 5, 5, 2, 2, 9];
        let tokens = rle_tokens(&data).unwrap();
        assert_eq!(
            tokens,
            vec![
                RleToken::Run { count: 4, symbol: 5 },
                RleToken::Run { count: 2, symbol: 2 },
                RleToken::Literal(9),
            ]
        );
        let words = rle_encode(&data).unwrap();
        assert_eq!(words, vec![-124_i8, 5, -126, 2, 9]);
        assert_eq!(rle_decode(&words).unwrap(), data);
    }

    #[test]
    fn lone_msb_word_test() {
        // 0x90 has its top bit set, so even a single one is stored as a run
        let data = [0x90_u8, 1];
        assert_eq!(rle_encode(&data).unwrap(), vec![0x81, 0x90, 1]);
        assert_eq!(rle_decode(&[0x81_u8, 0x90, 1]).unwrap(), data);
    }

    #[test]
    fn max_count_boundary_test() {
        let exact = vec![3_i8; 127];
        assert_eq!(
            rle_tokens(&exact).unwrap(),
            vec![RleToken::Run { count: 127, symbol: 3 }]
        );

        let over = vec![3_i8; 128];
        assert_eq!(
            rle_tokens(&over).unwrap(),
            vec![
                RleToken::Run { count: 127, symbol: 3 },
                RleToken::Literal(3),
            ]
        );

        let two_runs = vec![3_i8; 129];
        assert_eq!(
            rle_tokens(&two_runs).unwrap(),
            vec![
                RleToken::Run { count: 127, symbol: 3 },
                RleToken::Run { count: 2, symbol: 3 },
            ]
        );
        assert_eq!(rle_decode(&rle_encode(&two_runs).unwrap()).unwrap(), two_runs);

        // With the MSB set the leftover single can't be a literal
        let tagged = vec![-3_i8; 128];
        assert_eq!(
            rle_tokens(&tagged).unwrap(),
            vec![
                RleToken::Run { count: 127, symbol: -3 },
                RleToken::Run { count: 1, symbol: -3 },
            ]
        );
    }

    #[test]
    fn empty_test() {
        assert_eq!(rle_encode::<u8>(&[]), Err(CodecError::EmptyInput));
        assert_eq!(rle_tokens::<i16>(&[]), Err(CodecError::EmptyInput));
        assert_eq!(rle_decode::<u8>(&[]), Ok(vec![]));
    }

    #[test]
    fn dangling_count_test() {
        assert_eq!(rle_decode(&[1_u8, 0x83]), Err(CodecError::TruncatedStream));
        assert_eq!(parse_tokens(&[0x83_u8]), Err(CodecError::TruncatedStream));
    }

    #[test]
    fn huge_run_test() {
        // Well formed, but asks for 2^63 - 1 words
        assert_eq!(
            rle_decode::<u64>(&[u64::MAX, 0]),
            Err(CodecError::RunTooLong(u64::MAX >> 1))
        );
        assert_eq!(
            rle_decode::<i64>(&[7, -1, 0]),
            Err(CodecError::RunTooLong(i64::MAX as u64))
        );
    }

    #[test]
    fn wide_word_test() {
        let mut data = vec![-1_i64; 10];
        data.extend_from_slice(&[7, 7, i64::MIN, 0]);
        let words = rle_encode(&data).unwrap();
        assert_eq!(words.len(), 7);
        assert_eq!(rle_decode(&words).unwrap(), data);
    }

    proptest! {
        #[test]
        fn round_trip_prop(data in prop::collection::vec(any::<i8>(), 1..600)) {
            let words = rle_encode(&data).unwrap();
            prop_assert_eq!(rle_decode(&words).unwrap(), data);
        }

        #[test]
        fn token_accounting_prop(data in prop::collection::vec(0_u8..4, 1..2000)) {
            let tokens = rle_tokens(&data).unwrap();
            let total: u64 = tokens.iter().map(|t| t.len()).sum();
            prop_assert_eq!(total, data.len() as u64);
            prop_assert!(tokens.iter().all(|t| !t.is_empty() && t.len() <= 127));

            // The MSB of each wire word tells literals from counts
            let words = rle_encode(&data).unwrap();
            prop_assert_eq!(parse_tokens(&words).unwrap(), tokens);
        }
    }
}
