use rustc_hash::FxHashMap;

use crate::tools::word::Word;

/// Returns a frequency count of the input data as (symbol, count) pairs sorted by symbol value.
/// Symbols that never occur are not listed.
pub fn freqs<W: Word>(data: &[W]) -> Vec<(W, u64)> {
    // Words can be up to 64 bits wide, so a lookup array like bzip2's [u32; 256] is out.
    let mut counts: FxHashMap<W, u64> = FxHashMap::default();
    data.iter().for_each(|&el| *counts.entry(el).or_insert(0) += 1);

    // Hash order is arbitrary. Sort so tree building sees the same order every time.
    let mut freqs = counts.into_iter().collect::<Vec<(W, u64)>>();
    freqs.sort_unstable_by_key(|&(sym, _)| sym);
    freqs
}
