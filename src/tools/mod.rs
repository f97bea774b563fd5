//! The tools module provides the word level building blocks for wordpack.
//!
//! The tools are:
//! - cli: Command line interface and options.
//! - freq_count: Frequency count of the words in a sequence.
//! - report: Injected diagnostics for the codecs.
//! - rle: MSB tagged Run-Length-Encoding.
//! - word: The fixed-width integer words the codecs operate on.
//!
pub mod cli;
pub mod freq_count;
pub mod report;
pub mod rle;
pub mod word;
