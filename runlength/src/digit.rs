use std::num::NonZeroU8;

use tracing::{trace, trace_span};

use crate::{
    run::{Run, RunSequence},
    Error, Result,
};

/// Run-length codec over text, each run being a decimal digit then the symbol
#[derive(Debug, Default, Clone, Copy)]
pub struct DigitRunCodec;

fn count_to_digit(count: u8) -> char {
    debug_assert!(count <= DigitRunCodec::MAX_COUNT);

    char::from(b'0' + count)
}

fn digit_to_count(digit: char) -> Result<usize> {
    match digit {
        '0'..='9' => Ok(usize::from(digit as u8 - b'0')),
        _ => Err(Error::InvalidDigit(digit)),
    }
}

fn write_run(output: &mut String, run: &Run<char>) {
    output.push(count_to_digit(run.count()));
    output.push(run.symbol());
}

impl DigitRunCodec {
    pub const MAX_COUNT: u8 = 9;
    pub const GROUP_WIDTH: usize = 2;
    const RUN_CAP: NonZeroU8 = match NonZeroU8::new(Self::MAX_COUNT) {
        Some(cap) => cap,
        None => panic!("digit runs hold at least one symbol"),
    };

    fn compact(input: &str) -> RunSequence<char> {
        let _span_ = trace_span!("digit encode", len = input.len()).entered();

        let runs = RunSequence::compact(input.chars(), Self::RUN_CAP);
        trace!(runs = runs.len(), "compacted");

        runs
    }

    /// Encode text, repetitions longer than nine are split
    pub fn encode(input: &str) -> String {
        let mut ret = String::with_capacity(input.len() * Self::GROUP_WIDTH);
        Self::encode_on(input, &mut ret);
        ret
    }

    /// Encode and append result to given [`String`]
    pub fn encode_on(input: &str, output: &mut String) {
        Self::write_runs(&Self::compact(input), output);
    }

    /// Serialize already built runs
    pub fn write_runs(runs: &RunSequence<char>, output: &mut String) {
        for run in runs {
            write_run(output, run);
        }
    }

    /// Encode as separate two characters pairs, one per run
    pub fn encode_pairs(input: &str) -> Vec<String> {
        Self::compact(input)
            .into_iter()
            .map(|run| {
                let mut pair = String::with_capacity(Self::GROUP_WIDTH);
                write_run(&mut pair, &run);
                pair
            })
            .collect()
    }

    /// Parse an encoded text into its runs
    ///
    /// Length is counted in characters, not bytes.
    pub fn runs(input: &str) -> Result<RunSequence<char>> {
        let len = input.chars().count();
        if len % Self::GROUP_WIDTH != 0 {
            return Err(Error::TruncatedStream {
                len,
                width: Self::GROUP_WIDTH,
            });
        }

        let mut runs = RunSequence::new(Self::MAX_COUNT);
        let mut chars = input.chars();
        while let (Some(digit), Some(symbol)) = (chars.next(), chars.next()) {
            runs.push(digit_to_count(digit)?, symbol)?;
        }
        trace!(runs = runs.len(), "parsed");

        Ok(runs)
    }

    /// Decode text made of digit and symbol pairs
    pub fn decode(input: &str) -> Result<String> {
        let _span_ = trace_span!("digit decode", len = input.len()).entered();

        Ok(Self::runs(input)?.expand().collect())
    }

    /// Decode already split pairs, as returned by [`Self::encode_pairs`]
    ///
    /// Every pair has to be made of exactly two characters.
    pub fn decode_pairs(pairs: &[impl AsRef<str>]) -> Result<String> {
        let _span_ = trace_span!("digit decode pairs", pairs = pairs.len()).entered();

        let mut joined = String::with_capacity(pairs.len() * Self::GROUP_WIDTH);
        for pair in pairs {
            let pair = pair.as_ref();
            let len = pair.chars().count();
            if len != Self::GROUP_WIDTH {
                return Err(Error::TruncatedStream {
                    len,
                    width: Self::GROUP_WIDTH,
                });
            }
            joined.push_str(pair);
        }

        Self::decode(&joined)
    }
}
