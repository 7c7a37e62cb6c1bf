use std::{iter, num::NonZeroU8, slice, vec};

use crate::{Error, Result};

/// A symbol repeated `count` times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<S> {
    count: u8,
    symbol: S,
}

impl<S: Copy> Run<S> {
    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn symbol(&self) -> S {
        self.symbol
    }

    /// Symbol repeated as many times as counted, nothing for a zero count
    pub fn expand(&self) -> impl Iterator<Item = S> {
        iter::repeat(self.symbol).take(self.count.into())
    }
}

enum State<S> {
    Idle,
    Repeat { symbol: S, count: u8 },
}

/// Ordered runs, each bounded by the count width of a wire format
///
/// Order is the encoding order: expanding every run in turn gives back the
/// compacted symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSequence<S> {
    runs: Vec<Run<S>>,
    max_count: u8,
}

impl<S: Copy + PartialEq> RunSequence<S> {
    /// Empty sequence accepting counts up to `max_count`
    pub fn new(max_count: u8) -> Self {
        Self {
            runs: Vec::new(),
            max_count,
        }
    }

    /// Merge consecutive identical symbols into runs
    ///
    /// A repetition longer than `max_count` is split in runs of `max_count`,
    /// the last one holding the remainder. Never produces a zero count.
    pub fn compact(symbols: impl IntoIterator<Item = S>, max_count: NonZeroU8) -> Self {
        let max_count = max_count.get();
        let mut runs = Vec::new();
        let mut state = State::Idle;

        for symbol in symbols {
            state = match state {
                State::Idle => State::Repeat { symbol, count: 1 },
                State::Repeat {
                    symbol: current,
                    count,
                } if current == symbol && count < max_count => State::Repeat {
                    symbol,
                    count: count + 1,
                },
                State::Repeat {
                    symbol: current,
                    count,
                } => {
                    runs.push(Run {
                        count,
                        symbol: current,
                    });
                    State::Repeat { symbol, count: 1 }
                }
            }
        }

        if let State::Repeat { symbol, count } = state {
            runs.push(Run { count, symbol });
        }

        Self { runs, max_count }
    }

    /// Append a run, failing if `count` doesn't fit the sequence's width
    pub fn push(&mut self, count: usize, symbol: S) -> Result<()> {
        let count = u8::try_from(count)
            .ok()
            .filter(|count| *count <= self.max_count)
            .ok_or(Error::CountOverflow {
                count,
                max: self.max_count,
            })?;

        self.runs.push(Run { count, symbol });

        Ok(())
    }

    /// Symbols of every run, in order
    pub fn expand(&self) -> impl Iterator<Item = S> + '_ {
        self.runs.iter().flat_map(Run::expand)
    }

    /// Number of symbols [`Self::expand`] yields
    pub fn expanded_len(&self) -> usize {
        self.runs.iter().map(|run| usize::from(run.count)).sum()
    }

    pub fn runs(&self) -> &[Run<S>] {
        &self.runs
    }

    pub fn max_count(&self) -> u8 {
        self.max_count
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl<S> IntoIterator for RunSequence<S> {
    type Item = Run<S>;
    type IntoIter = vec::IntoIter<Run<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.into_iter()
    }
}

impl<'a, S> IntoIterator for &'a RunSequence<S> {
    type Item = &'a Run<S>;
    type IntoIter = slice::Iter<'a, Run<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}
