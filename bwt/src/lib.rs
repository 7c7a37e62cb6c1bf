use std::cmp::Ordering;

use tracing::{trace, trace_span};

/// BEL, unlikely to be found in text
pub const DEFAULT_SENTINEL: char = '\u{7}';

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("input already contains sentinel {0:?}")]
    SentinelInInput(char),
    #[error("expected a single sentinel, found {0}")]
    SentinelCount(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Burrows-Wheeler transform, grouping equal characters ahead of run-length
/// encoding
///
/// The sentinel marks the end of the text and sorts before every other
/// character.
#[derive(Debug, Clone, Copy)]
pub struct BurrowsWheeler {
    sentinel: char,
}

impl BurrowsWheeler {
    pub fn new() -> Self {
        Self::with_sentinel(DEFAULT_SENTINEL)
    }

    pub fn with_sentinel(sentinel: char) -> Self {
        Self { sentinel }
    }

    pub fn sentinel(&self) -> char {
        self.sentinel
    }

    fn key(&self, c: char) -> (bool, char) {
        (c != self.sentinel, c)
    }

    fn compare_rotations(&self, text: &[char], a: usize, b: usize) -> Ordering {
        let len = text.len();
        (0..len)
            .map(|offset| {
                self.key(text[(a + offset) % len])
                    .cmp(&self.key(text[(b + offset) % len]))
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Last column of the sorted rotations of `input` followed by the sentinel
    pub fn transform(&self, input: &str) -> Result<String> {
        let _span_ = trace_span!("bwt transform", len = input.len()).entered();

        if input.contains(self.sentinel) {
            return Err(Error::SentinelInInput(self.sentinel));
        }

        let text = input
            .chars()
            .chain([self.sentinel])
            .collect::<Vec<_>>();
        let len = text.len();

        let mut rotations = (0..len).collect::<Vec<_>>();
        rotations.sort_by(|a, b| self.compare_rotations(&text, *a, *b));
        trace!(rotations = len, "sorted");

        Ok(rotations
            .into_iter()
            .map(|start| text[(start + len - 1) % len])
            .collect())
    }

    /// Rebuild the text from the last column of the sorted rotations
    pub fn inverse(&self, input: &str) -> Result<String> {
        let _span_ = trace_span!("bwt inverse", len = input.len()).entered();

        if input.is_empty() {
            return Ok(String::new());
        }

        let last = input.chars().collect::<Vec<_>>();

        let sentinels = last.iter().filter(|c| **c == self.sentinel).count();
        let mut row = match last.iter().position(|c| *c == self.sentinel) {
            Some(row) if sentinels == 1 => row,
            _ => return Err(Error::SentinelCount(sentinels)),
        };

        // n-th occurrence of a char in the first column is its n-th
        // occurrence in the last one
        let mut first_to_last = (0..last.len()).collect::<Vec<_>>();
        first_to_last.sort_by_key(|i| self.key(last[*i]));

        let mut ret = String::with_capacity(input.len());
        for _ in 1..last.len() {
            row = first_to_last[row];
            ret.push(last[row]);
        }
        trace!(len = ret.len(), "rebuilt");

        Ok(ret)
    }
}

impl Default for BurrowsWheeler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn banana() {
        let bwt = BurrowsWheeler::new();

        assert_eq!(bwt.transform("BANANA").unwrap(), "ANNB\u{7}AA");
        assert_eq!(bwt.inverse("ANNB\u{7}AA").unwrap(), "BANANA");
    }

    #[test]
    fn custom_sentinel() {
        let bwt = BurrowsWheeler::with_sentinel('$');

        assert_eq!(bwt.transform("banana").unwrap(), "annb$aa");
        assert_eq!(bwt.inverse("annb$aa").unwrap(), "banana");
    }

    #[test]
    fn empty() {
        let bwt = BurrowsWheeler::new();

        assert_eq!(bwt.transform("").unwrap(), "\u{7}");
        assert_eq!(bwt.inverse("\u{7}").unwrap(), "");
        assert_eq!(bwt.inverse("").unwrap(), "");
    }

    #[test]
    fn sentinel_in_input() {
        assert_eq!(
            BurrowsWheeler::with_sentinel('$').transform("a$b"),
            Err(Error::SentinelInInput('$'))
        );
    }

    #[test]
    fn sentinel_count() {
        let bwt = BurrowsWheeler::with_sentinel('$');

        assert_eq!(bwt.inverse("abc"), Err(Error::SentinelCount(0)));
        assert_eq!(bwt.inverse("a$b$"), Err(Error::SentinelCount(2)));
    }

    #[test]
    fn groups_repeated_chars() {
        let bwt = BurrowsWheeler::with_sentinel('$');

        assert_eq!(bwt.transform("abcabcabc").unwrap(), "ccc$aaabbb");
    }

    proptest! {
        #[test]
        fn roundtrip(data in "[^\u{7}]*") {
            let bwt = BurrowsWheeler::new();

            let transformed = bwt.transform(&data).unwrap();
            prop_assert_eq!(transformed.chars().count(), data.chars().count() + 1);
            prop_assert_eq!(bwt.inverse(&transformed).unwrap(), data);
        }
    }
}
