//! Hand written notation for codec fixtures
//!
//! Byte mode streams are written as a zero padded three digits amount
//! followed by the character: `"003A255B"` is three `A` then 255 `B`.
//! Digit mode streams are already text, they are only split in pairs.

use std::{fmt::Write, str};

use bytes::{Buf, Bytes, BytesMut};
use runlength::{ByteRunCodec, DigitRunCodec, RunSequence};
use tracing::{debug, trace};

use crate::{Direction, Error, Mode, Result};

/// Characters per run in the byte notation
pub const NOTATION_WIDTH: usize = 4;
const AMOUNT_WIDTH: usize = 3;

/// Parse the byte notation into an encoded byte stream
pub fn parse_byte_notation(notation: &str) -> Result<Bytes> {
    let chars = notation.chars().collect::<Vec<_>>();
    if chars.len() % NOTATION_WIDTH != 0 {
        return Err(Error::NotationLength(chars.len()));
    }

    let mut runs = RunSequence::new(ByteRunCodec::MAX_COUNT);
    for group in chars.chunks_exact(NOTATION_WIDTH) {
        let (amount, symbol) = group.split_at(AMOUNT_WIDTH);

        let amount = amount.iter().collect::<String>();
        let count = match amount.parse::<usize>() {
            Ok(count) if amount.bytes().all(|b| b.is_ascii_digit()) => count,
            _ => return Err(Error::InvalidAmount(amount)),
        };

        let symbol = symbol[0];
        let unit = u16::try_from(u32::from(symbol))
            .map_err(|_| runlength::Error::Encoding(symbol))?;

        runs.push(count, unit)?;
    }
    trace!(runs = runs.len(), "notation parsed");

    let mut ret = BytesMut::with_capacity(runs.len() * ByteRunCodec::GROUP_WIDTH);
    ByteRunCodec::write_runs(&runs, &mut ret);

    Ok(ret.freeze())
}

/// Render an encoded byte stream in the byte notation
pub fn format_byte_notation(input: impl Buf) -> Result<String> {
    let runs = ByteRunCodec::runs(input)?;

    let mut ret = String::with_capacity(runs.len() * NOTATION_WIDTH);
    for run in &runs {
        let symbol = char::from_u32(run.symbol().into())
            .ok_or(runlength::Error::UnpairedSurrogate(run.symbol()))?;
        // writing to a String can't fail
        let _ = write!(ret, "{:03}{}", run.count(), symbol);
    }

    Ok(ret)
}

/// Split a digit mode stream in its two characters pairs
pub fn split_pairs(text: &str) -> Result<Vec<String>> {
    let chars = text.chars().collect::<Vec<_>>();
    if chars.len() % DigitRunCodec::GROUP_WIDTH != 0 {
        return Err(runlength::Error::TruncatedStream {
            len: chars.len(),
            width: DigitRunCodec::GROUP_WIDTH,
        }
        .into());
    }

    Ok(chars
        .chunks_exact(DigitRunCodec::GROUP_WIDTH)
        .map(|pair| pair.iter().collect())
        .collect())
}

fn run_codec(mode: Mode, direction: Direction, input: &[u8]) -> Result<Vec<u8>> {
    Ok(match direction {
        Direction::Encode => mode.encode(str::from_utf8(input)?)?,
        Direction::Decode => mode.decode(input)?.into_bytes(),
    })
}

/// A codec input along with the output it is expected to produce
///
/// Text is stored as UTF-8, byte mode streams as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub mode: Mode,
    pub direction: Direction,
    pub input: Vec<u8>,
    pub expected_output: Vec<u8>,
}

impl Fixture {
    /// Build from hand written values
    ///
    /// The encoded side of a byte mode fixture is read with
    /// [`parse_byte_notation`], every other value is taken as is.
    pub fn from_notation(
        mode: Mode,
        direction: Direction,
        input: &str,
        expected_output: &str,
    ) -> Result<Self> {
        let read = |text: &str, encoded: bool| -> Result<Vec<u8>> {
            match (mode, encoded) {
                (Mode::Byte, true) => Ok(parse_byte_notation(text)?.to_vec()),
                _ => Ok(text.as_bytes().to_vec()),
            }
        };

        let (input, expected_output) = match direction {
            Direction::Encode => (read(input, false)?, read(expected_output, true)?),
            Direction::Decode => (read(input, true)?, read(expected_output, false)?),
        };

        Ok(Self {
            mode,
            direction,
            input,
            expected_output,
        })
    }

    /// Fixture whose expected output is whatever the codec produces now
    pub fn generate(mode: Mode, direction: Direction, input: Vec<u8>) -> Result<Self> {
        let expected_output = run_codec(mode, direction, &input)?;

        Ok(Self {
            mode,
            direction,
            input,
            expected_output,
        })
    }

    /// Run the codec on the input and compare with the expected output
    pub fn verify(&self) -> Result<()> {
        let actual = run_codec(self.mode, self.direction, &self.input)?;
        if actual != self.expected_output {
            return Err(Error::Mismatch {
                expected: self.expected_output.clone(),
                actual,
            });
        }
        debug!(mode = %self.mode, direction = %self.direction, "fixture verified");

        Ok(())
    }
}
