use std::num::NonZeroU8;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{trace, trace_span};

use crate::{run::RunSequence, Error, Result};

/// Run-length codec over UTF-16 code units
///
/// Each run is three bytes: the count, then the code unit in little endian.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteRunCodec;

fn to_unit(symbol: char) -> Result<u16> {
    u16::try_from(u32::from(symbol)).map_err(|_| Error::Encoding(symbol))
}

impl ByteRunCodec {
    pub const MAX_COUNT: u8 = u8::MAX;
    pub const GROUP_WIDTH: usize = 3;
    const RUN_CAP: NonZeroU8 = NonZeroU8::MAX;

    /// Encode text where every character fits in a single UTF-16 code unit
    pub fn encode(input: &str) -> Result<Bytes> {
        let mut ret = BytesMut::with_capacity(input.len() * Self::GROUP_WIDTH);
        Self::encode_on(input, &mut ret)?;
        Ok(ret.freeze())
    }

    /// Encode text and write result in given [`BufMut`]
    ///
    /// Nothing is written if a character is rejected.
    /// Panic if output hasn't enough space.
    pub fn encode_on(input: &str, output: &mut impl BufMut) -> Result<()> {
        let units = input.chars().map(to_unit).collect::<Result<Vec<_>>>()?;
        Self::encode_units_on(&units, output);
        Ok(())
    }

    /// Encode raw code units, lone surrogates included
    pub fn encode_units(units: &[u16]) -> Bytes {
        let mut ret = BytesMut::with_capacity(units.len() * Self::GROUP_WIDTH);
        Self::encode_units_on(units, &mut ret);
        ret.freeze()
    }

    /// Encode raw code units and write result in given [`BufMut`]
    ///
    /// Panic if output hasn't enough space.
    pub fn encode_units_on(units: &[u16], output: &mut impl BufMut) {
        let _span_ = trace_span!("byte encode", units = units.len()).entered();

        let runs = RunSequence::compact(units.iter().copied(), Self::RUN_CAP);
        trace!(runs = runs.len(), "compacted");

        Self::write_runs(&runs, output);
    }

    /// Serialize already built runs
    ///
    /// Panic if output hasn't enough space.
    pub fn write_runs(runs: &RunSequence<u16>, output: &mut impl BufMut) {
        for run in runs {
            output.put_u8(run.count());
            output.put_u16_le(run.symbol());
        }
    }

    /// Parse an encoded stream into its runs
    ///
    /// The whole stream is checked before anything is parsed so that a
    /// truncated stream never yields runs.
    pub fn runs(mut input: impl Buf) -> Result<RunSequence<u16>> {
        let len = input.remaining();
        if len % Self::GROUP_WIDTH != 0 {
            return Err(Error::TruncatedStream {
                len,
                width: Self::GROUP_WIDTH,
            });
        }

        let mut runs = RunSequence::new(Self::MAX_COUNT);
        while input.has_remaining() {
            let count = input.get_u8();
            let unit = input.get_u16_le();
            runs.push(count.into(), unit)?;
        }
        trace!(runs = runs.len(), "parsed");

        Ok(runs)
    }

    /// Decode into raw code units
    pub fn decode_units(input: impl Buf) -> Result<Vec<u16>> {
        let _span_ = trace_span!("byte decode units").entered();

        Ok(Self::runs(input)?.expand().collect())
    }

    /// Decode into text
    ///
    /// Surrogate pairs are joined even when split across two runs, a lone
    /// surrogate is rejected. Zero count runs are skipped before that check.
    pub fn decode(input: impl Buf) -> Result<String> {
        let _span_ = trace_span!("byte decode").entered();

        let runs = Self::runs(input)?;

        char::decode_utf16(runs.expand())
            .map(|symbol| symbol.map_err(|e| Error::UnpairedSurrogate(e.unpaired_surrogate())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::iter;

    use test_log::test;

    use super::*;

    fn test_encode_to(to_encode: &str, expected: &[u8]) {
        assert_eq!(ByteRunCodec::encode(to_encode).unwrap(), expected);
    }

    fn test_decode_to(to_decode: &[u8], expected: &str) {
        assert_eq!(ByteRunCodec::decode(to_decode).unwrap(), expected);
    }

    #[test]
    fn single_run() {
        test_encode_to("AAA", &[3, 0x41, 0x00]);
        test_decode_to(&[3, 0x41, 0x00], "AAA");
    }

    #[test]
    fn mixed() {
        test_encode_to("AAABB", &[3, 65, 0, 2, 66, 0]);
        test_decode_to(&[3, 65, 0, 2, 66, 0], "AAABB");
    }

    #[test]
    fn non_ascii() {
        test_encode_to("ééß", &[2, 0xE9, 0x00, 1, 0xDF, 0x00]);
        test_encode_to("\u{20AC}", &[1, 0xAC, 0x20]);
        test_decode_to(&[2, 0xAC, 0x20], "\u{20AC}\u{20AC}");
    }

    #[test]
    fn long_repeated() {
        let input = iter::repeat('A').take(300).collect::<String>();

        test_encode_to(&input, &[255, 0x41, 0x00, 45, 0x41, 0x00]);
        test_decode_to(&[255, 0x41, 0x00, 45, 0x41, 0x00], &input);
    }

    #[test]
    fn empty() {
        test_encode_to("", &[]);
        test_decode_to(&[], "");
    }

    #[test]
    fn zero_count() {
        test_decode_to(&[0, 0x41, 0x00], "");
        test_decode_to(&[1, 0x41, 0x00, 0, 0x42, 0x00, 1, 0x43, 0x00], "AC");
    }

    #[test]
    fn zero_count_surrogate() {
        test_decode_to(&[0, 0x00, 0xD8], "");
        test_decode_to(&[1, 0x41, 0, 0, 0x00, 0xD8, 1, 0x42, 0], "AB");
    }

    #[test]
    fn outside_bmp() {
        assert_eq!(
            ByteRunCodec::encode("ab\u{1F600}"),
            Err(Error::Encoding('\u{1F600}'))
        );
    }

    #[test]
    fn rejected_input_writes_nothing() {
        let mut output = Vec::new();

        assert!(ByteRunCodec::encode_on("aa\u{1F600}", &mut output).is_err());
        assert!(output.is_empty());
    }

    #[test]
    fn truncated() {
        assert_eq!(
            ByteRunCodec::decode(&[3u8, 0x41, 0x00, 1][..]),
            Err(Error::TruncatedStream { len: 4, width: 3 })
        );
        assert_eq!(
            ByteRunCodec::decode_units(&[3u8, 0x41][..]),
            Err(Error::TruncatedStream { len: 2, width: 3 })
        );
    }

    #[test]
    fn surrogate_pair_across_runs() {
        let encoded = [1u8, 0x3D, 0xD8, 1, 0x00, 0xDE];

        test_decode_to(&encoded, "\u{1F600}");
        assert_eq!(
            ByteRunCodec::decode_units(&encoded[..]).unwrap(),
            [0xD83D, 0xDE00]
        );
    }

    #[test]
    fn unpaired_surrogate() {
        assert_eq!(
            ByteRunCodec::decode(&[1u8, 0x00, 0xD8, 1, 0x41, 0x00][..]),
            Err(Error::UnpairedSurrogate(0xD800))
        );
        assert_eq!(
            ByteRunCodec::decode(&[2u8, 0x3D, 0xD8, 1, 0x00, 0xDE][..]),
            Err(Error::UnpairedSurrogate(0xD83D))
        );
        assert_eq!(
            ByteRunCodec::decode(&[1u8, 0x00, 0xDE][..]),
            Err(Error::UnpairedSurrogate(0xDE00))
        );
    }

    #[test]
    fn units_roundtrip() {
        let units = [0xD800, 0xD800, 0x0000, 0xFFFF];
        let encoded = ByteRunCodec::encode_units(&units);

        assert_eq!(&encoded[..], [2, 0x00, 0xD8, 1, 0x00, 0x00, 1, 0xFF, 0xFF]);
        assert_eq!(ByteRunCodec::decode_units(encoded).unwrap(), units);
    }

    #[test]
    fn runs() {
        let runs = ByteRunCodec::runs(&[4u8, 0x61, 0x00, 0, 0x62, 0x00][..]).unwrap();

        assert_eq!(runs.len(), 2);
        assert_eq!(runs.max_count(), ByteRunCodec::MAX_COUNT);
        assert_eq!(runs.runs()[0].count(), 4);
        assert_eq!(runs.runs()[1].symbol(), 0x62);
    }
}
