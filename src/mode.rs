use std::str;

use runlength::{ByteRunCodec, DigitRunCodec};
use strum::{Display, EnumIter, EnumString};

use crate::Result;

/// Wire representation of the runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Count byte then little endian UTF-16 code unit
    Byte,
    /// Decimal digit then character
    Digit,
}

impl Mode {
    /// Encode text, digit mode yielding UTF-8
    pub fn encode(&self, input: &str) -> runlength::Result<Vec<u8>> {
        Ok(match self {
            Self::Byte => ByteRunCodec::encode(input)?.to_vec(),
            Self::Digit => DigitRunCodec::encode(input).into_bytes(),
        })
    }

    /// Decode a stream, digit mode expecting UTF-8
    pub fn decode(&self, input: &[u8]) -> Result<String> {
        Ok(match self {
            Self::Byte => ByteRunCodec::decode(input)?,
            Self::Digit => DigitRunCodec::decode(str::from_utf8(input)?)?,
        })
    }
}

/// Which way a fixture runs the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Encode,
    Decode,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::Error;

    #[test]
    fn parse_and_display() {
        for mode in Mode::iter() {
            assert_eq!(Mode::from_str(&mode.to_string()).unwrap(), mode);
        }
        assert_eq!("digit".parse::<Mode>().unwrap(), Mode::Digit);
        assert_eq!(Direction::Decode.to_string(), "decode");
        assert!("nibble".parse::<Mode>().is_err());
    }

    #[test]
    fn dispatch() {
        assert_eq!(Mode::Byte.encode("AAABB").unwrap(), [3, 65, 0, 2, 66, 0]);
        assert_eq!(Mode::Digit.encode("AAABB").unwrap(), b"3A2B");
        assert_eq!(Mode::Byte.decode(&[3, 65, 0, 2, 66, 0]).unwrap(), "AAABB");
        assert_eq!(Mode::Digit.decode(b"3A2B").unwrap(), "AAABB");
    }

    #[test]
    fn digit_needs_utf8() {
        assert!(matches!(
            Mode::Digit.decode(&[b'1', 0xFF]),
            Err(Error::InvalidUTF8Format(_))
        ));
    }

    #[test]
    fn codec_errors() {
        assert!(matches!(
            Mode::Digit.decode(b"XA"),
            Err(Error::Codec(runlength::Error::InvalidDigit('X')))
        ));
        assert_eq!(
            Mode::Byte.encode("\u{1F600}"),
            Err(runlength::Error::Encoding('\u{1F600}'))
        );
    }
}
