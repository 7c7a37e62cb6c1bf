mod byte;
mod digit;
pub mod run;

pub use byte::ByteRunCodec;
pub use digit::DigitRunCodec;
pub use run::{Run, RunSequence};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("symbol {0:?} doesn't fit in a single UTF-16 code unit")]
    Encoding(char),
    #[error("unpaired surrogate: {0:#06x}")]
    UnpairedSurrogate(u16),
    #[error("truncated stream: length {len} is not a multiple of {width}")]
    TruncatedStream { len: usize, width: usize },
    #[error("invalid digit: {0:?}")]
    InvalidDigit(char),
    #[error("count {count} over maximum of {max}")]
    CountOverflow { count: usize, max: u8 },
}

pub type Result<T> = std::result::Result<T, Error>;
