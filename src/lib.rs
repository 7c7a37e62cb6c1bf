use std::str;

pub mod fixture;
mod mode;

pub use fixture::Fixture;
pub use mode::{Direction, Mode};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] runlength::Error),

    #[error("unable to parse as UTF-8: {0}")]
    InvalidUTF8Format(#[from] str::Utf8Error),
    #[error("notation length {0} is not a multiple of 4")]
    NotationLength(usize),
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("mismatch: expected {expected:?}, got {actual:?}")]
    Mismatch { expected: Vec<u8>, actual: Vec<u8> },
}

pub type Result<T> = std::result::Result<T, Error>;
