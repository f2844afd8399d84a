#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "invalid layout: {exponent_bits} exponent bits and {mantissa_bits} mantissa bits do not fit {total_bits} total bits"
    )]
    InvalidLayout {
        total_bits: u32,
        exponent_bits: u32,
        mantissa_bits: u32,
    },

    #[error("unknown format key: {0}")]
    UnknownFormat(String),

    #[error("invalid pattern length: expected {expected} bytes, got {actual} bytes")]
    InvalidLength { expected: usize, actual: usize },

    #[error("bit pattern does not fit in {total_bits} bits")]
    PatternTooWide { total_bits: u32 },

    #[error("refusing to enumerate all patterns of a {total_bits}-bit format")]
    TooManyPatterns { total_bits: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for String {
    fn from(err: Error) -> Self { err.to_string() }
}
