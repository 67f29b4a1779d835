use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::str::Utf8Error;

#[derive(Debug)]
pub enum BandAlignError {
    /// One of the input sequences has no symbols
    EmptySequence { which: &'static str },

    /// A sequence contains a symbol the score table does not know about
    UnsupportedSymbol { symbol: u8, position: usize },

    /// A score lookup used a symbol outside the score table's alphabet
    UnknownSymbol(u8),

    /// The score table is malformed (not square, not symmetric, ...)
    InvalidScoreTable(String),

    /// A fixed band is too narrow to reach the end cell of the DP matrix
    BandTooNarrow { band: usize, required: usize },

    /// The input did not provide two sequences to align
    MissingSequences { found: usize },

    /// A declared sequence length is not a positive integer
    InvalidLength(String),

    /// The declared length of a sequence does not match what was read
    LengthMismatch { declared: usize, actual: usize },

    /// Could not parse a score table or configuration file
    ParseError { source: serde_json::Error },

    /// Sequence names or contents are not valid UTF-8
    Utf8Error(Utf8Error),

    /// Other IO errors
    IOError(io::Error),
}

impl Error for BandAlignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            Self::ParseError { ref source } => Some(source),
            Self::Utf8Error(ref source) => Some(source),
            Self::IOError(ref source) => Some(source),
            _ => None
        }
    }
}

impl From<io::Error> for BandAlignError {
    fn from(value: io::Error) -> Self {
        Self::IOError(value)
    }
}

impl From<serde_json::Error> for BandAlignError {
    fn from(value: serde_json::Error) -> Self {
        Self::ParseError {
            source: value
        }
    }
}

impl From<Utf8Error> for BandAlignError {
    fn from(value: Utf8Error) -> Self {
        Self::Utf8Error(value)
    }
}

impl Display for BandAlignError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::EmptySequence { which } =>
                write!(f, "The {which} sequence is empty, the length of a sequence must be > 0!"),
            Self::UnsupportedSymbol { symbol, position } =>
                write!(f, "Unsupported symbol '{}' at position {position}!", symbol.escape_ascii()),
            Self::UnknownSymbol(symbol) =>
                write!(f, "Symbol '{}' is not part of the score table's alphabet!", symbol.escape_ascii()),
            Self::InvalidScoreTable(ref reason) =>
                write!(f, "Invalid score table: {reason}"),
            Self::BandTooNarrow { band, required } =>
                write!(f, "Band {band} is too narrow, the sequence lengths require at least {required}!"),
            Self::MissingSequences { found } =>
                write!(f, "Expected two sequences to align, but found {found}!"),
            Self::InvalidLength(ref input) =>
                write!(f, "Invalid sequence length '{input}', the length of a sequence must be > 0!"),
            Self::LengthMismatch { declared, actual } =>
                write!(f, "Declared sequence length ({declared}) does not match the sequence read ({actual})!"),
            Self::ParseError { source: _ } =>
                write!(f, "Could not parse the score table!"),
            Self::Utf8Error(ref err) =>
                err.fmt(f),
            Self::IOError(ref err) =>
                err.fmt(f),
        }
    }
}
