use std::{
    error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The crate's error type.
///
/// Numeric operations never fail, only naming a parameter or loading a
/// configuration can.
#[derive(Debug)]
pub enum Error {
    /// The given id does not name any weight or bias of the network.
    UnknownParam(String),
    /// The given name does not match any built-in preset.
    UnknownPreset(String),
    /// A weight matrix or bias vector has the wrong number of entries.
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "weights1 rows").
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A configuration document could not be parsed.
    Config(serde_json::Error),
    /// A configuration file could not be read.
    Io(io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownParam(id) => write!(f, "'{id}' is not a weight or bias of the network"),
            Error::UnknownPreset(name) => write!(
                f,
                "unknown preset '{name}', expected one of xor_gate, linear_toy, sigmoid_toy"
            ),
            Error::ShapeMismatch { what, got, expected } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            Error::Config(e) => write!(f, "invalid config: {e}"),
            Error::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
