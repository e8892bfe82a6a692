//! Error types for the Enigma library.

use thiserror::Error;

/// Errors produced by the Enigma library.
///
/// Every failure is deterministic: the same invalid input always fails with
/// the same variant, so none of these are retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnigmaError {
    /// A symbol lookup found no such symbol in the alphabet.
    #[error("character '{0}' is not in the alphabet")]
    NotInAlphabet(char),

    /// An index lookup fell outside `[0, size)`.
    #[error("index {index} is out of range for an alphabet of {size} symbols")]
    OutOfRange { index: usize, size: usize },

    /// The alphabet names the same symbol twice.
    #[error("duplicate character '{0}' in alphabet")]
    DuplicateSymbol(char),

    /// The alphabet has no symbols at all.
    #[error("alphabet must contain at least one character")]
    EmptyAlphabet,

    /// A cycle-notation string is malformed or references a foreign symbol.
    #[error("invalid cycle: {0}")]
    InvalidCycle(String),

    /// A rotor-setting or ring-setting string has the wrong length.
    #[error("setting must have {expected} characters, got {actual}")]
    BadLength { expected: usize, actual: usize },

    /// Two rotor slots (or two pool entries) share a name.
    #[error("duplicate rotor name: {0}")]
    DuplicateRotor(String),

    /// A requested rotor is missing from the available pool.
    #[error("unknown rotor: {0}")]
    UnknownRotor(String),

    /// Structural violation of the machine, configuration file or settings line.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;

impl From<std::io::Error> for EnigmaError {
    fn from(err: std::io::Error) -> Self {
        EnigmaError::Io(err.to_string())
    }
}

impl EnigmaError {
    /// Shorthand for [`EnigmaError::InvalidConfiguration`].
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        EnigmaError::InvalidConfiguration(reason.into())
    }

    /// Shorthand for [`EnigmaError::InvalidCycle`].
    pub(crate) fn cycle(reason: impl Into<String>) -> Self {
        EnigmaError::InvalidCycle(reason.into())
    }
}
