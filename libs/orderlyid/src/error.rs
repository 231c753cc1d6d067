//! Error types for ID generation, parsing, and validation.

use thiserror::Error;

/// Errors that can occur when generating, parsing, or validating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty (or only whitespace).
    #[error("ID cannot be empty")]
    Empty,

    /// The prefix does not match `[a-z][a-z0-9]{1,30}`.
    #[error("invalid ID prefix: '{prefix}'")]
    InvalidPrefix { prefix: String },

    /// A typed ID received a well-formed ID carrying another prefix.
    #[error("ID prefix mismatch: expected '{expected}', got '{actual}'")]
    PrefixMismatch {
        expected: &'static str,
        actual: String,
    },

    /// The ID is missing the underscore separator (or has an empty prefix).
    #[error("ID missing underscore separator")]
    MissingSeparator,

    /// The payload is not exactly 32 characters.
    #[error("payload must be 32 characters, got {len}")]
    BadPayloadLength { len: usize },

    /// A payload character is outside the decode alphabet.
    #[error("invalid base32 symbol {symbol:?} at position {position}")]
    InvalidSymbol { position: usize, symbol: char },

    /// The checksum suffix is not exactly 4 characters.
    #[error("checksum must be 4 characters, got {len}")]
    BadChecksumLength { len: usize },

    /// The checksum is present but does not verify.
    #[error("checksum mismatch: expected '{expected}', got '{actual}'")]
    ChecksumMismatch { expected: String, actual: String },

    /// Secure randomness could not be obtained.
    #[error("entropy source failure: {0}")]
    EntropySourceFailure(String),

    /// A construction input is malformed (e.g. non-hex random field).
    #[error("invalid ID format: {message}")]
    InvalidFormat { message: String },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty)
    }

    /// Returns true if this error indicates a prefix problem.
    pub fn is_prefix_error(&self) -> bool {
        matches!(
            self,
            IdError::InvalidPrefix { .. } | IdError::PrefixMismatch { .. }
        )
    }

    /// Returns true if this error reflects a caller contract violation at
    /// generation time rather than untrusted input.
    ///
    /// Only an invalid prefix qualifies; callers usually treat it as fatal.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, IdError::InvalidPrefix { .. })
    }

    /// Returns true if this error is a checksum failure.
    pub fn is_checksum_error(&self) -> bool {
        matches!(
            self,
            IdError::BadChecksumLength { .. } | IdError::ChecksumMismatch { .. }
        )
    }

    /// Returns true if this error can be produced by parsing a string.
    pub fn is_parse_error(&self) -> bool {
        !matches!(
            self,
            IdError::EntropySourceFailure(_) | IdError::InvalidFormat { .. }
        )
    }
}
