//! Error types for command argument encoding and decoding

use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Broad classification of a [`CodecError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A textual value could not be turned into bits
    Encode,
    /// A bit string could not be turned into a textual value
    Decode,
    /// The argument definition itself is unusable
    Configuration,
}

/// Error types encountered while translating command arguments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A textual value could not be converted into a bit pattern
    #[error("Cannot encode argument {argument}: {reason}")]
    Encode { argument: String, reason: String },

    /// A bit string could not be converted into a textual value
    #[error("Cannot decode argument {argument}: {reason}")]
    Decode { argument: String, reason: String },

    /// A sub-argument of a repeat argument failed
    #[error("Repeat argument {argument} failed: {source}")]
    Repeat {
        argument: String,
        #[source]
        source: Box<CodecError>,
    },

    /// Bit string contains something other than '0' and '1'
    #[error("Invalid bit string: {0}")]
    InvalidBitString(String),

    /// Cursor ran out of bits
    #[error("Insufficient bits: requested {requested}, available {available}")]
    InsufficientBits { requested: usize, available: usize },

    /// Dictionary or caller bug; aborts the surrounding command build
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CodecError {
    /// Create a new Encode error for the named argument
    pub fn encode(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::Encode {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Create a new Decode error for the named argument
    pub fn decode(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::Decode {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a sub-argument failure in the outer repeat argument
    pub fn repeat(argument: impl Into<String>, source: CodecError) -> Self {
        CodecError::Repeat {
            argument: argument.into(),
            source: Box::new(source),
        }
    }

    /// Create a new InvalidBitString error
    pub fn invalid_bits(msg: impl Into<String>) -> Self {
        CodecError::InvalidBitString(msg.into())
    }

    /// Create a new Configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        CodecError::Configuration(msg.into())
    }

    /// Classify the error; repeat errors report the kind of their cause
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Encode { .. } => ErrorKind::Encode,
            CodecError::Decode { .. }
            | CodecError::InvalidBitString(_)
            | CodecError::InsufficientBits { .. } => ErrorKind::Decode,
            CodecError::Repeat { source, .. } => source.kind(),
            CodecError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Configuration errors must not be retried per argument
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}
