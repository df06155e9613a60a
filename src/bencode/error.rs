use thiserror::Error;

use super::value::{Kind, Value};
use crate::constants::ERROR_PREVIEW_LEN;

/// Errors produced while decoding or encoding bencode.
///
/// Every variant carries an escaped, truncated preview of the input (or value)
/// that was rejected, so the message is useful without the original buffer.
#[derive(Debug, Error)]
pub enum BencodeError {
    /// Input ended where a value was expected.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// No decoder recognizes the first byte.
    #[error("unrecognized input at {input}")]
    UnrecognizedInput { input: String },

    /// Byte string length prefix is missing, signed, non-numeric or has leading zeros.
    #[error("malformed byte string length in {input}: {reason}")]
    MalformedLength { input: String, reason: &'static str },

    /// Declared byte string length exceeds the remaining input.
    #[error("truncated input {input}: declared {declared} bytes, {available} available")]
    TruncatedInput {
        input: String,
        declared: String,
        available: usize,
    },

    /// Integer body violates the canonical literal rules or has no terminator.
    #[error("invalid number literal in {input}: {reason}")]
    InvalidNumberLiteral { input: String, reason: &'static str },

    /// List or dictionary has no closing marker where the item scan stopped.
    #[error("unterminated {kind} in {input}")]
    UnterminatedContainer {
        kind: Kind,
        input: String,
        #[source]
        cause: Option<Box<BencodeError>>,
    },

    /// Dictionary key compares less than the key before it.
    #[error("dictionary key {key} is out of order after {previous}")]
    OutOfOrderKey { previous: String, key: String },

    /// Dictionary key repeats the key before it.
    #[error("duplicate dictionary key {key}")]
    DuplicateKey { key: String },

    /// Encoder asked to produce a kind it does not handle.
    #[error("cannot encode {value} as {target}")]
    UnencodableValue { value: String, target: Kind },

    /// Bytes remain after a complete value.
    #[error("trailing data after value: {remaining} bytes after offset {consumed}")]
    TrailingData { consumed: usize, remaining: usize },

    /// Container nesting exceeds the configured limit.
    #[error("nesting too deep: limit is {limit}")]
    NestingTooDeep { limit: usize },

    /// Declared length exceeds the configured limit.
    #[error("{kind} length {length} exceeds limit of {limit}")]
    LengthLimitExceeded {
        kind: Kind,
        length: usize,
        limit: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BencodeError {
    /// Returns true for errors raised by a caller-imposed limit.
    ///
    /// Limit errors abort the whole decode; grammar errors only stop the
    /// enclosing container's scan.
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            BencodeError::NestingTooDeep { .. } | BencodeError::LengthLimitExceeded { .. }
        )
    }

    pub(crate) fn unrecognized(input: &[u8]) -> Self {
        BencodeError::UnrecognizedInput {
            input: preview(input),
        }
    }

    pub(crate) fn malformed_length(input: &[u8], reason: &'static str) -> Self {
        BencodeError::MalformedLength {
            input: preview(input),
            reason,
        }
    }

    pub(crate) fn invalid_number(input: &[u8], reason: &'static str) -> Self {
        BencodeError::InvalidNumberLiteral {
            input: preview(input),
            reason,
        }
    }

    pub(crate) fn unterminated(kind: Kind, input: &[u8], cause: BencodeError) -> Self {
        BencodeError::UnterminatedContainer {
            kind,
            input: preview(input),
            cause: Some(Box::new(cause)),
        }
    }

    pub(crate) fn unencodable(value: &Value, target: Kind) -> Self {
        let mut value = value.to_string();
        if value.len() > ERROR_PREVIEW_LEN {
            let mut cut = ERROR_PREVIEW_LEN;
            while !value.is_char_boundary(cut) {
                cut -= 1;
            }
            value.truncate(cut);
            value.push_str("...");
        }
        BencodeError::UnencodableValue { value, target }
    }
}

/// Quotes at most [`ERROR_PREVIEW_LEN`] bytes of `input`, ASCII-escaped.
pub(crate) fn preview(input: &[u8]) -> String {
    if input.len() > ERROR_PREVIEW_LEN {
        format!("\"{}\"...", input[..ERROR_PREVIEW_LEN].escape_ascii())
    } else {
        format!("\"{}\"", input.escape_ascii())
    }
}
