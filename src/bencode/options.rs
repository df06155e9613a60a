use crate::constants::{
    UNTRUSTED_MAX_DEPTH, UNTRUSTED_MAX_INTEGER_DIGITS, UNTRUSTED_MAX_STRING_LEN,
};

/// What the dictionary decoder does when a key equals the key before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Fail with [`BencodeError::DuplicateKey`](super::BencodeError::DuplicateKey).
    /// Canonical bencode never repeats a key.
    #[default]
    Reject,
    /// Keep the later value, dropping the earlier one.
    LastWins,
}

/// Limits and policies applied while decoding.
///
/// The default applies no limits: the decoder only checks that a declared
/// length is actually present in the input. Anything that decodes data from
/// the network should use [`DecodeOptions::untrusted`] or set its own bounds.
///
/// # Examples
///
/// ```
/// use rbit_bencode::bencode::{decode_with, BencodeError, DecodeOptions};
///
/// let options = DecodeOptions::default().with_max_depth(1);
/// assert!(decode_with(b"li1ee", &options).is_ok());
/// assert!(matches!(
///     decode_with(b"llee", &options),
///     Err(BencodeError::NestingTooDeep { limit: 1 })
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Maximum number of nested containers.
    pub max_depth: Option<usize>,
    /// Maximum declared byte string length.
    pub max_string_len: Option<usize>,
    /// Maximum integer literal length between `i` and `e`, sign included.
    pub max_integer_digits: Option<usize>,
    /// Duplicate dictionary key policy.
    pub duplicate_keys: DuplicateKeys,
}

impl DecodeOptions {
    /// Bounds suitable for tracker responses, peer messages and `.torrent` files
    /// from unknown sources.
    pub fn untrusted() -> Self {
        Self {
            max_depth: Some(UNTRUSTED_MAX_DEPTH),
            max_string_len: Some(UNTRUSTED_MAX_STRING_LEN),
            max_integer_digits: Some(UNTRUSTED_MAX_INTEGER_DIGITS),
            duplicate_keys: DuplicateKeys::Reject,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_string_len(mut self, len: usize) -> Self {
        self.max_string_len = Some(len);
        self
    }

    pub fn with_max_integer_digits(mut self, digits: usize) -> Self {
        self.max_integer_digits = Some(digits);
        self
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }
}
