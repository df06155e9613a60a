//! Wire markers and decoding limits.
//!
//! The markers are fixed by [BEP-3]. The limits are only applied when a caller
//! opts in through [`DecodeOptions::untrusted`](crate::bencode::DecodeOptions::untrusted);
//! the default decoder bounds nothing beyond "the declared length is present".
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

// ============================================================================
// Markers
// ============================================================================

/// Opens an integer (`i42e`)
pub const INTEGER_START: u8 = b'i';

/// Opens a list (`l...e`)
pub const LIST_START: u8 = b'l';

/// Opens a dictionary (`d...e`)
pub const DICT_START: u8 = b'd';

/// Closes integers, lists and dictionaries
pub const END: u8 = b'e';

/// Separates a byte string's length prefix from its content
pub const LENGTH_SEPARATOR: u8 = b':';

// ============================================================================
// Untrusted input limits
// ============================================================================

/// Maximum container nesting for untrusted input.
/// Same bound the rbit decoder has always used for peer and tracker messages.
pub const UNTRUSTED_MAX_DEPTH: usize = 64;

/// Maximum declared byte string length for untrusted input (64 MiB).
/// Large enough for the `pieces` field of multi-terabyte torrents.
pub const UNTRUSTED_MAX_STRING_LEN: usize = 64 * 1024 * 1024;

/// Maximum integer literal length (sign included) for untrusted input
pub const UNTRUSTED_MAX_INTEGER_DIGITS: usize = 4096;

// ============================================================================
// Diagnostics
// ============================================================================

/// Number of input bytes quoted in error messages before truncation
pub const ERROR_PREVIEW_LEN: usize = 32;
