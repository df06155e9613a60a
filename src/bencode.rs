//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses.
//!
//! # Data Types
//!
//! Bencode supports four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! Each type has its own codec ([`ByteStringCodec`], [`IntegerCodec`],
//! [`ListCodec`], [`DictionaryCodec`]) implementing the [`Decoder`] and
//! [`Encoder`] traits. The functions in this module try the codecs in that
//! order and use the first one that matches.
//!
//! # Examples
//!
//! ## Decoding bencode data
//!
//! [`decode`] matches one value at the start of the input and reports how many
//! bytes it used, so several values can be read back to back:
//!
//! ```
//! use rbit_bencode::bencode::{decode, Value};
//!
//! let parsed = decode(b"4:spami42e").unwrap();
//! assert_eq!(parsed.value.as_str(), Some("spam"));
//! assert_eq!(parsed.consumed, 6);
//!
//! let next = decode(&b"4:spami42e"[parsed.consumed..]).unwrap();
//! assert_eq!(next.value.as_i64(), Some(42));
//! ```
//!
//! [`decode_all`] requires the input to hold exactly one value:
//!
//! ```
//! use rbit_bencode::bencode::decode_all;
//!
//! let value = decode_all(b"d3:foo3:bare").unwrap();
//! assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
//!
//! assert!(decode_all(b"i42eextra").is_err());
//! ```
//!
//! ## Encoding bencode data
//!
//! ```
//! use rbit_bencode::bencode::{encode, Value};
//! use bytes::Bytes;
//! use std::collections::BTreeMap;
//!
//! assert_eq!(encode(&Value::from(42)).unwrap(), b"i42e");
//! assert_eq!(encode(&Value::string("hello")).unwrap(), b"5:hello");
//!
//! let list = Value::List(vec![Value::from(1), Value::from(2)]);
//! assert_eq!(encode(&list).unwrap(), b"li1ei2ee");
//!
//! let mut dict = BTreeMap::new();
//! dict.insert(Bytes::from_static(b"key"), Value::string("value"));
//! assert_eq!(encode(&Value::Dict(dict)).unwrap(), b"d3:key5:valuee");
//! ```
//!
//! ## Untrusted input
//!
//! By default nothing is bounded except that declared lengths must be present.
//! Use [`DecodeOptions::untrusted`] for data received from peers or trackers:
//!
//! ```
//! use rbit_bencode::bencode::{decode_with, DecodeOptions};
//!
//! let options = DecodeOptions::untrusted();
//! let parsed = decode_with(b"d8:intervali1800ee", &options).unwrap();
//! assert_eq!(parsed.value.get(b"interval").and_then(|v| v.as_i64()), Some(1800));
//! ```
//!
//! # Error Handling
//!
//! - [`BencodeError::MalformedLength`] - Bad byte string length prefix
//! - [`BencodeError::TruncatedInput`] - Declared length runs past the input
//! - [`BencodeError::InvalidNumberLiteral`] - Malformed integer (e.g., leading zeros, `-0`)
//! - [`BencodeError::UnterminatedContainer`] - List or dictionary not closed where the scan stopped
//! - [`BencodeError::OutOfOrderKey`] - Dictionary keys not in ascending order
//! - [`BencodeError::UnencodableValue`] - Encoder given a kind it does not handle
//!
//! # Greedy matching
//!
//! Lists and dictionaries take the first match at each position and never
//! backtrack. Every canonical encoding decodes correctly this way. Inputs that
//! would only parse if an earlier byte string were split differently are rejected.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod byte_string;
mod codec;
mod dictionary;
mod error;
mod integer;
mod list;
mod options;
mod value;

pub use byte_string::ByteStringCodec;
pub use codec::{DecodeContext, Decoder, EncodeOutcome, Encoder, ParseOutcome, Parsed};
pub use dictionary::DictionaryCodec;
pub use error::BencodeError;
pub use integer::IntegerCodec;
pub use list::ListCodec;
pub use options::{DecodeOptions, DuplicateKeys};
pub use value::{Kind, Value};

use codec::{decode_any, emit_any, encodable};
use std::io::Write;
use tracing::debug;

/// Decodes the value at the start of `data` with default options.
///
/// Bytes after the value are ignored; [`Parsed::consumed`] says where it ended.
///
/// # Examples
///
/// ```
/// use rbit_bencode::bencode::{decode, BencodeError};
///
/// let parsed = decode(b"de1234").unwrap();
/// assert_eq!(parsed.consumed, 2);
///
/// assert!(matches!(decode(b"i042e"), Err(BencodeError::InvalidNumberLiteral { .. })));
/// ```
pub fn decode(data: &[u8]) -> ParseOutcome {
    decode_with(data, &DecodeOptions::default())
}

/// Decodes the value at the start of `data` under `options`.
pub fn decode_with(data: &[u8], options: &DecodeOptions) -> ParseOutcome {
    let result = decode_any(data, &DecodeContext::new(options));
    if let Err(e) = &result {
        debug!("bencode decode failed: {}", e);
    }
    result
}

/// Decodes `data`, which must hold exactly one value.
///
/// # Errors
///
/// Returns [`BencodeError::TrailingData`] if bytes remain after the value, or
/// whatever error decoding the value produced.
pub fn decode_all(data: &[u8]) -> Result<Value, BencodeError> {
    decode_all_with(data, &DecodeOptions::default())
}

/// Like [`decode_all`], under `options`.
pub fn decode_all_with(data: &[u8], options: &DecodeOptions) -> Result<Value, BencodeError> {
    let Parsed { value, consumed } = decode_with(data, options)?;

    if consumed != data.len() {
        debug!(
            "rejecting {} trailing bytes after bencode value",
            data.len() - consumed
        );
        return Err(BencodeError::TrailingData {
            consumed,
            remaining: data.len() - consumed,
        });
    }

    Ok(value)
}

/// Reports whether some value can be decoded from the start of `data`.
pub fn is_decodable(data: &[u8]) -> bool {
    decode(data).is_ok()
}

/// Encodes a value to canonical bencode.
///
/// The output follows the canonical bencode format:
/// - Integers: `i<number>e`, minimal digits, no `+`, never `-0`
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`
/// - Dictionaries: `d<key><value>...e` (keys sorted lexicographically)
///
/// # Examples
///
/// ```
/// use rbit_bencode::bencode::{encode, Value};
/// use std::collections::HashMap;
///
/// let mut dict = HashMap::new();
/// dict.insert("b", Value::string("y"));
/// dict.insert("a", Value::string("x"));
/// assert_eq!(encode(&Value::from(dict)).unwrap(), b"d1:a1:x1:b1:ye");
/// ```
pub fn encode(value: &Value) -> EncodeOutcome {
    let mut buf = Vec::new();
    encode_into(value, &mut buf)?;
    Ok(buf)
}

/// Appends the encoding of `value` to `buf`. Nothing is appended on failure.
pub fn encode_into(value: &Value, buf: &mut Vec<u8>) -> Result<(), BencodeError> {
    if !encodable(value) {
        return Err(BencodeError::unencodable(value, value.kind()));
    }
    emit_any(value, buf)
}

/// Encodes a value and writes it to `writer` in one call.
///
/// # Errors
///
/// Returns [`BencodeError::Io`] if the writer fails.
pub fn encode_to<W: Write>(value: &Value, writer: &mut W) -> Result<(), BencodeError> {
    let buf = encode(value)?;
    writer.write_all(&buf)?;
    Ok(())
}

/// Reports whether some encoder accepts `value`.
pub fn can_encode(value: &Value) -> bool {
    encodable(value)
}

#[cfg(test)]
mod tests;
