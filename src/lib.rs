//! rbit-bencode - Strict bencode codec for BitTorrent
//!
//! Decodes and encodes the bencode format from [BEP-3], the serialization used
//! by `.torrent` files, tracker responses, DHT messages and the extension
//! protocol. Decoding is strict, so non-canonical input (leading zeros, `-0`,
//! unsorted dictionary keys) is rejected. Encoding always produces the
//! canonical form.
//!
//! # Modules
//!
//! - [`bencode`] - Value model, codecs and top-level encode/decode functions
//! - [`constants`] - Wire markers and untrusted input limits
//!
//! # Example
//!
//! ```
//! use rbit_bencode::{decode_all, encode};
//!
//! let data = b"d8:announce15:http://test.com4:infod4:name4:testee";
//! let value = decode_all(data).unwrap();
//! assert_eq!(encode(&value).unwrap(), data);
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

pub mod bencode;
pub mod constants;

pub use bencode::{
    decode, decode_all, decode_with, encode, BencodeError, DecodeOptions, Decoder, Encoder,
    Kind, Parsed, Value,
};
