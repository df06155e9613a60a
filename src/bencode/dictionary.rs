use super::byte_string::{write_byte_string, ByteStringCodec};
use super::codec::{decode_any, emit_any, encodable};
use super::codec::{DecodeContext, Decoder, Encoder, ParseOutcome, Parsed};
use super::error::{preview, BencodeError};
use super::options::DuplicateKeys;
use super::value::{Kind, Value};
use crate::constants::{DICT_START, END};
use bytes::Bytes;
use std::collections::BTreeMap;
use tracing::trace;

/// Codec for dictionaries: `d(<key><value>)*e`.
///
/// Keys must be byte strings in ascending raw byte order. Pairs are matched
/// with the same greedy scan as [`ListCodec`](super::ListCodec). A key that
/// sorts before its predecessor fails the whole dictionary. A key equal to its
/// predecessor is handled according to
/// [`DecodeOptions::duplicate_keys`](super::DecodeOptions::duplicate_keys).
///
/// Encoding always emits keys in ascending order.
///
/// # Examples
///
/// ```
/// use rbit_bencode::bencode::{BencodeError, Decoder, DictionaryCodec};
///
/// let parsed = DictionaryCodec.decode(b"d1:a1:b1:c1:de").unwrap();
/// assert_eq!(parsed.value.get(b"c").and_then(|v| v.as_str()), Some("d"));
/// assert_eq!(parsed.consumed, 14);
///
/// assert!(matches!(
///     DictionaryCodec.decode(b"d1:c1:d1:a1:be"),
///     Err(BencodeError::OutOfOrderKey { .. })
/// ));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryCodec;

struct Entry {
    key: Bytes,
    value: Value,
    consumed: usize,
}

/// Decodes one key followed by one value.
fn read_entry(input: &[u8], cx: &DecodeContext<'_>) -> Result<Entry, BencodeError> {
    let (key, key_len) = ByteStringCodec::read(input, cx)?;
    let Parsed { value, consumed } = decode_any(&input[key_len..], cx)?;
    Ok(Entry {
        key,
        value,
        consumed: key_len + consumed,
    })
}

impl Decoder for DictionaryCodec {
    fn decode_in(&self, input: &[u8], cx: &DecodeContext<'_>) -> ParseOutcome {
        match input.first() {
            None => return Err(BencodeError::UnexpectedEof),
            Some(&DICT_START) => {}
            Some(_) => return Err(BencodeError::unrecognized(input)),
        }
        let inner = cx.descend()?;

        let mut pos = 1;
        let mut dict = BTreeMap::new();
        let mut previous: Option<Bytes> = None;
        let stop = loop {
            let entry = match read_entry(&input[pos..], &inner) {
                Ok(entry) => entry,
                Err(err) if err.is_limit() => return Err(err),
                Err(err) => break err,
            };

            if let Some(prev) = &previous {
                if *prev > entry.key {
                    trace!("dictionary key out of order at offset {}", pos);
                    return Err(BencodeError::OutOfOrderKey {
                        previous: preview(prev),
                        key: preview(&entry.key),
                    });
                }
                if *prev == entry.key && cx.options().duplicate_keys == DuplicateKeys::Reject {
                    trace!("duplicate dictionary key at offset {}", pos);
                    return Err(BencodeError::DuplicateKey {
                        key: preview(&entry.key),
                    });
                }
            }

            pos += entry.consumed;
            previous = Some(entry.key.clone());
            dict.insert(entry.key, entry.value);
        };

        if input.get(pos) != Some(&END) {
            trace!("dictionary scan stopped at offset {}: {}", pos, stop);
            return Err(BencodeError::unterminated(Kind::Dictionary, input, stop));
        }

        Ok(Parsed::new(Value::Dict(dict), pos + 1))
    }
}

impl Encoder for DictionaryCodec {
    fn kind(&self) -> Kind {
        Kind::Dictionary
    }

    fn can_encode(&self, value: &Value) -> bool {
        match value {
            Value::Dict(entries) => entries.values().all(encodable),
            _ => false,
        }
    }

    fn emit(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), BencodeError> {
        let Value::Dict(entries) = value else {
            return Err(BencodeError::unencodable(value, Kind::Dictionary));
        };
        // BTreeMap iterates in ascending raw byte order, which is the canonical key order.
        out.push(DICT_START);
        for (key, val) in entries {
            write_byte_string(key, out)?;
            emit_any(val, out)?;
        }
        out.push(END);
        Ok(())
    }
}
