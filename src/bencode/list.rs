use super::codec::{decode_any, emit_any, encodable};
use super::codec::{DecodeContext, Decoder, Encoder, ParseOutcome, Parsed};
use super::error::BencodeError;
use super::value::{Kind, Value};
use crate::constants::{END, LIST_START};
use tracing::trace;

/// Codec for lists: `l<item>*e`.
///
/// Items are matched greedily: the scan takes the first decoder that matches
/// at each position and never revisits an earlier item. Wherever the scan
/// stops, the next byte must be `e`.
///
/// # Examples
///
/// ```
/// use rbit_bencode::bencode::{Decoder, ListCodec, Value};
///
/// let parsed = ListCodec.decode(b"li1ei2ee").unwrap();
/// assert_eq!(parsed.value, Value::List(vec![Value::from(1), Value::from(2)]));
/// assert_eq!(parsed.consumed, 8);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCodec;

impl Decoder for ListCodec {
    fn decode_in(&self, input: &[u8], cx: &DecodeContext<'_>) -> ParseOutcome {
        match input.first() {
            None => return Err(BencodeError::UnexpectedEof),
            Some(&LIST_START) => {}
            Some(_) => return Err(BencodeError::unrecognized(input)),
        }
        let inner = cx.descend()?;

        let mut pos = 1;
        let mut items = Vec::new();
        let stop = loop {
            match decode_any(&input[pos..], &inner) {
                Ok(Parsed { value, consumed }) => {
                    items.push(value);
                    pos += consumed;
                }
                Err(err) if err.is_limit() => return Err(err),
                Err(err) => break err,
            }
        };

        if input.get(pos) != Some(&END) {
            trace!("list scan stopped at offset {}: {}", pos, stop);
            return Err(BencodeError::unterminated(Kind::List, input, stop));
        }

        Ok(Parsed::new(Value::List(items), pos + 1))
    }
}

impl Encoder for ListCodec {
    fn kind(&self) -> Kind {
        Kind::List
    }

    fn can_encode(&self, value: &Value) -> bool {
        match value {
            Value::List(items) => items.iter().all(encodable),
            _ => false,
        }
    }

    fn emit(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), BencodeError> {
        let Value::List(items) = value else {
            return Err(BencodeError::unencodable(value, Kind::List));
        };
        out.push(LIST_START);
        for item in items {
            emit_any(item, out)?;
        }
        out.push(END);
        Ok(())
    }
}
