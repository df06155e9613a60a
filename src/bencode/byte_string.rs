use super::codec::{DecodeContext, Decoder, Encoder, ParseOutcome, Parsed};
use super::error::BencodeError;
use super::value::{Kind, Value};
use crate::constants::LENGTH_SEPARATOR;
use bytes::Bytes;
use std::io::Write;

/// Codec for length-prefixed byte strings: `<length>:<bytes>`.
///
/// The length is a decimal with no sign and no leading zeros (other than the
/// literal `0`). Content is copied verbatim, with no escaping.
///
/// # Examples
///
/// ```
/// use rbit_bencode::bencode::{ByteStringCodec, Decoder, Encoder, Value};
///
/// let parsed = ByteStringCodec.decode(b"4:spam").unwrap();
/// assert_eq!(parsed.value, Value::string("spam"));
/// assert_eq!(parsed.consumed, 6);
///
/// assert!(!ByteStringCodec.is_decodable(b"04:spam"));
/// assert_eq!(ByteStringCodec.encode(&Value::string("spam")).unwrap(), b"4:spam");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteStringCodec;

impl ByteStringCodec {
    /// Reads a byte string, returning its content and the bytes consumed.
    pub(crate) fn read(
        input: &[u8],
        cx: &DecodeContext<'_>,
    ) -> Result<(Bytes, usize), BencodeError> {
        let first = *input.first().ok_or(BencodeError::UnexpectedEof)?;
        if !(first.is_ascii_digit() || matches!(first, b'+' | b'-' | LENGTH_SEPARATOR)) {
            return Err(BencodeError::unrecognized(input));
        }

        let digits_end = input
            .iter()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(input.len());
        let digits = &input[..digits_end];

        if digits.is_empty() {
            let reason = if first == LENGTH_SEPARATOR {
                "missing length"
            } else {
                "length must not be signed"
            };
            return Err(BencodeError::malformed_length(input, reason));
        }
        if input.get(digits_end) != Some(&LENGTH_SEPARATOR) {
            return Err(BencodeError::malformed_length(
                input,
                "missing colon after length",
            ));
        }
        if digits.len() > 1 && digits[0] == b'0' {
            return Err(BencodeError::malformed_length(input, "leading zeros"));
        }

        let start = digits_end + 1;
        let available = input.len() - start;
        let truncated = || BencodeError::TruncatedInput {
            input: super::error::preview(input),
            declared: String::from_utf8_lossy(digits).into_owned(),
            available,
        };

        // Lengths past usize::MAX cannot be present in memory.
        let len = parse_len(digits).ok_or_else(truncated)?;

        if let Some(limit) = cx.options().max_string_len {
            if len > limit {
                return Err(BencodeError::LengthLimitExceeded {
                    kind: Kind::ByteString,
                    length: len,
                    limit,
                });
            }
        }
        if len > available {
            return Err(truncated());
        }

        let end = start + len;
        Ok((Bytes::copy_from_slice(&input[start..end]), end))
    }
}

fn parse_len(digits: &[u8]) -> Option<usize> {
    digits.iter().try_fold(0usize, |acc, &d| {
        acc.checked_mul(10)?.checked_add(usize::from(d - b'0'))
    })
}

/// Appends `<len>:<bytes>` to `out`.
pub(crate) fn write_byte_string(bytes: &[u8], out: &mut Vec<u8>) -> Result<(), BencodeError> {
    write!(out, "{}:", bytes.len())?;
    out.extend_from_slice(bytes);
    Ok(())
}

impl Decoder for ByteStringCodec {
    fn decode_in(&self, input: &[u8], cx: &DecodeContext<'_>) -> ParseOutcome {
        let (bytes, consumed) = Self::read(input, cx)?;
        Ok(Parsed::new(Value::Bytes(bytes), consumed))
    }
}

impl Encoder for ByteStringCodec {
    fn kind(&self) -> Kind {
        Kind::ByteString
    }

    fn can_encode(&self, value: &Value) -> bool {
        matches!(value, Value::Bytes(_))
    }

    fn emit(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), BencodeError> {
        match value {
            Value::Bytes(b) => write_byte_string(b, out),
            other => Err(BencodeError::unencodable(other, Kind::ByteString)),
        }
    }
}
