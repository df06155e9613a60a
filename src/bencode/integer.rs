use super::codec::{DecodeContext, Decoder, Encoder, ParseOutcome, Parsed};
use super::error::BencodeError;
use super::value::{Kind, Value};
use crate::constants::{END, INTEGER_START};
use num_bigint::{BigInt, BigUint, Sign};
use std::io::Write;

/// Codec for integers: `i<digits>e`.
///
/// Decoding accepts an optional `+` or `-` and rejects leading zeros and `-0`.
/// Encoding always produces the minimal form, so `i+5e` decodes to a value
/// that re-encodes as `i5e`.
///
/// # Examples
///
/// ```
/// use rbit_bencode::bencode::{Decoder, Encoder, IntegerCodec, Value};
///
/// let parsed = IntegerCodec.decode(b"i-42e").unwrap();
/// assert_eq!(parsed.value, Value::from(-42));
/// assert_eq!(parsed.consumed, 5);
///
/// assert!(!IntegerCodec.is_decodable(b"i-0e"));
/// assert!(!IntegerCodec.can_encode(&Value::string("42")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerCodec;

impl Decoder for IntegerCodec {
    fn decode_in(&self, input: &[u8], cx: &DecodeContext<'_>) -> ParseOutcome {
        match input.first() {
            None => return Err(BencodeError::UnexpectedEof),
            Some(&INTEGER_START) => {}
            Some(_) => return Err(BencodeError::unrecognized(input)),
        }

        let end = input[1..]
            .iter()
            .position(|&b| b == END)
            .map(|p| p + 1)
            .ok_or_else(|| BencodeError::invalid_number(input, "missing terminator"))?;
        let body = &input[1..end];

        if let Some(limit) = cx.options().max_integer_digits {
            if body.len() > limit {
                return Err(BencodeError::LengthLimitExceeded {
                    kind: Kind::Integer,
                    length: body.len(),
                    limit,
                });
            }
        }

        let value =
            parse_literal(body).map_err(|reason| BencodeError::invalid_number(input, reason))?;
        Ok(Parsed::new(Value::Integer(value), end + 1))
    }
}

fn parse_literal(body: &[u8]) -> Result<BigInt, &'static str> {
    let (sign, digits) = match body.split_first() {
        None => return Err("missing digits"),
        Some((b'-', rest)) => (Sign::Minus, rest),
        Some((b'+', rest)) => (Sign::Plus, rest),
        Some(_) => (Sign::Plus, body),
    };

    if digits.is_empty() {
        return Err("missing digits");
    }
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err("non-digit character");
    }
    if digits.len() > 1 && digits[0] == b'0' {
        return Err("leading zeros");
    }
    if sign == Sign::Minus && digits == b"0" {
        return Err("negative zero");
    }

    let magnitude = BigUint::parse_bytes(digits, 10).ok_or("non-digit character")?;
    Ok(BigInt::from_biguint(sign, magnitude))
}

impl Encoder for IntegerCodec {
    fn kind(&self) -> Kind {
        Kind::Integer
    }

    fn can_encode(&self, value: &Value) -> bool {
        matches!(value, Value::Integer(_))
    }

    fn emit(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), BencodeError> {
        match value {
            Value::Integer(i) => {
                write!(out, "i{}e", i)?;
                Ok(())
            }
            other => Err(BencodeError::unencodable(other, Kind::Integer)),
        }
    }
}
