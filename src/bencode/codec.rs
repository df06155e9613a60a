//! Codec traits and the precedence-ordered registries that tie the four
//! codecs together.

use super::byte_string::ByteStringCodec;
use super::dictionary::DictionaryCodec;
use super::error::BencodeError;
use super::integer::IntegerCodec;
use super::list::ListCodec;
use super::options::DecodeOptions;
use super::value::{Kind, Value};

/// A successful decode: the value and how many input bytes it occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub value: Value,
    /// Bytes matched from the start of the input. Callers advance by this
    /// much to reach the next value without rescanning.
    pub consumed: usize,
}

impl Parsed {
    pub fn new(value: Value, consumed: usize) -> Self {
        Self { value, consumed }
    }
}

/// Result of a decode attempt.
pub type ParseOutcome = Result<Parsed, BencodeError>;

/// Result of an encode attempt.
pub type EncodeOutcome = Result<Vec<u8>, BencodeError>;

/// Options and nesting depth threaded through a recursive decode.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    options: &'a DecodeOptions,
    depth: usize,
}

impl<'a> DecodeContext<'a> {
    /// A context for a top-level value.
    pub fn new(options: &'a DecodeOptions) -> Self {
        Self { options, depth: 0 }
    }

    pub fn options(&self) -> &'a DecodeOptions {
        self.options
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Context for the members of a container opened at this level.
    pub fn descend(&self) -> Result<Self, BencodeError> {
        let depth = self.depth + 1;
        if let Some(limit) = self.options.max_depth {
            if depth > limit {
                return Err(BencodeError::NestingTooDeep { limit });
            }
        }
        Ok(Self {
            options: self.options,
            depth,
        })
    }
}

/// Decodes one kind of bencode value from the start of a slice.
///
/// Decoders never hold a cursor. A composite decoder hands each member the
/// remaining slice and adds up the consumed lengths.
pub trait Decoder: Sync {
    /// Decodes a value starting at offset 0 of `input`, under `cx`.
    ///
    /// Trailing bytes after the value are left alone and are not an error.
    fn decode_in(&self, input: &[u8], cx: &DecodeContext<'_>) -> ParseOutcome;

    /// Decodes with default options.
    fn decode(&self, input: &[u8]) -> ParseOutcome {
        let options = DecodeOptions::default();
        self.decode_in(input, &DecodeContext::new(&options))
    }

    /// Reports whether [`decode`](Decoder::decode) would succeed. Never fails.
    fn is_decodable(&self, input: &[u8]) -> bool {
        self.decode(input).is_ok()
    }
}

/// Encodes one kind of bencode value.
pub trait Encoder: Sync {
    /// The kind this encoder produces.
    fn kind(&self) -> Kind;

    /// Reports whether `value`, including everything nested in it, can be
    /// encoded by this encoder. Never fails.
    fn can_encode(&self, value: &Value) -> bool;

    /// Appends the encoding of a value that already passed
    /// [`can_encode`](Encoder::can_encode).
    fn emit(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), BencodeError>;

    /// Probes `value` and appends its encoding. Nothing is written on failure.
    fn encode_into(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), BencodeError> {
        if !self.can_encode(value) {
            return Err(BencodeError::unencodable(value, self.kind()));
        }
        self.emit(value, out)
    }

    /// Encodes `value`, failing with [`BencodeError::UnencodableValue`] when it
    /// is not the kind this encoder handles.
    fn encode(&self, value: &Value) -> EncodeOutcome {
        let mut out = Vec::new();
        self.encode_into(value, &mut out)?;
        Ok(out)
    }
}

/// Decoders in trial order.
pub(crate) static DECODERS: [&dyn Decoder; 4] =
    [&ByteStringCodec, &IntegerCodec, &ListCodec, &DictionaryCodec];

/// Encoders in trial order.
pub(crate) static ENCODERS: [&dyn Encoder; 4] =
    [&ByteStringCodec, &IntegerCodec, &ListCodec, &DictionaryCodec];

/// Tries every decoder in precedence order and returns the first match.
///
/// When nothing matches, the error comes from the decoder that recognized the
/// leading marker, or is [`BencodeError::UnrecognizedInput`] if none did.
/// Limit errors are returned as soon as they occur.
pub(crate) fn decode_any(input: &[u8], cx: &DecodeContext<'_>) -> ParseOutcome {
    let mut claimed = None;
    for decoder in DECODERS.iter() {
        match decoder.decode_in(input, cx) {
            Ok(parsed) => return Ok(parsed),
            Err(err) if err.is_limit() => return Err(err),
            Err(BencodeError::UnrecognizedInput { .. }) => {}
            Err(err) => {
                if claimed.is_none() {
                    claimed = Some(err);
                }
            }
        }
    }
    Err(claimed.unwrap_or_else(|| BencodeError::unrecognized(input)))
}

/// True if some encoder accepts `value`.
pub(crate) fn encodable(value: &Value) -> bool {
    ENCODERS.iter().any(|encoder| encoder.can_encode(value))
}

/// Emits a value that already passed [`encodable`], through the first
/// encoder whose kind matches.
pub(crate) fn emit_any(value: &Value, out: &mut Vec<u8>) -> Result<(), BencodeError> {
    let kind = value.kind();
    match ENCODERS.iter().find(|encoder| encoder.kind() == kind) {
        Some(encoder) => encoder.emit(value, out),
        None => Err(BencodeError::unencodable(value, kind)),
    }
}
