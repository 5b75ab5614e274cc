//! Parameter block tokenizer.
//!
//! A parameter block is a stream of records:
//!
//! ```text
//! tag (4, NUL-padded) | type (u16) | length in 2-byte words (u16) | payload (2 * length)
//! ```
//!
//! terminated by a record with tag `END` and type 0. Bytes after that record are
//! the block's rest and are never decoded.

use std::collections::HashMap;

use log::{trace, warn};
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{OpusError, Result};
use crate::format::{latin1, Tag, TypeKey, END_TAG, RECORD_HEADER_LEN};
use crate::options::{DecodeOptions, RestPolicy, SentinelPolicy};
use crate::vocab;

/// Declared value encoding of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TypeCode {
    Int,
    Float,
    Text,
    Coded,
    String,
    Other(u16),
}

impl TypeCode {
    #[must_use]
    pub fn from_u16(v: u16) -> Self {
        match v {
            0 => TypeCode::Int,
            1 => TypeCode::Float,
            2 => TypeCode::Text,
            3 => TypeCode::Coded,
            4 => TypeCode::String,
            other => TypeCode::Other(other),
        }
    }

    #[must_use]
    pub fn as_u16(self) -> u16 {
        match self {
            TypeCode::Int => 0,
            TypeCode::Float => 1,
            TypeCode::Text => 2,
            TypeCode::Coded => 3,
            TypeCode::String => 4,
            TypeCode::Other(v) => v,
        }
    }
}

/// A coded-text value after vocabulary lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CodedText {
    Resolved { code: String, text: &'static str },
    /// Code absent from the vocabulary; carries the raw code.
    Unresolved(String),
}

impl CodedText {
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            CodedText::Resolved { code, .. } => code,
            CodedText::Unresolved(code) => code,
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&'static str> {
        match self {
            CodedText::Resolved { text, .. } => Some(text),
            CodedText::Unresolved(_) => None,
        }
    }
}

/// Decoded value of one record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ParameterValue {
    Int(i32),
    Float(f64),
    /// Types 2 and 4.
    Text(String),
    Coded(CodedText),
    /// Unknown type code; the payload is kept as the record's unknown tail.
    Opaque,
}

impl ParameterValue {
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ParameterValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One decoded record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParameterRecord {
    pub tag: Tag,
    pub type_code: TypeCode,
    /// Payload length in 2-byte words, as declared.
    pub length: u16,
    pub value: ParameterValue,
    /// Payload bytes past the recognised value.
    pub unknown: Vec<u8>,
}

/// An ordered set of decoded parameters.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParameterBlock {
    records: Vec<ParameterRecord>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: HashMap<Tag, usize>,
    rest: Vec<u8>,
}

impl ParameterBlock {
    /// Records in stream order.
    #[must_use]
    pub fn records(&self) -> &[ParameterRecord] {
        &self.records
    }

    /// Tags in stream order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.records.iter().map(|r| r.tag)
    }

    /// Record for `tag`. When a tag repeats, the last occurrence wins.
    #[must_use]
    pub fn record(&self, tag: &str) -> Option<&ParameterRecord> {
        self.index.get(&Tag::new(tag)).map(|&i| &self.records[i])
    }

    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&ParameterValue> {
        self.record(tag).map(|r| &r.value)
    }

    #[must_use]
    pub fn type_code(&self, tag: &str) -> Option<TypeCode> {
        self.record(tag).map(|r| r.type_code)
    }

    /// Bytes after the END record.
    #[must_use]
    pub fn rest(&self) -> &[u8] {
        &self.rest
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Tokenize the bytes of parameter block `block` (directory index, used in errors).
///
/// Tags must be unique unless `key` is the sentinel key.
pub fn tokenize(
    block: usize,
    key: TypeKey,
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<ParameterBlock> {
    let mut records = Vec::new();
    let mut index: HashMap<Tag, usize> = HashMap::new();
    let mut pos = 0usize;
    let mut terminated = false;
    let mut overran = false;

    while pos + RECORD_HEADER_LEN <= bytes.len() {
        let tag = Tag([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]]);
        let type_raw = u16::from_le_bytes([bytes[pos + 4], bytes[pos + 5]]);
        let length = u16::from_le_bytes([bytes[pos + 6], bytes[pos + 7]]);
        let start = pos + RECORD_HEADER_LEN;
        let end = start + 2 * usize::from(length);
        let is_end = tag == END_TAG && type_raw == 0;

        if end > bytes.len() {
            if options.sentinel == SentinelPolicy::Require {
                return Err(OpusError::MalformedRecord {
                    block,
                    tag,
                    offset: pos,
                    reason: "payload runs past end of block",
                });
            }
            warn!("block {block}: record {tag} at byte {pos} overruns the block, stopping");
            overran = true;
            if is_end {
                pos = bytes.len();
                terminated = true;
            }
            break;
        }
        if is_end {
            pos = end;
            terminated = true;
            break;
        }

        let type_code = TypeCode::from_u16(type_raw);
        let (value, unknown) = decode_value(block, pos, tag, type_code, &bytes[start..end])?;
        trace!("block {block}: {tag} {type_code:?} {value:?}");

        if index.insert(tag, records.len()).is_some() && !key.is_sentinel() {
            return Err(OpusError::DuplicateTag { block, tag });
        }
        records.push(ParameterRecord {
            tag,
            type_code,
            length,
            value,
            unknown: unknown.to_vec(),
        });
        pos = end;
    }

    if !terminated {
        match options.sentinel {
            SentinelPolicy::Require => return Err(OpusError::MissingSentinel { block }),
            SentinelPolicy::Lenient if !overran => {
                warn!("block {block}: no END record, treating end of block as terminator");
            }
            SentinelPolicy::Lenient => {}
        }
    }

    let rest = bytes[pos..].to_vec();
    if options.rest == RestPolicy::RequireEmpty && !rest.is_empty() {
        return Err(OpusError::NonEmptyRest {
            block,
            len: rest.len(),
        });
    }

    Ok(ParameterBlock {
        records,
        index,
        rest,
    })
}

/// Split a payload into its value and unknown tail according to `type_code`.
fn decode_value<'a>(
    block: usize,
    offset: usize,
    tag: Tag,
    type_code: TypeCode,
    payload: &'a [u8],
) -> Result<(ParameterValue, &'a [u8])> {
    let too_short = |reason| OpusError::MalformedRecord {
        block,
        tag,
        offset,
        reason,
    };

    Ok(match type_code {
        TypeCode::Int => {
            let (head, tail) =
                split_fixed::<4>(payload).ok_or_else(|| too_short("integer needs 4 bytes"))?;
            (ParameterValue::Int(i32::from_le_bytes(head)), tail)
        }
        TypeCode::Float => {
            let (head, tail) =
                split_fixed::<8>(payload).ok_or_else(|| too_short("float needs 8 bytes"))?;
            (ParameterValue::Float(f64::from_le_bytes(head)), tail)
        }
        TypeCode::Text | TypeCode::String => {
            let (text, tail) = split_at_nul(payload);
            (ParameterValue::Text(latin1(text)), tail)
        }
        TypeCode::Coded => {
            let (text, tail) = split_at_nul(payload);
            let code = latin1(text);
            let coded = vocab::code_text(&tag, &code);
            if let CodedText::Unresolved(raw) = &coded {
                warn!("block {block}: unknown code {raw:?} for {tag}");
            }
            (ParameterValue::Coded(coded), tail)
        }
        TypeCode::Other(_) => (ParameterValue::Opaque, payload),
    })
}

fn split_fixed<const N: usize>(payload: &[u8]) -> Option<([u8; N], &[u8])> {
    if payload.len() < N {
        return None;
    }
    let (head, tail) = payload.split_at(N);
    let mut out = [0u8; N];
    out.copy_from_slice(head);
    Some((out, tail))
}

/// Text up to the first NUL; the tail starts at that NUL. Without a NUL the whole payload is text.
fn split_at_nul(payload: &[u8]) -> (&[u8], &[u8]) {
    let nul = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    payload.split_at(nul)
}
