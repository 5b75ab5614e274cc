//! OPUS binary format types and constants.
//!
//! Defines the directory entry layout, block type keys, parameter tags and the
//! sentinel values used by the decoder. All multi-byte fields are little-endian.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// Size of one directory slot in bytes: 4 key bytes + length (4) + offset (4).
pub const ENTRY_SIZE: usize = 12;

/// Number of leading slots holding opaque header words instead of directory entries.
pub const HEADER_SLOTS: usize = 2;

/// Byte length of the two header words; the directory block starts here.
pub const HEADER_LEN: usize = HEADER_SLOTS * ENTRY_SIZE;

/// Directory lengths are counted in 4-byte words.
pub const WORD_SIZE: usize = 4;

/// First key component marking an interferogram/spectrum sample array.
pub const DATA_MARKER: u8 = 7;

/// Key reserved for unclassified blocks; exempt from uniqueness checks.
pub const SENTINEL_KEY: TypeKey = TypeKey([0, 0, 0, 0]);

/// Tag of the record terminating a parameter block.
pub const END_TAG: Tag = Tag(*b"END\0");

/// Size of the fixed record header in a parameter block: tag (4) + type (2) + length (2).
pub const RECORD_HEADER_LEN: usize = 8;

/// Four one-byte components identifying a block's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(pub [u8; 4]);

impl TypeKey {
    #[must_use]
    pub const fn new(t0: u8, t1: u8, t2: u8, t3: u8) -> Self {
        TypeKey([t0, t1, t2, t3])
    }

    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self == SENTINEL_KEY
    }

    /// Whether the first component marks a sample array.
    #[must_use]
    pub fn is_data(self) -> bool {
        self.0[0] == DATA_MARKER
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "({a}, {b}, {c}, {d})")
    }
}

/// Serialised as its display form so it can key JSON maps.
#[cfg(feature = "serde")]
impl Serialize for TypeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One 12-byte directory record as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BlockIndexEntry {
    pub key: TypeKey,
    /// Block length in 4-byte words.
    pub length: i32,
    /// Absolute byte offset of the block.
    pub offset: i32,
}

impl BlockIndexEntry {
    /// Decode a slot. `bytes` must hold at least `ENTRY_SIZE` bytes.
    #[must_use]
    pub fn from_slot(bytes: &[u8; ENTRY_SIZE]) -> Self {
        let key = TypeKey([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let length = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let offset = i32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        BlockIndexEntry { key, length, offset }
    }
}

/// A four-byte parameter tag. Stored NUL-padded; compared and shown without the padding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    /// Build a tag from up to four ASCII bytes; longer input is truncated.
    #[must_use]
    pub fn new(s: &str) -> Self {
        let mut raw = [0u8; 4];
        for (dst, src) in raw.iter_mut().zip(s.bytes()) {
            *dst = src;
        }
        Tag(raw)
    }

    /// Tag bytes with trailing NUL padding stripped.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.0.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        &self.0[..len]
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        latin1(self.as_bytes())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.to_text())
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag::new(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

/// Decode single-byte text; every byte maps to the code point of the same value.
#[must_use]
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
