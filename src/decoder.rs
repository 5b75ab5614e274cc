//! Block classifier and the decoded-file model.
//!
//! Every block after the directory is routed by content and key:
//! - an `END` tag right before the final 5 bytes → parameter block,
//! - key component 0 equal to [`DATA_MARKER`](crate::format::DATA_MARKER) → little-endian `f32` samples,
//! - anything else → kept as raw bytes.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::Range;

use log::{debug, warn};
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::directory::{self, BlockRange, HeaderBlock};
use crate::error::{OpusError, Result};
use crate::format::{Tag, TypeKey, RECORD_HEADER_LEN};
use crate::options::DecodeOptions;
use crate::params::{self, CodedText, ParameterBlock, ParameterValue};
use crate::vocab::{self, Lookup};

/// Index (or indices, for the sentinel key) of the blocks stored under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum BlockSlot {
    Single(usize),
    Many(Vec<usize>),
}

impl BlockSlot {
    /// The sentinel key always collects a list.
    fn new(key: TypeKey, index: usize) -> Self {
        if key.is_sentinel() {
            BlockSlot::Many(vec![index])
        } else {
            BlockSlot::Single(index)
        }
    }

    /// All indices in file order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        match self {
            BlockSlot::Single(i) => std::slice::from_ref(i),
            BlockSlot::Many(v) => v,
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.indices().first().copied()
    }

    fn push(&mut self, index: usize) {
        match self {
            BlockSlot::Single(first) => *self = BlockSlot::Many(vec![*first, index]),
            BlockSlot::Many(v) => v.push(index),
        }
    }
}

/// Classification of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum BlockClass {
    Header,
    Parameters,
    Data,
    Unclassified,
}

/// One decoded block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Block {
    Header(HeaderBlock),
    Parameters(ParameterBlock),
    Data(Vec<f32>),
    /// Absolute byte range of the raw block.
    Unclassified(Range<usize>),
}

impl Block {
    #[must_use]
    pub fn class(&self) -> BlockClass {
        match self {
            Block::Header(_) => BlockClass::Header,
            Block::Parameters(_) => BlockClass::Parameters,
            Block::Data(_) => BlockClass::Data,
            Block::Unclassified(_) => BlockClass::Unclassified,
        }
    }
}

/// Key → block index maps, one per class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BlockMaps {
    pub parameters: BTreeMap<TypeKey, BlockSlot>,
    pub data: BTreeMap<TypeKey, BlockSlot>,
    pub unclassified: BTreeMap<TypeKey, BlockSlot>,
}

/// A vocabulary miss found in a decoded parameter block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Unresolved {
    pub block: usize,
    pub tag: Tag,
    /// `None` when the tag name itself is unknown, otherwise the unknown code.
    pub code: Option<String>,
}

/// A fully decoded OPUS file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DecodedFile {
    #[cfg_attr(feature = "serde", serde(skip))]
    data: Vec<u8>,
    ranges: Vec<BlockRange>,
    blocks: Vec<Block>,
    maps: BlockMaps,
}

/// Decode `data` with default options.
pub fn decode(data: Vec<u8>) -> Result<DecodedFile> {
    decode_with(data, &DecodeOptions::default())
}

/// Decode `data`: walk the directory, then classify and decode each block.
pub fn decode_with(data: Vec<u8>, options: &DecodeOptions) -> Result<DecodedFile> {
    let dir = directory::walk(&data)?;
    let mut blocks = Vec::with_capacity(dir.blocks.len());
    let mut maps = BlockMaps::default();
    blocks.push(Block::Header(dir.header));

    for (index, located) in dir.blocks.iter().enumerate().skip(1) {
        let key = located.key;
        let bytes = &data[located.range.clone()];

        let block = if is_parameter_block(bytes) {
            let params = params::tokenize(index, key, bytes, options)?;
            insert_unique(&mut maps.parameters, key, index)?;
            Block::Parameters(params)
        } else if key.is_data() {
            let samples = decode_samples(index, bytes)?;
            insert_unique(&mut maps.data, key, index)?;
            Block::Data(samples)
        } else {
            insert_accumulating(&mut maps.unclassified, key, index);
            Block::Unclassified(located.range.clone())
        };
        debug!("block {index} {key}: {:?}, {} bytes", block.class(), bytes.len());
        blocks.push(block);
    }

    Ok(DecodedFile {
        data,
        ranges: dir.blocks,
        blocks,
        maps,
    })
}

/// `END` immediately before the last 5 bytes: the closing record header of a parameter block.
fn is_parameter_block(bytes: &[u8]) -> bool {
    let n = bytes.len();
    n >= RECORD_HEADER_LEN && &bytes[n - RECORD_HEADER_LEN..n - 5] == b"END"
}

/// Decode a data block as little-endian `f32` samples.
pub fn decode_samples(block: usize, bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(OpusError::InvalidDataLength {
            block,
            len: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Insert into a map whose keys are unique except for the sentinel key.
fn insert_unique(
    map: &mut BTreeMap<TypeKey, BlockSlot>,
    key: TypeKey,
    index: usize,
) -> Result<()> {
    match map.entry(key) {
        Entry::Vacant(e) => {
            e.insert(BlockSlot::new(key, index));
        }
        Entry::Occupied(mut e) => {
            if !key.is_sentinel() {
                return Err(OpusError::DuplicateBlockKey {
                    key,
                    first: e.get().first().unwrap_or(index),
                    second: index,
                });
            }
            e.get_mut().push(index);
        }
    }
    Ok(())
}

/// Unclassified blocks make no uniqueness claim; repeated keys collect every index.
fn insert_accumulating(map: &mut BTreeMap<TypeKey, BlockSlot>, key: TypeKey, index: usize) {
    match map.entry(key) {
        Entry::Vacant(e) => {
            e.insert(BlockSlot::new(key, index));
        }
        Entry::Occupied(mut e) => {
            warn!("unclassified key {key} repeats (blocks {:?} and {index})", e.get().indices());
            e.get_mut().push(index);
        }
    }
}

impl DecodedFile {
    /// The header block (block 0).
    #[must_use]
    pub fn header(&self) -> Option<&HeaderBlock> {
        match self.blocks.first() {
            Some(Block::Header(header)) => Some(header),
            _ => None,
        }
    }

    /// All blocks; index 0 is the header.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[must_use]
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Key and absolute byte range of every block, in file order.
    #[must_use]
    pub fn ranges(&self) -> &[BlockRange] {
        &self.ranges
    }

    #[must_use]
    pub fn maps(&self) -> &BlockMaps {
        &self.maps
    }

    /// Raw bytes of any block.
    #[must_use]
    pub fn raw_bytes(&self, index: usize) -> Option<&[u8]> {
        self.ranges.get(index).map(|b| &self.data[b.range.clone()])
    }

    /// The file as read.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// First parameter block stored under `key`.
    #[must_use]
    pub fn parameters(&self, key: TypeKey) -> Option<&ParameterBlock> {
        self.parameter_blocks(key).next().map(|(_, p)| p)
    }

    /// Every parameter block stored under `key`, with its block index.
    pub fn parameter_blocks(
        &self,
        key: TypeKey,
    ) -> impl Iterator<Item = (usize, &ParameterBlock)> + '_ {
        self.maps
            .parameters
            .get(&key)
            .map(BlockSlot::indices)
            .unwrap_or_default()
            .iter()
            .filter_map(move |&i| match &self.blocks[i] {
                Block::Parameters(p) => Some((i, p)),
                _ => None,
            })
    }

    /// Samples of the data block stored under `key`.
    #[must_use]
    pub fn data(&self, key: TypeKey) -> Option<&[f32]> {
        let index = self.maps.data.get(&key)?.first()?;
        match &self.blocks[index] {
            Block::Data(samples) => Some(samples),
            _ => None,
        }
    }

    /// Raw bytes of the first unclassified block stored under `key`.
    #[must_use]
    pub fn unclassified(&self, key: TypeKey) -> Option<&[u8]> {
        let index = self.maps.unclassified.get(&key)?.first()?;
        self.raw_bytes(index)
    }

    /// Every tag name and coded value the vocabulary could not resolve.
    #[must_use]
    pub fn unresolved(&self) -> Vec<Unresolved> {
        let mut out = Vec::new();
        for (block, b) in self.blocks.iter().enumerate() {
            let Block::Parameters(params) = b else {
                continue;
            };
            for record in params.records() {
                if vocab::tag_name(&record.tag) == Lookup::Unresolved {
                    out.push(Unresolved {
                        block,
                        tag: record.tag,
                        code: None,
                    });
                }
                if let ParameterValue::Coded(CodedText::Unresolved(code)) = &record.value {
                    out.push(Unresolved {
                        block,
                        tag: record.tag,
                        code: Some(code.clone()),
                    });
                }
            }
        }
        out
    }
}
