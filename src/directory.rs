//! Directory walker: locate every block in the file.
//!
//! Layout at the start of the file:
//!
//! ```text
//! slot 0, slot 1      opaque header words (12 bytes each)
//! slot 2              entry for the directory block itself (starts at byte 24)
//! slot 3..            one entry per following block
//! ```
//!
//! Entries are read until the blocks they describe reach end-of-file. Each block must
//! start exactly where the previous one ended and hold at least one word.

use std::ops::Range;

use log::debug;
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{OpusError, Result};
use crate::format::{BlockIndexEntry, TypeKey, ENTRY_SIZE, HEADER_LEN, HEADER_SLOTS, WORD_SIZE};

/// Block 0: the two header words and every directory entry that was read.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HeaderBlock {
    pub h0: [u8; ENTRY_SIZE],
    pub h1: [u8; ENTRY_SIZE],
    /// Entries in slot order, starting with the directory block's own entry.
    pub entries: Vec<BlockIndexEntry>,
}

/// One located block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BlockRange {
    pub key: TypeKey,
    /// Absolute byte range in the file.
    pub range: Range<usize>,
}

/// Result of the directory walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub header: HeaderBlock,
    /// Blocks in file order; index 0 is the directory block.
    pub blocks: Vec<BlockRange>,
}

impl Directory {
    /// Sum of all block lengths.
    #[must_use]
    pub fn covered_len(&self) -> usize {
        self.blocks.iter().map(|b| b.range.len()).sum()
    }
}

/// Walk the directory of `data`.
pub fn walk(data: &[u8]) -> Result<Directory> {
    let file_len = data.len();
    let h0 = read_slot(data, 0)?;
    let h1 = read_slot(data, 1)?;

    let mut slot = HEADER_SLOTS;
    let mut entry = BlockIndexEntry::from_slot(&read_slot(data, slot)?);
    let mut range = entry_range(slot, &entry, file_len)?;
    if range.start != HEADER_LEN {
        return Err(OpusError::MalformedDirectory(format!(
            "directory block starts at byte {}, expected {HEADER_LEN}",
            range.start
        )));
    }
    debug!("directory block {} at {range:?}", entry.key);

    let mut entries = vec![entry];
    let mut blocks = Vec::new();
    while range.end < file_len {
        blocks.push(BlockRange {
            key: entry.key,
            range: range.clone(),
        });
        slot += 1;
        entry = BlockIndexEntry::from_slot(&read_slot(data, slot)?);
        entries.push(entry);

        let next = entry_range(slot, &entry, file_len)?;
        if next.start != range.end {
            let kind = if next.start > range.end { "gap" } else { "overlap" };
            return Err(OpusError::MalformedDirectory(format!(
                "{kind} before slot {slot}: previous block ends at {}, next starts at {}",
                range.end, next.start
            )));
        }
        if next.is_empty() {
            return Err(OpusError::MalformedDirectory(format!(
                "slot {slot}: block {} at byte {} has length 0",
                entry.key, next.start
            )));
        }
        debug!("block {} {} at {next:?}", blocks.len(), entry.key);
        range = next;
    }
    blocks.push(BlockRange {
        key: entry.key,
        range,
    });

    check_directory_padding(data, &blocks)?;

    Ok(Directory {
        header: HeaderBlock { h0, h1, entries },
        blocks,
    })
}

fn read_slot(data: &[u8], slot: usize) -> Result<[u8; ENTRY_SIZE]> {
    let start = slot * ENTRY_SIZE;
    let end = start + ENTRY_SIZE;
    let bytes = data.get(start..end).ok_or_else(|| OpusError::TruncatedFile {
        what: format!("directory slot {slot}"),
        end: end as u64,
        file_len: data.len() as u64,
    })?;
    let mut out = [0u8; ENTRY_SIZE];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Byte range described by `entry`, checked against the file length.
fn entry_range(slot: usize, entry: &BlockIndexEntry, file_len: usize) -> Result<Range<usize>> {
    let (Ok(words), Ok(start)) = (usize::try_from(entry.length), usize::try_from(entry.offset))
    else {
        return Err(OpusError::MalformedDirectory(format!(
            "slot {slot}: negative length {} or offset {}",
            entry.length, entry.offset
        )));
    };
    let end = words
        .checked_mul(WORD_SIZE)
        .and_then(|len| start.checked_add(len))
        .unwrap_or(usize::MAX);
    if end > file_len {
        return Err(OpusError::TruncatedFile {
            what: format!("block {} (slot {slot})", entry.key),
            end: end as u64,
            file_len: file_len as u64,
        });
    }
    Ok(start..end)
}

/// The directory block holds one entry per block; the remainder must be zero.
fn check_directory_padding(data: &[u8], blocks: &[BlockRange]) -> Result<()> {
    let dir = &data[blocks[0].range.clone()];
    let used = blocks.len() * ENTRY_SIZE;
    if used > dir.len() {
        return Err(OpusError::MalformedDirectory(format!(
            "{} entries need {used} bytes, directory block has {}",
            blocks.len(),
            dir.len()
        )));
    }
    if let Some(i) = dir[used..].iter().position(|&b| b != 0) {
        return Err(OpusError::MalformedDirectory(format!(
            "non-zero padding at byte {} of the directory block",
            used + i
        )));
    }
    Ok(())
}
