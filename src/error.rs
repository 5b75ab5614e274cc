//! Errors produced while decoding an OPUS file.

use thiserror::Error;

use crate::format::{Tag, TypeKey};

/// Errors produced by the OPUS decoder.
///
/// Every variant except `Io` and `Config` is structural: the file does not follow
/// the container layout and no partial result is returned.
#[derive(Debug, Error)]
pub enum OpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A directory slot or block range reaches past end-of-file.
    #[error("truncated file: {what} ends at byte {end}, file is {file_len} bytes")]
    TruncatedFile {
        what: String,
        end: u64,
        file_len: u64,
    },

    /// Gap, overlap, bad field or non-zero padding in the directory.
    #[error("malformed directory: {0}")]
    MalformedDirectory(String),

    #[error("duplicate tag {tag} in parameter block {block}")]
    DuplicateTag { block: usize, tag: Tag },

    #[error("duplicate block key {key} (blocks {first} and {second})")]
    DuplicateBlockKey {
        key: TypeKey,
        first: usize,
        second: usize,
    },

    #[error("data block {block} is {len} bytes, not a multiple of 4")]
    InvalidDataLength { block: usize, len: usize },

    /// Parameter block exhausted before its END record.
    #[error("parameter block {block} has no END record")]
    MissingSentinel { block: usize },

    #[error("malformed record {tag} at byte {offset} of block {block}: {reason}")]
    MalformedRecord {
        block: usize,
        tag: Tag,
        offset: usize,
        reason: &'static str,
    },

    #[error("parameter block {block} has {len} bytes after its END record")]
    NonEmptyRest { block: usize, len: usize },
}

/// A convenience `Result` alias using [`OpusError`].
pub type Result<T> = std::result::Result<T, OpusError>;
