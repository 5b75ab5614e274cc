//! OPUS spectroscopy file decoder.
//!
//! This crate provides:
//! - **Format types** (`format`): `TypeKey`, `Tag`, directory entries, layout constants.
//! - **Directory walker** (`directory`): locate every block and check the ranges tile the file.
//! - **Parameter tokenizer** (`params`): decode tag/type/length/value record streams.
//! - **Classifier** (`decoder`): route blocks to parameters, sample arrays or raw bytes.
//! - **Vocabulary** (`vocab`): static tag-name and code tables.
//! - **Reader** (`reader`): `OpusReader::open(path)` for whole-file decoding.
//! - **Report** (`report`): human-readable rendering of a decoded file.

pub mod decoder;
pub mod directory;
pub mod error;
pub mod format;
pub mod options;
pub mod params;
pub mod reader;
pub mod report;
pub mod vocab;

pub use decoder::{
    decode, decode_with, Block, BlockClass, BlockMaps, BlockSlot, DecodedFile, Unresolved,
};
pub use directory::{walk, BlockRange, Directory, HeaderBlock};
pub use error::{OpusError, Result};
pub use format::{
    BlockIndexEntry, Tag, TypeKey, DATA_MARKER, ENTRY_SIZE, HEADER_LEN, SENTINEL_KEY,
};
pub use options::{Config, DecodeOptions, ReportOptions, RestPolicy, SentinelPolicy};
pub use params::{
    tokenize, CodedText, ParameterBlock, ParameterRecord, ParameterValue, TypeCode,
};
pub use reader::OpusReader;
pub use vocab::Lookup;
