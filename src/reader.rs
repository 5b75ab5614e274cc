//! OPUS reader: read a file fully into memory and decode it.
//!
//! The decoded blocks borrow nothing from the file handle; the reader owns the
//! decoded result and exposes the common lookups.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

use crate::decoder::{self, DecodedFile};
use crate::error::Result;
use crate::format::TypeKey;
use crate::options::DecodeOptions;
use crate::params::ParameterBlock;

/// OPUS reader: decodes a whole file once, then serves lookups.
#[derive(Debug, Clone)]
pub struct OpusReader {
    decoded: DecodedFile,
}

impl OpusReader {
    /// Open and decode an OPUS file with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &DecodeOptions::default())
    }

    /// Open and decode an OPUS file.
    pub fn open_with<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        info!("read {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(data, options)
    }

    /// Decode an in-memory image.
    pub fn from_bytes(data: Vec<u8>, options: &DecodeOptions) -> Result<Self> {
        let decoded = decoder::decode_with(data, options)?;
        info!(
            "decoded {} blocks ({} parameter, {} data, {} unclassified keys)",
            decoded.blocks().len(),
            decoded.maps().parameters.len(),
            decoded.maps().data.len(),
            decoded.maps().unclassified.len()
        );
        Ok(OpusReader { decoded })
    }

    #[must_use]
    pub fn decoded(&self) -> &DecodedFile {
        &self.decoded
    }

    #[must_use]
    pub fn into_decoded(self) -> DecodedFile {
        self.decoded
    }

    /// Parameter block stored under `key`, if any.
    #[must_use]
    pub fn parameters(&self, key: TypeKey) -> Option<&ParameterBlock> {
        self.decoded.parameters(key)
    }

    /// Samples stored under `key`, if any.
    #[must_use]
    pub fn samples(&self, key: TypeKey) -> Option<&[f32]> {
        self.decoded.data(key)
    }

    /// All keys present in any map, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<TypeKey> {
        let maps = self.decoded.maps();
        let mut keys: Vec<TypeKey> = maps
            .parameters
            .keys()
            .chain(maps.data.keys())
            .chain(maps.unclassified.keys())
            .copied()
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}
