//! Builders for synthetic OPUS images.

#![allow(dead_code)]

/// Key of the directory block's own entry.
pub const DIR_KEY: [u8; 4] = [0, 0, 0, 0];

/// Builds header words, a directory block and the listed blocks, back to back.
#[derive(Default)]
pub struct OpusBuilder {
    h0: [u8; 12],
    h1: [u8; 12],
    blocks: Vec<([u8; 4], Vec<u8>)>,
    padding_words: usize,
}

impl OpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_words(mut self, h0: [u8; 12], h1: [u8; 12]) -> Self {
        self.h0 = h0;
        self.h1 = h1;
        self
    }

    /// Extra zero words at the end of the directory block.
    pub fn padding_words(mut self, words: usize) -> Self {
        self.padding_words = words;
        self
    }

    pub fn block(mut self, key: [u8; 4], bytes: Vec<u8>) -> Self {
        assert_eq!(bytes.len() % 4, 0, "block length must be whole words");
        self.blocks.push((key, bytes));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let count = self.blocks.len() + 1;
        let dir_len = count * 12 + self.padding_words * 4;

        let mut entries = vec![(DIR_KEY, dir_len, 24usize)];
        let mut offset = 24 + dir_len;
        for (key, bytes) in &self.blocks {
            entries.push((*key, bytes.len(), offset));
            offset += bytes.len();
        }

        let mut out = Vec::with_capacity(offset);
        out.extend_from_slice(&self.h0);
        out.extend_from_slice(&self.h1);
        for (key, len, offset) in entries {
            out.extend_from_slice(&key);
            out.extend_from_slice(&((len / 4) as i32).to_le_bytes());
            out.extend_from_slice(&(offset as i32).to_le_bytes());
        }
        out.resize(24 + dir_len, 0);
        for (_, bytes) in self.blocks {
            out.extend_from_slice(&bytes);
        }
        out
    }
}

/// One parameter record; `payload` must be whole 2-byte words.
pub fn record(tag: &str, type_code: u16, payload: &[u8]) -> Vec<u8> {
    assert_eq!(payload.len() % 2, 0);
    let mut out = [0u8; 4].to_vec();
    out[..tag.len()].copy_from_slice(tag.as_bytes());
    out.extend_from_slice(&type_code.to_le_bytes());
    out.extend_from_slice(&((payload.len() / 2) as u16).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn end() -> Vec<u8> {
    record("END", 0, &[])
}

/// Text NUL-padded to `len` bytes.
pub fn text(s: &str, len: usize) -> Vec<u8> {
    let mut out = s.as_bytes().to_vec();
    out.resize(len, 0);
    out
}

/// Records followed by the END record.
pub fn params(records: &[Vec<u8>]) -> Vec<u8> {
    let mut out: Vec<u8> = records.concat();
    out.extend(end());
    out
}

pub fn floats(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Overwrite a little-endian i32 at `at`.
pub fn set_i32(bytes: &mut [u8], at: usize, value: i32) {
    bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

/// Byte position of the length field of directory slot `slot`.
pub fn length_field(slot: usize) -> usize {
    slot * 12 + 4
}

/// Byte position of the offset field of directory slot `slot`.
pub fn offset_field(slot: usize) -> usize {
    slot * 12 + 8
}

/// Header words, a sample-parameter block with `SNM = "demo"`, and eight samples.
pub fn demo_file() -> Vec<u8> {
    OpusBuilder::new()
        .block(
            [160, 0, 0, 0],
            params(&[record("SNM", 4, &text("demo", 8))]),
        )
        .block(
            [7, 4, 0, 0],
            floats(&[0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5]),
        )
        .build()
}
