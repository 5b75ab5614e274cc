//! Directory walk: contiguity, truncation and header padding.

mod common;

use common::{demo_file, floats, length_field, offset_field, set_i32, OpusBuilder};
use opus::{walk, OpusError, TypeKey, HEADER_LEN};

#[test]
fn demo_ranges_tile_the_file() {
    let data = demo_file();
    let dir = walk(&data).unwrap();

    let ranges: Vec<_> = dir.blocks.iter().map(|b| b.range.clone()).collect();
    assert_eq!(ranges, vec![24..60, 60..84, 84..116]);
    assert_eq!(dir.blocks[1].key, TypeKey::new(160, 0, 0, 0));
    assert_eq!(dir.blocks[2].key, TypeKey::new(7, 4, 0, 0));

    assert!(dir.blocks.windows(2).all(|w| w[0].range.end == w[1].range.start));
    assert_eq!(dir.covered_len(), data.len() - HEADER_LEN);
    assert_eq!(dir.header.entries.len(), 3);
}

#[test]
fn header_words_are_preserved() {
    let h0 = [0x0a, 0x0a, 0x0a, 0x0a, 1, 2, 3, 4, 5, 6, 7, 8];
    let h1 = [9; 12];
    let data = OpusBuilder::new()
        .header_words(h0, h1)
        .block([7, 4, 0, 0], floats(&[1.0]))
        .build();

    let dir = walk(&data).unwrap();
    assert_eq!(dir.header.h0, h0);
    assert_eq!(dir.header.h1, h1);
}

#[test]
fn directory_only_file() {
    let data = OpusBuilder::new().build();
    let dir = walk(&data).unwrap();
    assert_eq!(dir.blocks.len(), 1);
    assert_eq!(dir.blocks[0].range, 24..36);
}

#[test]
fn gap_between_blocks_is_malformed() {
    let mut data = demo_file();
    // parameter block one word shorter: ends at 80, data still starts at 84
    set_i32(&mut data, length_field(3), 5);
    match walk(&data) {
        Err(OpusError::MalformedDirectory(msg)) => assert!(msg.contains("gap"), "{msg}"),
        other => panic!("expected gap error, got {other:?}"),
    }
}

#[test]
fn overlapping_blocks_are_malformed() {
    let mut data = demo_file();
    set_i32(&mut data, length_field(3), 7);
    match walk(&data) {
        Err(OpusError::MalformedDirectory(msg)) => assert!(msg.contains("overlap"), "{msg}"),
        other => panic!("expected overlap error, got {other:?}"),
    }
}

#[test]
fn block_past_eof_is_truncated() {
    let mut data = demo_file();
    set_i32(&mut data, length_field(4), 9);
    assert!(matches!(walk(&data), Err(OpusError::TruncatedFile { end: 120, file_len: 116, .. })));
}

#[test]
fn short_file_is_truncated() {
    let data = vec![0u8; 30];
    assert!(matches!(walk(&data), Err(OpusError::TruncatedFile { .. })));
}

#[test]
fn directory_must_follow_header_words() {
    let mut data = demo_file();
    set_i32(&mut data, offset_field(2), 28);
    assert!(matches!(walk(&data), Err(OpusError::MalformedDirectory(_))));
}

#[test]
fn negative_length_is_malformed() {
    let mut data = demo_file();
    set_i32(&mut data, length_field(3), -1);
    assert!(matches!(walk(&data), Err(OpusError::MalformedDirectory(_))));
}

#[test]
fn zero_padding_is_accepted() {
    let data = OpusBuilder::new()
        .padding_words(5)
        .block([7, 4, 0, 0], floats(&[1.0, 2.0]))
        .build();
    let dir = walk(&data).unwrap();
    assert_eq!(dir.blocks[0].range, 24..68);
}

#[test]
fn nonzero_padding_is_malformed() {
    let mut data = OpusBuilder::new()
        .padding_words(2)
        .block([7, 4, 0, 0], floats(&[1.0, 2.0]))
        .build();
    // two entries occupy 24..48; padding is 48..56
    data[50] = 1;
    match walk(&data) {
        Err(OpusError::MalformedDirectory(msg)) => assert!(msg.contains("padding"), "{msg}"),
        other => panic!("expected padding error, got {other:?}"),
    }
}

#[test]
fn directory_too_small_for_its_entries() {
    let mut data = demo_file();
    // directory claims 2 words, data block now starts right after it
    set_i32(&mut data, length_field(2), 2);
    set_i32(&mut data, offset_field(3), 32);
    assert!(walk(&data).is_err());
}

#[test]
fn empty_block_is_malformed() {
    let data = OpusBuilder::new()
        .block([7, 4, 0, 0], Vec::new())
        .block([7, 8, 0, 0], floats(&[1.0, 2.0]))
        .build();
    match walk(&data) {
        Err(OpusError::MalformedDirectory(msg)) => {
            assert!(msg.contains("slot 3") && msg.contains("length 0"), "{msg}");
        }
        other => panic!("expected empty block error, got {other:?}"),
    }
}
