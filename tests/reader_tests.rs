//! Reader, report and configuration: decode from disk and render.

mod common;

use std::io::Write;

use common::{demo_file, params, record, text, OpusBuilder};
use opus::options::Config;
use opus::report::{self, REPORT_ORDER};
use opus::{OpusError, OpusReader, ReportOptions, RestPolicy, SentinelPolicy, TypeKey};

fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn reader_open_demo_file() {
    let file = write_temp(&demo_file());
    let reader = OpusReader::open(file.path()).unwrap();

    assert_eq!(
        reader.keys(),
        vec![TypeKey::new(7, 4, 0, 0), TypeKey::new(160, 0, 0, 0)]
    );
    assert_eq!(reader.samples(TypeKey::new(7, 4, 0, 0)).map(<[f32]>::len), Some(8));
    assert!(reader.parameters(TypeKey::new(160, 0, 0, 0)).is_some());
    assert!(reader.parameters(TypeKey::new(48, 0, 0, 0)).is_none());
}

#[test]
fn reader_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = OpusReader::open(dir.path().join("absent.0")).unwrap_err();
    assert!(matches!(err, OpusError::Io(_)));
}

#[test]
fn reader_truncated_file() {
    let bytes = demo_file();
    let file = write_temp(&bytes[..100]);
    match OpusReader::open(file.path()) {
        Ok(_) => panic!("expected truncated file error"),
        Err(e) => assert!(e.to_string().contains("truncated"), "{e}"),
    }
}

#[test]
fn report_renders_curated_sections() {
    let data = OpusBuilder::new()
        .block(
            [160, 0, 0, 0],
            params(&[
                record("SNM", 4, &text("demo", 8)),
                record("QQQ", 0, &3i32.to_le_bytes()),
            ]),
        )
        .block([7, 4, 0, 0], common::floats(&[1.0; 8]))
        .block([0, 0, 104, 64], b"line one\0\0line two\0\0".to_vec())
        .block([0, 0, 0, 0], params(&[record("NSN", 0, &7i32.to_le_bytes())]))
        .build();
    let reader = OpusReader::from_bytes(data, &Default::default()).unwrap();

    let mut out = Vec::new();
    report::render(&mut out, reader.decoded(), &ReportOptions::default()).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Sample Parameters\n*****************\n"));
    let snm = text.lines().find(|l| l.starts_with("Sample Name")).unwrap();
    assert!(snm.ends_with(" | demo"), "{snm}");
    assert!(text.lines().any(|l| l.starts_with("?QQQ") && l.ends_with(" | 3")));
    assert!(text.contains("block 2: 8 samples"));
    assert!(text.contains("\nline one\nline two\n"));
    assert!(text.contains("(absent)"));
    assert!(text.contains("garbage blocs: 4"));
    assert!(text.lines().any(|l| l.starts_with("Scan Number") && l.ends_with(" | 7")));

    // one banner per curated key plus the garbage block
    let titles = text.lines().filter(|l| l.starts_with('*')).count();
    assert_eq!(titles, 2 * (REPORT_ORDER.len() + 1));
}

#[test]
fn report_can_skip_garbage_blocks() {
    let data = OpusBuilder::new()
        .block([0, 0, 0, 0], params(&[record("NSN", 0, &7i32.to_le_bytes())]))
        .build();
    let reader = OpusReader::from_bytes(data, &Default::default()).unwrap();
    let options = ReportOptions {
        garbage_blocks: false,
    };
    let mut out = Vec::new();
    report::render(&mut out, reader.decoded(), &options).unwrap();
    assert!(!String::from_utf8(out).unwrap().contains("garbage blocs"));
}

#[test]
fn summary_has_one_line_per_block() {
    let reader = OpusReader::from_bytes(demo_file(), &Default::default()).unwrap();
    let mut out = Vec::new();
    report::summary(&mut out, reader.decoded()).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("(160, 0, 0, 0)"));
    assert!(lines[1].contains("1 parameters"));
    assert!(lines[2].contains("8 samples"));
}

#[test]
fn decoded_file_serializes_to_json() {
    let reader = OpusReader::from_bytes(demo_file(), &Default::default()).unwrap();
    let json = serde_json::to_value(reader.decoded()).unwrap();

    assert_eq!(json["maps"]["parameters"]["(160, 0, 0, 0)"]["Single"], 1);
    assert_eq!(json["ranges"][2]["range"]["start"], 84);
    let records = &json["blocks"][1]["Parameters"]["records"];
    assert_eq!(records[0]["tag"], "SNM");
    assert_eq!(records[0]["value"]["Text"], "demo");
}

#[test]
fn config_from_toml() {
    let config = Config::from_toml(
        r#"
        [decode]
        sentinel = "lenient"
        rest = "require-empty"

        [report]
        garbage_blocks = false
        "#,
    )
    .unwrap();
    assert_eq!(config.decode.sentinel, SentinelPolicy::Lenient);
    assert_eq!(config.decode.rest, RestPolicy::RequireEmpty);
    assert!(!config.report.garbage_blocks);

    let empty = Config::from_toml("").unwrap();
    assert_eq!(empty, Config::default());
    assert!(empty.report.garbage_blocks);
}

#[test]
fn config_rejects_unknown_values() {
    assert!(matches!(
        Config::from_toml("[decode]\nsentinel = \"maybe\"\n"),
        Err(OpusError::Config(_))
    ));
    assert!(matches!(Config::from_toml("[decoder]\n"), Err(OpusError::Config(_))));
}

#[test]
fn config_load_from_file() {
    let file = write_temp(b"[decode]\nsentinel = \"require\"\n");
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.decode.sentinel, SentinelPolicy::Require);
}
