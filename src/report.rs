//! Text rendering of a decoded file.
//!
//! Sections follow a fixed, curated key order. Each section is a banner followed by
//! aligned `name | value` rows, a sample count, or the printable pieces of a raw block.

use std::io::{self, Write};

use crate::decoder::{Block, BlockSlot, DecodedFile};
use crate::format::{latin1, Tag, TypeKey, SENTINEL_KEY};
use crate::options::ReportOptions;
use crate::params::{CodedText, ParameterBlock, ParameterValue};
use crate::vocab::{self, Lookup};

/// Section order of the report.
pub const REPORT_ORDER: &[TypeKey] = &[
    TypeKey::new(23, 4, 0, 0),
    TypeKey::new(7, 4, 0, 0),
    TypeKey::new(7, 12, 0, 0),
    TypeKey::new(23, 12, 0, 0),
    TypeKey::new(23, 8, 0, 0),
    TypeKey::new(7, 8, 0, 0),
    TypeKey::new(48, 0, 0, 0),
    TypeKey::new(96, 0, 0, 0),
    TypeKey::new(40, 0, 0, 0),
    TypeKey::new(104, 0, 0, 0),
    TypeKey::new(64, 0, 0, 0),
    TypeKey::new(160, 0, 0, 0),
    TypeKey::new(32, 0, 0, 0),
    TypeKey::new(0, 0, 104, 64),
];

/// Write the full report.
pub fn render<W: Write>(
    out: &mut W,
    file: &DecodedFile,
    options: &ReportOptions,
) -> io::Result<()> {
    let width = vocab::name_width();
    for &key in REPORT_ORDER {
        let label = vocab::block_label(key).map_or_else(|| key.to_string(), str::to_string);
        banner(out, &label)?;

        if let Some(params) = file.parameters(key) {
            write_params(out, params, width)?;
        } else if let Some(index) = file.maps().data.get(&key).and_then(BlockSlot::first) {
            let len = file.data(key).map_or(0, <[f32]>::len);
            writeln!(out, "block {index}: {len} samples")?;
        } else if let Some(raw) = file.unclassified(key) {
            for piece in raw.split(|&b| b == 0).filter(|p| !p.is_empty()) {
                writeln!(out, "{}", latin1(piece))?;
            }
        } else {
            writeln!(out, "(absent)")?;
        }
    }

    if options.garbage_blocks {
        let label = vocab::block_label(SENTINEL_KEY).unwrap_or("garbage blocs");
        for (index, params) in file.parameter_blocks(SENTINEL_KEY) {
            banner(out, &format!("{label}: {index}"))?;
            write_params(out, params, width)?;
        }
    }
    Ok(())
}

/// One line per block: index, key, byte range, class.
pub fn summary<W: Write>(out: &mut W, file: &DecodedFile) -> io::Result<()> {
    for (index, (located, block)) in file.ranges().iter().zip(file.blocks()).enumerate() {
        let detail = match block {
            Block::Header(h) => format!("{} directory entries", h.entries.len()),
            Block::Parameters(p) => format!("{} parameters", p.len()),
            Block::Data(samples) => format!("{} samples", samples.len()),
            Block::Unclassified(range) => format!("{} raw bytes", range.len()),
        };
        writeln!(
            out,
            "{index:>3}  {:<18} {:>8} +{:<8} {:?}: {detail}",
            located.key.to_string(),
            located.range.start,
            located.range.len(),
            block.class()
        )?;
    }
    Ok(())
}

/// Display form of a parameter value.
#[must_use]
pub fn format_value(value: &ParameterValue) -> String {
    match value {
        ParameterValue::Int(v) => v.to_string(),
        ParameterValue::Float(v) => v.to_string(),
        ParameterValue::Text(s) => s.clone(),
        ParameterValue::Coded(CodedText::Resolved { text, .. }) => (*text).to_string(),
        ParameterValue::Coded(CodedText::Unresolved(code)) => format!("?{code}"),
        ParameterValue::Opaque => String::new(),
    }
}

/// Display name of a tag; unknown tags are marked with `?`.
#[must_use]
pub fn display_name(tag: &Tag) -> String {
    match vocab::tag_name(tag) {
        Lookup::Resolved(name) => name.to_string(),
        Lookup::Unresolved => format!("?{tag}"),
    }
}

fn banner<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    let rule = "*".repeat(title.chars().count());
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{rule}")
}

fn write_params<W: Write>(out: &mut W, params: &ParameterBlock, width: usize) -> io::Result<()> {
    for record in params.records() {
        writeln!(
            out,
            "{:<width$} | {}",
            display_name(&record.tag),
            format_value(&record.value)
        )?;
    }
    Ok(())
}
