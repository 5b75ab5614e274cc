//! opus-dump: decode an OPUS spectroscopy file and print its blocks.
//!
//! Output: the curated text report (default), a one-line-per-block summary, or the
//! whole decoded structure as JSON.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use opus::options::Config;
use opus::{report, OpusReader, RestPolicy, SentinelPolicy};

#[derive(Parser)]
#[command(name = "opus-dump", version, about = "Decode and print an OPUS spectroscopy file")]
struct Cli {
    /// OPUS file to decode
    file: PathBuf,

    /// Print the decoded structure as JSON
    #[arg(long, conflicts_with = "summary")]
    json: bool,

    /// Print one line per block instead of the report
    #[arg(long)]
    summary: bool,

    /// TOML configuration file ([decode] and [report] sections)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accept parameter blocks that end without an END record
    #[arg(long)]
    lenient: bool,

    /// Reject parameter blocks with bytes after their END record
    #[arg(long)]
    strict_rest: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if cli.lenient {
        config.decode.sentinel = SentinelPolicy::Lenient;
    }
    if cli.strict_rest {
        config.decode.rest = RestPolicy::RequireEmpty;
    }

    let reader = OpusReader::open_with(&cli.file, &config.decode)?;
    let decoded = reader.decoded();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.json {
        serde_json::to_writer_pretty(&mut out, decoded)?;
        writeln!(out)?;
    } else if cli.summary {
        report::summary(&mut out, decoded)?;
    } else {
        report::render(&mut out, decoded, &config.report)?;
    }
    out.flush()?;

    let unresolved = decoded.unresolved();
    if !unresolved.is_empty() {
        log::warn!("{} unresolved tag names or codes", unresolved.len());
    }
    Ok(())
}
