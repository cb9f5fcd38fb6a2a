//! Storage smoke probe: writes a throwaway log, reads it back, prints it.
//!
//! Exercises the session counter, directory creation, and the durable
//! flush path against whatever card or disk is mounted.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use track_storage::{log_path, next_session, CsvLogFile, LogSink};
use tracker::init_logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Write and read back a probe log file")]
struct Cli {
    /// Directory to probe
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(Level::INFO);

    let session = next_session(&cli.dir.join("probe_session.txt"))?;
    let path = log_path(&cli.dir, "probe_log", session);

    let mut sink = CsvLogFile::create(&path, "Timestamp,Probe")?;
    sink.append_line("0,first probe line")?;
    sink.append_line("1,second probe line")?;
    sink.flush()?;

    let contents =
        fs::read_to_string(&path).with_context(|| format!("reading back {}", path.display()))?;
    println!("Reading from file '{}':", path.display());
    println!("---");
    print!("{contents}");
    println!("---");
    Ok(())
}
