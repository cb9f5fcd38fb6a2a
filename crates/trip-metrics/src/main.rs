//! Trip distance CLI

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use trip_metrics::replay_log;

#[derive(Parser, Debug)]
#[command(author, version, about = "Total distance covered by a recorded position log")]
struct Cli {
    /// Position log produced by the track recorder
    log: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let summary = replay_log(&cli.log)?;
    info!(
        "Replayed {}: {} fixes used, {} lines skipped",
        cli.log.display(),
        summary.fixes_used,
        summary.lines_skipped
    );
    println!("Total Distance: {:.2} km", summary.total_km);
    Ok(())
}
