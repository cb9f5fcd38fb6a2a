//! Track recorder entry point

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};

use imu_driver::{ImuService, SimulatedSampler};
use sample_ring::SampleRing;
use track_storage::{log_path, next_session, CsvLogFile, GPS_HEADER, IMU_HEADER};
use tracker::source::{run_replay_source, run_serial_source};
use tracker::{
    init_logging, BootClock, CommitCoordinator, TrackerConfig, GPS_LOG_PREFIX, IMU_LOG_PREFIX,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Wearable GPS+IMU track recorder")]
struct Cli {
    /// TOML config file overriding the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay NMEA bytes from a capture file instead of a serial port
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Milliseconds between replayed batches, mimicking a live receiver
    #[arg(long, value_name = "MS", requires = "replay")]
    replay_pace_ms: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    init_logging(level);

    info!("=== Track Recorder v{} ===", env!("CARGO_PKG_VERSION"));

    let config = TrackerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if !config.imu.simulate {
        anyhow::bail!(
            "this build has no hardware I2C backend; set imu.simulate = true or wire an \
             embedded-hal bus into imu_driver::Mpu6050"
        );
    }

    let session =
        next_session(&config.storage.session_file).context("advancing the session counter")?;
    let gps_path = log_path(&config.storage.gps_dir, GPS_LOG_PREFIX, session);
    let imu_path = log_path(&config.storage.imu_dir, IMU_LOG_PREFIX, session);
    let gps_sink = CsvLogFile::create(&gps_path, GPS_HEADER)
        .with_context(|| format!("creating {}", gps_path.display()))?;
    let imu_sink = CsvLogFile::create(&imu_path, IMU_HEADER)
        .with_context(|| format!("creating {}", imu_path.display()))?;

    info!(
        "Session {}: logging to {} and {}",
        session,
        gps_path.display(),
        imu_path.display()
    );

    info!("Sampling simulated IMU (seed {:#x})", config.imu.seed);
    let sampler = SimulatedSampler::new(config.imu.seed);
    let readings = ImuService::spawn(sampler, config.imu.sampler.clone()).into_receiver();

    let (byte_tx, byte_rx) = mpsc::channel(config.gps.channel_depth.max(1));
    let gps = config.gps.clone();
    let replay = cli.replay.clone();
    let pace = cli.replay_pace_ms.map(Duration::from_millis);
    tokio::spawn(async move {
        let result = match replay {
            Some(path) => run_replay_source(&path, gps.chunk_bytes, pace, byte_tx).await,
            None => run_serial_source(gps, byte_tx).await,
        };
        if let Err(e) = result {
            warn!("GPS source stopped: {:#}", e);
        }
    });

    let coordinator = CommitCoordinator::new(
        SampleRing::new(config.ring.capacity.max(1)),
        BootClock::new(),
        Box::new(gps_sink),
        Box::new(imu_sink),
    );

    tokio::select! {
        stats = coordinator.run(readings, byte_rx) => {
            info!(
                "Recorder finished: {} commits, {} write errors",
                stats.commits, stats.write_errors
            );
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted; every commit is already flushed");
        }
    }

    Ok(())
}
