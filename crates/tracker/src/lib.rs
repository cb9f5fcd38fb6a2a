//! Track recorder pipeline
//!
//! Wires the framing, sampling, and persistence crates into one running
//! service: byte and reading sources feed channels, and a single
//! coordinator task owns the recognizer, the sample ring, and both log
//! files, so no shared state needs a lock.

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod source;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub use clock::{BootClock, Clock};
pub use config::TrackerConfig;
pub use coordinator::{CommitCoordinator, CommitStats};

/// Install the global log subscriber.
pub fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// File name prefix of per-session position logs
pub const GPS_LOG_PREFIX: &str = "gps_log";

/// File name prefix of per-session inertial logs
pub const IMU_LOG_PREFIX: &str = "imu_log";
