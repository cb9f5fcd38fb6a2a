//! Post-session trip metrics
//!
//! Replays the position log a recorded session produced and totals the
//! great-circle distance between consecutive valid fixes.

pub mod geo;
pub mod replay;

use thiserror::Error;

pub use geo::{dm_to_decimal_degrees, haversine_km, EARTH_RADIUS_KM};
pub use replay::{replay_log, TripSummary};

/// Errors from the metrics tooling
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("metrics I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
