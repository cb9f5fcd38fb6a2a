//! Persistence layer for track recordings
//!
//! Each power-on gets a fresh session number from an on-disk counter, and
//! every session writes two CSV files: one for position records, one for
//! inertial snapshots. Sinks buffer appends and make them durable on
//! [`LogSink::flush`].

pub mod session;
pub mod sink;

use thiserror::Error;

pub use session::{log_path, next_session};
pub use sink::{CsvLogFile, MemorySink};

/// Header line of the position log
pub const GPS_HEADER: &str = "Timestamp,NMEA";

/// Header line of the inertial log
pub const IMU_HEADER: &str = "Timestamp,IMU_Readings";

/// Errors from the persistence layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying file or directory operation failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The sink refused the record
    #[error("sink rejected a write: {0}")]
    Rejected(String),
}

/// Destination for timestamped log lines.
///
/// Appends may buffer; a record is only durable once `flush` returns `Ok`.
pub trait LogSink: Send {
    /// Append one line. The sink supplies the line terminator.
    fn append_line(&mut self, line: &str) -> Result<(), StorageError>;

    /// Push buffered lines through to durable storage.
    fn flush(&mut self) -> Result<(), StorageError>;
}
