//! Inertial measurement unit driver and sampling service
//!
//! Provides the MPU6050 register driver (wake-up, full-scale configuration,
//! bias calibration, corrected reads), a deterministic simulated sampler for
//! bench runs, and `ImuService`, which moves sampling onto a dedicated thread
//! and hands readings to the async pipeline through a bounded channel.

pub mod mpu6050;
pub mod service;
pub mod sim;

use thiserror::Error;

pub use mpu6050::{BiasOffsets, Mpu6050, MPU6050_ADDR};
pub use sample_ring::ImuReading;
pub use service::{ImuService, SamplerConfig};
pub use sim::SimulatedSampler;

/// Errors from the inertial sensor layer
#[derive(Error, Debug)]
pub enum ImuError {
    /// Sensor bring-up (wake, configuration, calibration) failed
    #[error("IMU initialization failed: {0}")]
    Init(String),

    /// A bus transaction during sampling failed
    #[error("IMU read failed: {0}")]
    Read(String),
}

/// Source of corrected inertial readings.
///
/// Implementations may block for the duration of a bus transaction, so
/// callers on an async runtime should drive them through [`ImuService`]
/// rather than sampling inline.
pub trait InertialSampler: Send {
    /// Take one bias-corrected reading.
    fn sample(&mut self) -> Result<ImuReading, ImuError>;
}
