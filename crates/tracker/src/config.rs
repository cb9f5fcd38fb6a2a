//! Runtime configuration
//!
//! Every field has a default matching the reference wiring, so the service
//! runs with no config file at all; a TOML file overrides selectively.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

use imu_driver::SamplerConfig;
use sample_ring::DEFAULT_CAPACITY;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub gps: GpsConfig,
    pub imu: ImuConfig,
    pub ring: RingConfig,
    pub storage: StorageConfig,
}

impl TrackerConfig {
    /// Defaults overlaid with an optional TOML file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&TrackerConfig::default())?);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        builder.build()?.try_deserialize()
    }
}

/// GPS receiver serial link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GpsConfig {
    /// Serial device the receiver is attached to
    pub port: String,
    pub baud_rate: u32,
    /// Bytes read from the port per wakeup
    pub chunk_bytes: usize,
    /// Depth of the bounded byte channel into the pipeline
    pub channel_depth: usize,
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".into(),
            baud_rate: 9600,
            chunk_bytes: 64,
            channel_depth: 32,
        }
    }
}

/// Inertial sensor selection and sampling rate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImuConfig {
    /// Run the deterministic simulated sampler instead of hardware
    pub simulate: bool,
    /// Seed for the simulated sampler
    pub seed: u64,
    pub sampler: SamplerConfig,
}

impl Default for ImuConfig {
    fn default() -> Self {
        Self {
            simulate: true,
            seed: 0x6050,
            sampler: SamplerConfig::default(),
        }
    }
}

/// Inertial snapshot window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Readings retained and persisted per commit epoch
    pub capacity: usize,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Log file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub gps_dir: PathBuf,
    pub imu_dir: PathBuf,
    /// Counter file persisting the session number across power-ons
    pub session_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            gps_dir: "gps_logs".into(),
            imu_dir: "imu_logs".into(),
            session_file: "session_counter.txt".into(),
        }
    }
}
