//! Sampling service
//!
//! Owns the dedicated thread that drives an [`InertialSampler`] at a fixed
//! rate and forwards readings into the async pipeline over a bounded
//! channel. A failed read is logged and skipped; no placeholder reading is
//! forwarded in its place.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{ImuReading, InertialSampler};

/// Sampler thread configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Readings per second taken off the sensor
    pub sample_rate_hz: u32,
    /// Depth of the bounded channel into the pipeline
    pub channel_depth: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 100,
            channel_depth: 100,
        }
    }
}

/// Handle to a running sampler thread
pub struct ImuService {
    receiver: mpsc::Receiver<ImuReading>,
    shutdown: Arc<AtomicBool>,
}

impl ImuService {
    /// Spawn `sampler` on its own thread at the configured rate.
    ///
    /// Bus transactions block, which is why the sampler never runs on the
    /// async runtime itself.
    pub fn spawn<S>(mut sampler: S, config: SamplerConfig) -> Self
    where
        S: InertialSampler + 'static,
    {
        let (tx, receiver) = mpsc::channel(config.channel_depth.max(1));
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let interval = Duration::from_micros(1_000_000 / u64::from(config.sample_rate_hz.max(1)));
        std::thread::spawn(move || {
            let mut read_errors = 0u64;
            while !flag.load(Ordering::SeqCst) {
                match sampler.sample() {
                    Ok(reading) => {
                        // Sync context, so blocking_send rather than an async send
                        if tx.blocking_send(reading).is_err() {
                            debug!("Sample receiver dropped, stopping sampler thread");
                            break;
                        }
                    }
                    Err(e) => {
                        read_errors += 1;
                        warn!("Skipping failed IMU read ({} so far): {}", read_errors, e);
                    }
                }
                std::thread::sleep(interval);
            }
        });
        Self { receiver, shutdown }
    }

    /// Next reading, or `None` once the sampler thread has exited.
    pub async fn next(&mut self) -> Option<ImuReading> {
        self.receiver.recv().await
    }

    /// Hand the receiving half to a select loop. The sampler thread keeps
    /// running until that receiver is dropped.
    pub fn into_receiver(self) -> mpsc::Receiver<ImuReading> {
        self.receiver
    }

    /// Ask the sampler thread to exit after its current iteration.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}
