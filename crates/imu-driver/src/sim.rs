//! Deterministic simulated sampler
//!
//! Stands in for the MPU6050 on bench setups with no sensor attached.
//! Readings are hash-derived from a seed and an advancing tick, so two
//! samplers built with the same seed emit identical sequences.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::mpu6050::ACCEL_LSB_PER_G;
use crate::{ImuError, ImuReading, InertialSampler};

/// Hash-driven pseudo sensor emitting plausible at-rest readings
pub struct SimulatedSampler {
    seed: u64,
    tick: u64,
}

impl SimulatedSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed, tick: 0 }
    }

    fn axis(&self, index: u8, span: u64, base: i32) -> i32 {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        self.tick.hash(&mut hasher);
        index.hash(&mut hasher);
        let jitter = (hasher.finish() % span) as i32 - (span / 2) as i32;
        base + jitter
    }
}

impl InertialSampler for SimulatedSampler {
    fn sample(&mut self) -> Result<ImuReading, ImuError> {
        self.tick = self.tick.wrapping_add(1);
        Ok(ImuReading::new(
            self.axis(0, 600, 0),
            self.axis(1, 600, 0),
            // One g stays on Z, matching a live device at rest
            self.axis(2, 600, ACCEL_LSB_PER_G),
            self.axis(3, 200, 0),
            self.axis(4, 200, 0),
            self.axis(5, 200, 0),
        ))
    }
}

impl Default for SimulatedSampler {
    fn default() -> Self {
        Self::new(0x6050)
    }
}
