//! Commit epoch timestamps

use std::time::Instant;

/// Monotonic microsecond source for commit epochs.
pub trait Clock: Send {
    /// Microseconds since a fixed origin. Never decreases.
    fn now_us(&self) -> u64;
}

/// Microseconds elapsed since service start
pub struct BootClock {
    origin: Instant,
}

impl BootClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for BootClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for BootClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_clock_is_monotonic() {
        let clock = BootClock::new();
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b >= a);
    }
}
