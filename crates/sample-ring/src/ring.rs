//! Ring Buffer Implementation

use crate::ImuReading;

/// Default buffer capacity (5 readings per position record at 100Hz/1Hz rates)
pub const DEFAULT_CAPACITY: usize = 5;

/// Fixed-capacity circular buffer of the most recent inertial readings.
///
/// The buffer is owned by exactly one task; mutation (`push`) and reads
/// (`snapshot`) are serialized by program order, so there is no interior
/// locking. Slot `w` (the write cursor) is always the oldest reading and
/// the next to be overwritten.
pub struct SampleRing {
    /// Pre-allocated slot storage
    slots: Box<[ImuReading]>,
    /// Write cursor in [0, capacity)
    cursor: usize,
    /// Total readings pushed (for statistics)
    total_pushed: u64,
}

impl SampleRing {
    /// Create a new ring with the given capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "ring capacity must be at least 1");
        let slots: Vec<ImuReading> = (0..capacity).map(|_| ImuReading::default()).collect();
        Self {
            slots: slots.into_boxed_slice(),
            cursor: 0,
            total_pushed: 0,
        }
    }

    /// Create a ring with the default capacity.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push a reading, overwriting the oldest slot.
    pub fn push(&mut self, reading: ImuReading) {
        self.slots[self.cursor] = reading;
        self.cursor = (self.cursor + 1) % self.slots.len();
        self.total_pushed += 1;
    }

    /// Return all slots in chronological order, oldest first.
    ///
    /// The walk starts at the write cursor and wraps once around the
    /// buffer. Until `capacity()` pushes have occurred the result still
    /// has `capacity()` entries: the leading ones are the zero-valued
    /// placeholder readings, which callers must tolerate early in a
    /// session.
    pub fn snapshot(&self) -> Vec<ImuReading> {
        let k = self.slots.len();
        (0..k).map(|i| self.slots[(self.cursor + i) % k]).collect()
    }

    /// Get the buffer capacity.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Get the total number of readings pushed.
    pub fn total_pushed(&self) -> u64 {
        self.total_pushed
    }

    /// True once every slot holds a real reading (no placeholders left).
    pub fn is_warm(&self) -> bool {
        self.total_pushed >= self.slots.len() as u64
    }
}

impl Default for SampleRing {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reading(n: i32) -> ImuReading {
        ImuReading::new(n, n + 1, n + 2, n + 3, n + 4, n + 5)
    }

    #[test]
    fn test_snapshot_before_fill_pads_with_placeholders() {
        let mut ring = SampleRing::new(5);
        ring.push(reading(1));
        ring.push(reading(2));

        let snap = ring.snapshot();
        assert_eq!(snap.len(), 5);
        assert_eq!(&snap[..3], &[ImuReading::default(); 3]);
        assert_eq!(snap[3], reading(1));
        assert_eq!(snap[4], reading(2));
        assert!(!ring.is_warm());
    }

    #[test]
    fn test_snapshot_after_exact_fill() {
        let mut ring = SampleRing::new(5);
        for n in 1..=5 {
            ring.push(reading(n));
        }

        let snap = ring.snapshot();
        let expected: Vec<_> = (1..=5).map(reading).collect();
        assert_eq!(snap, expected);
        assert!(ring.is_warm());
    }

    #[test]
    fn test_overwrite_drops_oldest_first() {
        let mut ring = SampleRing::new(5);
        for n in 1..=7 {
            ring.push(reading(n));
        }

        // R1 and R2 were overwritten; R3..R7 remain in order
        let expected: Vec<_> = (3..=7).map(reading).collect();
        assert_eq!(ring.snapshot(), expected);
        assert_eq!(ring.total_pushed(), 7);
    }

    #[test]
    fn test_capacity_one_keeps_last() {
        let mut ring = SampleRing::new(1);
        ring.push(reading(1));
        ring.push(reading(2));
        assert_eq!(ring.snapshot(), vec![reading(2)]);
    }

    proptest! {
        /// After n pushes into a ring of capacity k, the snapshot is the
        /// last k readings oldest-to-newest, padded in front with
        /// placeholders when n < k.
        #[test]
        fn snapshot_is_chronological(k in 1usize..=16, n in 0usize..=64) {
            let mut ring = SampleRing::new(k);
            for i in 0..n {
                ring.push(reading(i as i32 + 1));
            }

            let mut expected = Vec::with_capacity(k);
            for _ in 0..k.saturating_sub(n) {
                expected.push(ImuReading::default());
            }
            let first = n.saturating_sub(k) + 1;
            for i in first..=n {
                expected.push(reading(i as i32));
            }

            prop_assert_eq!(ring.snapshot(), expected);
        }
    }
}
