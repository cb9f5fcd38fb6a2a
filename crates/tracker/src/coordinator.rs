//! Commit coordinator
//!
//! Single owner of the recognizer, the sample ring, and both log sinks.
//! Inertial readings and GPS byte batches arrive over channels; whenever a
//! batch completes at least one sentence, the coordinator opens one commit
//! epoch: a single timestamp, the staged sentence of each type in fixed
//! priority order, the chronological ring snapshot, then a durable flush of
//! both files. Batches that complete nothing write nothing.

use nmea_framing::{Sentence, SentenceCode, SentenceRecognizer};
use sample_ring::{ImuReading, SampleRing};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use track_storage::LogSink;

use crate::clock::Clock;

/// Totals accumulated over the life of the pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    /// Commit epochs opened
    pub commits: u64,
    /// Position lines appended
    pub gps_lines: u64,
    /// Inertial snapshot lines appended
    pub imu_lines: u64,
    /// Readings pushed into the ring
    pub readings: u64,
    /// Append or flush failures tolerated
    pub write_errors: u64,
}

/// Sentences completed since the last commit, at most one per type.
///
/// A second completion of the same type before the commit replaces the
/// first, so an epoch never carries a stale fix.
#[derive(Default)]
struct StagedFixes {
    rmc: Option<Sentence>,
    vtg: Option<Sentence>,
}

impl StagedFixes {
    fn put(&mut self, sentence: Sentence) {
        match sentence.code {
            SentenceCode::Rmc => self.rmc = Some(sentence),
            SentenceCode::Vtg => self.vtg = Some(sentence),
        }
    }

    fn is_empty(&self) -> bool {
        self.rmc.is_none() && self.vtg.is_none()
    }

    fn take(&mut self, code: SentenceCode) -> Option<Sentence> {
        match code {
            SentenceCode::Rmc => self.rmc.take(),
            SentenceCode::Vtg => self.vtg.take(),
        }
    }
}

pub struct CommitCoordinator<C> {
    recognizer: SentenceRecognizer,
    ring: SampleRing,
    clock: C,
    gps_sink: Box<dyn LogSink>,
    imu_sink: Box<dyn LogSink>,
    staged: StagedFixes,
    stats: CommitStats,
}

impl<C: Clock> CommitCoordinator<C> {
    pub fn new(
        ring: SampleRing,
        clock: C,
        gps_sink: Box<dyn LogSink>,
        imu_sink: Box<dyn LogSink>,
    ) -> Self {
        Self {
            recognizer: SentenceRecognizer::new(),
            ring,
            clock,
            gps_sink,
            imu_sink,
            staged: StagedFixes::default(),
            stats: CommitStats::default(),
        }
    }

    /// Push one inertial reading into the ring.
    pub fn handle_reading(&mut self, reading: ImuReading) {
        self.ring.push(reading);
        self.stats.readings += 1;
    }

    /// Run one batch of received GPS bytes through the recognizer, then
    /// commit whatever the batch completed.
    pub fn handle_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if let Some(sentence) = self.recognizer.feed(byte) {
                debug!("Recognized {} sentence", sentence.code.as_str());
                self.staged.put(sentence);
            }
        }
        self.commit();
    }

    /// Totals so far.
    pub fn stats(&self) -> CommitStats {
        self.stats
    }

    /// Drive the pipeline until both input channels close, then report
    /// totals. Inertial readings are drained ahead of byte batches so a
    /// commit always sees every sample taken before it.
    pub async fn run(
        mut self,
        mut readings: mpsc::Receiver<ImuReading>,
        mut batches: mpsc::Receiver<Vec<u8>>,
    ) -> CommitStats {
        let mut readings_open = true;
        let mut batches_open = true;
        while readings_open || batches_open {
            tokio::select! {
                biased;

                reading = readings.recv(), if readings_open => match reading {
                    Some(r) => self.handle_reading(r),
                    None => readings_open = false,
                },
                batch = batches.recv(), if batches_open => match batch {
                    Some(bytes) => self.handle_bytes(&bytes),
                    None => batches_open = false,
                },
            }
        }
        let framing = self.recognizer.stats();
        info!(
            "Pipeline done: {} commits, {} position lines, {} snapshot lines, {} readings",
            self.stats.commits, self.stats.gps_lines, self.stats.imu_lines, self.stats.readings
        );
        if framing.oversized > 0 || framing.unrecognized > 0 {
            info!(
                "Framing: {} oversized frames dropped, {} unrecognized sentences ignored",
                framing.oversized, framing.unrecognized
            );
        }
        self.stats
    }

    /// Persist everything staged under one freshly minted timestamp.
    fn commit(&mut self) {
        if self.staged.is_empty() {
            return;
        }
        let timestamp = self.clock.now_us();
        for code in SentenceCode::IN_PRIORITY_ORDER {
            let Some(sentence) = self.staged.take(code) else {
                continue;
            };
            let line = format!("{},{}", timestamp, sentence.record());
            match self.gps_sink.append_line(&line) {
                Ok(()) => self.stats.gps_lines += 1,
                Err(e) => {
                    self.stats.write_errors += 1;
                    warn!("Dropped position record at {}: {}", timestamp, e);
                }
            }
        }
        for reading in self.ring.snapshot() {
            let line = format!(
                "IMU: {}, {}, {}, {}, {}, {}",
                reading.ax, reading.ay, reading.az, reading.gx, reading.gy, reading.gz
            );
            match self.imu_sink.append_line(&line) {
                Ok(()) => self.stats.imu_lines += 1,
                Err(e) => {
                    self.stats.write_errors += 1;
                    warn!("Dropped inertial snapshot line at {}: {}", timestamp, e);
                }
            }
        }
        if let Err(e) = self.imu_sink.flush() {
            self.stats.write_errors += 1;
            warn!("Inertial log flush failed: {}", e);
        }
        if let Err(e) = self.gps_sink.flush() {
            self.stats.write_errors += 1;
            warn!("Position log flush failed: {}", e);
        }
        self.stats.commits += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use track_storage::MemorySink;

    /// Fixed-step clock: first commit reads 1000, then 2000, and so on.
    struct StepClock(Cell<u64>);

    impl StepClock {
        fn starting_at(t: u64) -> Self {
            Self(Cell::new(t))
        }
    }

    impl Clock for StepClock {
        fn now_us(&self) -> u64 {
            let t = self.0.get();
            self.0.set(t + 1_000);
            t
        }
    }

    fn reading(n: i32) -> ImuReading {
        ImuReading::new(n, 0, 0, 0, 0, 0)
    }

    fn test_coordinator(k: usize) -> (CommitCoordinator<StepClock>, MemorySink, MemorySink) {
        let gps = MemorySink::new();
        let imu = MemorySink::new();
        let coordinator = CommitCoordinator::new(
            SampleRing::new(k),
            StepClock::starting_at(1_000),
            Box::new(gps.clone()),
            Box::new(imu.clone()),
        );
        (coordinator, gps, imu)
    }

    #[test]
    fn test_single_sentence_commit_end_to_end() {
        let (mut c, gps, imu) = test_coordinator(5);
        for n in 1..=5 {
            c.handle_reading(reading(n));
        }
        c.handle_bytes(b"$GPRMC,A*00\r");

        assert_eq!(gps.lines(), vec!["1000,RMC,A*00"]);
        assert_eq!(
            imu.lines(),
            vec![
                "IMU: 1, 0, 0, 0, 0, 0",
                "IMU: 2, 0, 0, 0, 0, 0",
                "IMU: 3, 0, 0, 0, 0, 0",
                "IMU: 4, 0, 0, 0, 0, 0",
                "IMU: 5, 0, 0, 0, 0, 0",
            ]
        );
        assert_eq!(gps.flush_count(), 1);
        assert_eq!(imu.flush_count(), 1);
        let stats = c.stats();
        assert_eq!(stats.commits, 1);
        assert_eq!(stats.gps_lines, 1);
        assert_eq!(stats.imu_lines, 5);
    }

    #[test]
    fn test_batch_without_completion_writes_nothing() {
        let (mut c, gps, imu) = test_coordinator(5);
        c.handle_reading(reading(1));
        c.handle_bytes(b"$GPRMC,partial");

        assert!(gps.lines().is_empty());
        assert!(imu.lines().is_empty());
        assert_eq!(gps.flush_count(), 0);
        assert_eq!(c.stats().commits, 0);

        // The epoch clock only ticks on real commits
        c.handle_bytes(b"*00\r");
        assert_eq!(gps.lines(), vec!["1000,RMC,partial*00"]);
    }

    #[test]
    fn test_both_types_share_one_timestamp_rmc_first() {
        let (mut c, gps, _imu) = test_coordinator(2);
        c.handle_bytes(b"$GPVTG,T,0.3,M*22\r$GPRMC,A*00\r");

        assert_eq!(gps.lines(), vec!["1000,RMC,A*00", "1000,VTG,T,0.3,M*22"]);
        assert_eq!(c.stats().commits, 1);
    }

    #[test]
    fn test_separate_batches_get_distinct_timestamps() {
        let (mut c, gps, _imu) = test_coordinator(2);
        c.handle_bytes(b"$GPRMC,A*00\r");
        c.handle_bytes(b"$GPVTG,T*22\r");

        assert_eq!(gps.lines(), vec!["1000,RMC,A*00", "2000,VTG,T*22"]);
        assert_eq!(c.stats().commits, 2);
    }

    #[test]
    fn test_second_fix_of_same_type_replaces_the_first() {
        let (mut c, gps, _imu) = test_coordinator(2);
        c.handle_bytes(b"$GPRMC,old*01\r$GPRMC,new*02\r");

        assert_eq!(gps.lines(), vec!["1000,RMC,new*02"]);
    }

    #[test]
    fn test_unrecognized_sentences_never_commit() {
        let (mut c, gps, imu) = test_coordinator(2);
        c.handle_bytes(b"$GPGGA,123519,4807.038,N*47\r");

        assert!(gps.lines().is_empty());
        assert!(imu.lines().is_empty());
        assert_eq!(c.stats().commits, 0);
    }

    #[test]
    fn test_cold_ring_snapshot_is_all_placeholders() {
        let (mut c, _gps, imu) = test_coordinator(3);
        c.handle_bytes(b"$GPRMC,A*00\r");

        assert_eq!(
            imu.lines(),
            vec![
                "IMU: 0, 0, 0, 0, 0, 0",
                "IMU: 0, 0, 0, 0, 0, 0",
                "IMU: 0, 0, 0, 0, 0, 0",
            ]
        );
    }

    #[test]
    fn test_snapshot_reflects_only_prior_readings() {
        let (mut c, _gps, imu) = test_coordinator(2);
        c.handle_reading(reading(1));
        c.handle_bytes(b"$GPRMC,A*00\r");
        c.handle_reading(reading(2));
        c.handle_bytes(b"$GPRMC,B*00\r");

        assert_eq!(
            imu.lines(),
            vec![
                "IMU: 0, 0, 0, 0, 0, 0",
                "IMU: 1, 0, 0, 0, 0, 0",
                "IMU: 1, 0, 0, 0, 0, 0",
                "IMU: 2, 0, 0, 0, 0, 0",
            ]
        );
    }

    #[test]
    fn test_position_write_failure_is_tolerated() {
        let (mut c, gps, imu) = test_coordinator(2);
        gps.set_failing(true);
        c.handle_bytes(b"$GPRMC,A*00\r");

        // The record is lost but the snapshot and the loop survive
        assert!(gps.lines().is_empty());
        assert_eq!(imu.lines().len(), 2);
        assert!(c.stats().write_errors >= 1);

        gps.set_failing(false);
        c.handle_bytes(b"$GPRMC,B*00\r");
        assert_eq!(gps.lines(), vec!["2000,RMC,B*00"]);
    }

    #[test]
    fn test_snapshot_write_failures_never_abandon_the_epoch() {
        let (mut c, gps, imu) = test_coordinator(4);
        imu.set_failing(true);
        c.handle_bytes(b"$GPRMC,A*00\r");

        // Every snapshot line and the flush were still attempted
        assert_eq!(gps.lines(), vec!["1000,RMC,A*00"]);
        assert!(imu.lines().is_empty());
        assert_eq!(c.stats().imu_lines, 0);
        assert_eq!(c.stats().write_errors, 4 + 1);
        assert_eq!(c.stats().commits, 1);
        assert_eq!(gps.flush_count(), 1);
    }

    #[test]
    fn test_snapshot_continues_past_a_transient_write_failure() {
        let (mut c, _gps, imu) = test_coordinator(5);
        for n in 1..=5 {
            c.handle_reading(reading(n));
        }
        imu.fail_next_appends(1);
        c.handle_bytes(b"$GPRMC,A*00\r");

        // The oldest line is lost; the remaining four still land in order
        assert_eq!(
            imu.lines(),
            vec![
                "IMU: 2, 0, 0, 0, 0, 0",
                "IMU: 3, 0, 0, 0, 0, 0",
                "IMU: 4, 0, 0, 0, 0, 0",
                "IMU: 5, 0, 0, 0, 0, 0",
            ]
        );
        assert_eq!(c.stats().imu_lines, 4);
        assert_eq!(c.stats().write_errors, 1);
        assert_eq!(imu.flush_count(), 1);
    }

    #[tokio::test]
    async fn test_run_drains_readings_before_committing() {
        let (c, gps, imu) = test_coordinator(5);
        let (reading_tx, reading_rx) = mpsc::channel(16);
        let (byte_tx, byte_rx) = mpsc::channel(16);

        for n in 1..=5 {
            reading_tx.send(reading(n)).await.unwrap();
        }
        byte_tx.send(b"$GPRMC,A*00\r".to_vec()).await.unwrap();
        drop(reading_tx);
        drop(byte_tx);

        let stats = c.run(reading_rx, byte_rx).await;
        assert_eq!(stats.commits, 1);
        assert_eq!(stats.readings, 5);
        assert_eq!(gps.lines(), vec!["1000,RMC,A*00"]);
        assert_eq!(imu.lines().len(), 5);
        assert_eq!(imu.lines()[4], "IMU: 5, 0, 0, 0, 0, 0");
    }
}
