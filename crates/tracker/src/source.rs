//! GPS byte sources
//!
//! Each source owns its port or file and forwards raw byte batches into
//! the pipeline channel. A source ends by dropping its sender, which lets
//! the coordinator drain whatever is buffered and exit cleanly.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info};

use crate::config::GpsConfig;

/// Read NMEA bytes off the receiver's serial port until the port fails or
/// the pipeline hangs up.
pub async fn run_serial_source(config: GpsConfig, tx: mpsc::Sender<Vec<u8>>) -> anyhow::Result<()> {
    let mut port = tokio_serial::new(&config.port, config.baud_rate)
        .open_native_async()
        .with_context(|| format!("opening GPS serial port {}", config.port))?;
    info!(
        "Reading GPS sentences from {} at {} baud",
        config.port, config.baud_rate
    );
    let mut buf = vec![0u8; config.chunk_bytes.max(1)];
    loop {
        let n = port
            .read(&mut buf)
            .await
            .with_context(|| format!("reading from {}", config.port))?;
        if n == 0 {
            info!("Serial port {} closed", config.port);
            return Ok(());
        }
        if tx.send(buf[..n].to_vec()).await.is_err() {
            debug!("Pipeline hung up, stopping serial source");
            return Ok(());
        }
    }
}

/// Replay a captured NMEA byte stream from a file, optionally pacing the
/// batches to mimic a live receiver.
pub async fn run_replay_source(
    path: &Path,
    chunk_bytes: usize,
    pace: Option<Duration>,
    tx: mpsc::Sender<Vec<u8>>,
) -> anyhow::Result<()> {
    let mut file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening replay file {}", path.display()))?;
    info!("Replaying GPS bytes from {}", path.display());
    let mut buf = vec![0u8; chunk_bytes.max(1)];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            info!("Replay of {} finished", path.display());
            return Ok(());
        }
        if tx.send(buf[..n].to_vec()).await.is_err() {
            debug!("Pipeline hung up, stopping replay");
            return Ok(());
        }
        if let Some(delay) = pace {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_replay_source_forwards_every_byte() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"$GPRMC,A*00\r\n$GPVTG,T*22\r\n").unwrap();
        file.flush().unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        run_replay_source(file.path(), 7, None, tx).await.unwrap();

        let mut collected = Vec::new();
        while let Some(batch) = rx.recv().await {
            collected.extend_from_slice(&batch);
        }
        assert_eq!(collected, b"$GPRMC,A*00\r\n$GPVTG,T*22\r\n");
    }

    #[tokio::test]
    async fn test_paced_replay_delivers_every_byte() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"$GPRMC,A*00\r\n$GPVTG,T*22\r\n").unwrap();
        file.flush().unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        run_replay_source(file.path(), 5, Some(Duration::from_millis(1)), tx)
            .await
            .unwrap();

        let mut collected = Vec::new();
        while let Some(batch) = rx.recv().await {
            collected.extend_from_slice(&batch);
        }
        assert_eq!(collected, b"$GPRMC,A*00\r\n$GPVTG,T*22\r\n");
    }

    #[tokio::test]
    async fn test_replay_source_missing_file_is_an_error() {
        let (tx, _rx) = mpsc::channel(1);
        let result = run_replay_source(Path::new("/nonexistent/capture.nmea"), 8, None, tx).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_replay_stops_when_pipeline_hangs_up() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'x'; 256]).unwrap();
        file.flush().unwrap();

        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        run_replay_source(file.path(), 16, None, tx).await.unwrap();
    }
}
