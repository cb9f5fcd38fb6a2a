//! Serial smoke probe: prints every recognized sentence on the console.
//!
//! Useful for checking receiver wiring before recording a session.

use clap::Parser;
use tokio::io::AsyncReadExt;
use tokio_serial::SerialPortBuilderExt;
use tracing::Level;

use nmea_framing::SentenceRecognizer;
use tracker::init_logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Print recognized NMEA sentences from a serial port")]
struct Cli {
    /// Serial device the receiver is attached to
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    port: String,

    #[arg(short, long, default_value_t = 9600)]
    baud: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(Level::INFO);

    let mut port = tokio_serial::new(&cli.port, cli.baud).open_native_async()?;
    let mut recognizer = SentenceRecognizer::new();
    let mut buf = [0u8; 64];

    println!("Waiting for GPS data on {}...", cli.port);
    loop {
        tokio::select! {
            read = port.read(&mut buf) => {
                let n = read?;
                if n == 0 {
                    break;
                }
                for &byte in &buf[..n] {
                    if let Some(sentence) = recognizer.feed(byte) {
                        println!("{}", sentence.record());
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let stats = recognizer.stats();
    println!(
        "{} sentences, {} unrecognized, {} oversized, {} stray terminators",
        stats.emitted, stats.unrecognized, stats.oversized, stats.stray_terminators
    );
    Ok(())
}
