//! Position log replay

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::geo::{dm_to_decimal_degrees, haversine_km};
use crate::MetricsError;

/// Accumulated result of replaying one position log
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TripSummary {
    /// Great-circle distance summed over consecutive valid fixes
    pub total_km: f64,
    /// Lines that contributed a position
    pub fixes_used: u64,
    /// Lines skipped as headers, non-RMC records, void fixes, or noise
    pub lines_skipped: u64,
}

struct Fix {
    lat: f64,
    lon: f64,
}

/// Pull a usable fix out of one persisted position line.
///
/// Lines look like `<timestamp>,RMC,<utc>,<status>,<lat>,<N|S>,<lon>,<E|W>,...`.
/// Headers, VTG records, void fixes, zeroed coordinates, and anything that
/// fails to parse all return `None`.
fn parse_fix(line: &str) -> Option<Fix> {
    let mut fields = line.split(',');
    let _timestamp: u64 = fields.next()?.parse().ok()?;
    if fields.next()? != "RMC" {
        return None;
    }
    let _utc = fields.next()?;
    if fields.next()? != "A" {
        return None;
    }
    let lat_dm: f64 = fields.next()?.parse().ok()?;
    let lat_dir = single_char(fields.next()?)?;
    let lon_dm: f64 = fields.next()?.parse().ok()?;
    let lon_dir = single_char(fields.next()?)?;
    if lat_dm == 0.0 || lon_dm == 0.0 {
        return None;
    }
    Some(Fix {
        lat: dm_to_decimal_degrees(lat_dm, lat_dir),
        lon: dm_to_decimal_degrees(lon_dm, lon_dir),
    })
}

fn single_char(field: &str) -> Option<char> {
    let mut chars = field.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Replay a position log file and total the distance travelled.
pub fn replay_log(path: &Path) -> Result<TripSummary, MetricsError> {
    let reader = BufReader::new(File::open(path)?);
    let mut summary = TripSummary::default();
    let mut previous: Option<Fix> = None;
    for line in reader.lines() {
        let line = line?;
        match parse_fix(&line) {
            Some(fix) => {
                if let Some(prev) = &previous {
                    summary.total_km += haversine_km(prev.lat, prev.lon, fix.lat, fix.lon);
                }
                summary.fixes_used += 1;
                previous = Some(fix);
            }
            None => {
                debug!("Skipping line: {}", line);
                summary.lines_skipped += 1;
            }
        }
    }
    Ok(summary)
}
