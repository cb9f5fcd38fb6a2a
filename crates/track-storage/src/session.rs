//! Power-cycle session numbering
//!
//! A single counter file survives across power-ons. Each boot reads it,
//! increments, and writes the new value back before any log file is named,
//! so no two sessions ever share a file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::StorageError;

/// Read, increment, and persist the session counter at `path`.
///
/// A missing counter starts at zero, so the first recorded session is
/// number 1. Unreadable contents also restart the count rather than
/// aborting the boot.
pub fn next_session(path: &Path) -> Result<u32, StorageError> {
    let previous = match fs::read_to_string(path) {
        Ok(text) => text.trim().parse::<u32>().unwrap_or_else(|_| {
            warn!(
                "Session counter at {} is not a number, restarting at 0",
                path.display()
            );
            0
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
        Err(e) => return Err(e.into()),
    };
    let session = previous.wrapping_add(1);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(session.to_string().as_bytes())?;
    file.sync_all()?;
    info!("Starting session {}", session);
    Ok(session)
}

/// Path of a session log file: `<dir>/<prefix>_<session>.csv`.
pub fn log_path(dir: &Path, prefix: &str, session: u32) -> PathBuf {
    dir.join(format!("{prefix}_{session}.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_first_boot_is_session_one() {
        let dir = tempdir().unwrap();
        let counter = dir.path().join("session.txt");
        assert_eq!(next_session(&counter).unwrap(), 1);
        assert_eq!(fs::read_to_string(&counter).unwrap(), "1");
    }

    #[test]
    fn test_counter_advances_across_boots() {
        let dir = tempdir().unwrap();
        let counter = dir.path().join("session.txt");
        fs::write(&counter, "7").unwrap();
        assert_eq!(next_session(&counter).unwrap(), 8);
        assert_eq!(next_session(&counter).unwrap(), 9);
    }

    #[test]
    fn test_garbage_counter_restarts_numbering() {
        let dir = tempdir().unwrap();
        let counter = dir.path().join("session.txt");
        fs::write(&counter, "not-a-number").unwrap();
        assert_eq!(next_session(&counter).unwrap(), 1);
    }

    #[test]
    fn test_trailing_newline_is_tolerated() {
        let dir = tempdir().unwrap();
        let counter = dir.path().join("session.txt");
        fs::write(&counter, "41\n").unwrap();
        assert_eq!(next_session(&counter).unwrap(), 42);
    }

    #[test]
    fn test_counter_in_missing_directory_is_created() {
        let dir = tempdir().unwrap();
        let counter = dir.path().join("state").join("session.txt");
        assert_eq!(next_session(&counter).unwrap(), 1);
    }

    #[test]
    fn test_log_path_layout() {
        let path = log_path(Path::new("/mnt/sd"), "gps_log", 3);
        assert_eq!(path, Path::new("/mnt/sd/gps_log_3.csv"));
    }
}
