//! Paths under ~/.racer/ for the high score, config and log files.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Get the ~/.racer/ directory path, creating it if needed.
pub fn racer_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(".racer");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in ~/.racer/.
pub fn data_path(filename: &str) -> io::Result<PathBuf> {
    Ok(racer_dir()?.join(filename))
}

/// Path for a file in ~/.racer/, falling back to the working directory when
/// the home directory is unavailable.
pub fn data_path_or_local(filename: &str) -> PathBuf {
    data_path(filename).unwrap_or_else(|_| PathBuf::from(filename))
}
