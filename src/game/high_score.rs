//! Persisted high score: a single plain-text integer.
//!
//! Read failures fall back to 0 and write failures are logged; neither ever
//! interrupts play.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where the high score lives. The session only talks to this trait so tests
/// can use an in-memory store.
pub trait HighScoreStore {
    /// Current stored value, 0 if there is none or it can't be read.
    fn load(&self) -> i64;
    /// Overwrite the stored value.
    fn save(&mut self, score: i64) -> io::Result<()>;
}

/// High score kept in a text file.
#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file. Surrounding whitespace is ignored; negative
    /// values are accepted as-is.
    pub fn read(&self) -> io::Result<i64> {
        let contents = fs::read_to_string(&self.path)?;
        contents
            .trim()
            .parse::<i64>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl HighScoreStore for HighScoreFile {
    fn load(&self) -> i64 {
        match self.read() {
            Ok(score) => score,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no high score file yet");
                0
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not read high score, using 0"
                );
                0
            }
        }
    }

    fn save(&mut self, score: i64) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, score.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(contents: Option<&str>) -> (tempfile::TempDir, HighScoreFile) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.txt");
        if let Some(contents) = contents {
            fs::write(&path, contents).unwrap();
        }
        (dir, HighScoreFile::new(path))
    }

    #[test]
    fn test_load_valid() {
        let (_dir, store) = store_with(Some("123"));
        assert_eq!(store.load(), 123);
    }

    #[test]
    fn test_load_trailing_newline() {
        let (_dir, store) = store_with(Some("123\n"));
        assert_eq!(store.load(), 123);
    }

    #[test]
    fn test_load_empty_is_zero() {
        let (_dir, store) = store_with(Some(""));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_load_garbage_is_zero() {
        let (_dir, store) = store_with(Some("not_a_number"));
        assert_eq!(store.load(), 0);
        assert_eq!(store.read().unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_load_missing_is_zero() {
        let (_dir, store) = store_with(None);
        assert_eq!(store.load(), 0);
        assert_eq!(store.read().unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_load_negative_kept() {
        let (_dir, store) = store_with(Some("-50"));
        assert_eq!(store.load(), -50);
    }

    #[test]
    fn test_save_overwrites() {
        let (_dir, mut store) = store_with(Some("12345"));
        store.save(100).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "100");
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HighScoreFile::new(dir.path().join("nested").join("hs.txt"));
        store.save(7).unwrap();
        assert_eq!(store.load(), 7);
    }

    #[test]
    fn test_save_failure_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // The target path is a directory, so the write must fail
        let mut store = HighScoreFile::new(dir.path());
        assert!(store.save(10).is_err());
    }
}
