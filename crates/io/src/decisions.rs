// Decision store persisted to a single JSON file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use claimdesk_review::{DecisionBackend, ReviewError};

use crate::atomic::write_atomic;

/// Decision backend stored at a fixed file path.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DecisionBackend for FileBackend {
    fn load(&self) -> Result<Option<String>, ReviewError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ReviewError::Backend(format!("{}: {e}", self.path.display()))),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| ReviewError::Decode(format!("{}: {e}", self.path.display())))
    }

    fn save(&mut self, payload: &str) -> Result<(), ReviewError> {
        write_atomic(&self.path, payload)
            .map_err(|e| ReviewError::Backend(format!("{}: {e}", self.path.display())))
    }

    /// Move an unreadable store aside as `<file>.bad-<unix secs>`.
    fn quarantine(&mut self) -> Result<(), ReviewError> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let backup = PathBuf::from(format!("{}.bad-{}", self.path.display(), timestamp));

        match fs::rename(&self.path, &backup) {
            Ok(()) => {
                log::warn!("unreadable decision store backed up to {}", backup.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReviewError::Backend(format!(
                "cannot back up {}: {e}",
                self.path.display()
            ))),
        }
    }
}
