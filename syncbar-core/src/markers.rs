use std::{
    fs::OpenOptions,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use time::OffsetDateTime;

/// The sentinel files that together encode the state of the sync job.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Marker {
    /// A run began.
    Start,
    /// A run is executing right now.
    Lock,
    /// The last completed run failed.
    Error,
    /// The last completed run succeeded.
    Success,
}

impl Marker {
    pub const ALL: [Marker; 4] = [Marker::Start, Marker::Lock, Marker::Error, Marker::Success];

    pub fn file_name(&self) -> &'static str {
        match self {
            Marker::Start => "start",
            Marker::Lock => "lock",
            Marker::Error => "error",
            Marker::Success => "success",
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    #[error("marker '{0}' does not exist")]
    NotFound(Marker),
    #[error("marker '{0}' already exists")]
    AlreadyExists(Marker),
    #[error("i/o error on marker '{0}'")]
    IoError(Marker, #[source] std::io::Error),
}

/// Filesystem-backed marker files. Holds no state besides the directory, so
/// every call reflects what is on disk at that moment.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    dir: PathBuf,
}

impl MarkerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        MarkerStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, marker: Marker) -> PathBuf {
        self.dir.join(marker.file_name())
    }

    fn ensure_dir(&self, marker: Marker) -> Result<(), MarkerError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| MarkerError::IoError(marker, e))
    }

    /// Creates the marker, or bumps its modification time if it's already there.
    pub fn touch(&self, marker: Marker) -> Result<(), MarkerError> {
        self.ensure_dir(marker)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(self.path(marker))
            .map_err(|e| MarkerError::IoError(marker, e))?;
        file.set_modified(std::time::SystemTime::now())
            .map_err(|e| MarkerError::IoError(marker, e))?;
        tracing::debug!(%marker, "touched marker");
        Ok(())
    }

    pub fn remove(&self, marker: Marker) -> Result<(), MarkerError> {
        match std::fs::remove_file(self.path(marker)) {
            Ok(()) => {
                tracing::debug!(%marker, "removed marker");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MarkerError::IoError(marker, e)),
        }
    }

    pub fn exists(&self, marker: Marker) -> bool {
        self.path(marker).is_file()
    }

    pub fn modified_at(&self, marker: Marker) -> Result<OffsetDateTime, MarkerError> {
        let metadata = std::fs::metadata(self.path(marker)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MarkerError::NotFound(marker),
            _ => MarkerError::IoError(marker, e),
        })?;
        let modified = metadata
            .modified()
            .map_err(|e| MarkerError::IoError(marker, e))?;
        Ok(OffsetDateTime::from(modified))
    }

    /// Atomically creates the marker, failing if it already exists. Two
    /// processes racing here can't both succeed.
    pub fn create_exclusive(&self, marker: Marker) -> Result<(), MarkerError> {
        self.ensure_dir(marker)?;
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path(marker))
        {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(MarkerError::AlreadyExists(marker))
            }
            Err(e) => Err(MarkerError::IoError(marker, e)),
        }
    }
}
