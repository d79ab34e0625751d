use crate::{config::CONFIG_TEMPLATE, markers::MarkerStore};
use dirs_next as dirs;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// The directory holding everything syncbar keeps on disk: markers, logs,
/// configuration, the exclude file and the pid of a running sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workdir(PathBuf);

impl Workdir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Workdir(root.into())
    }

    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Workdir(dir.join("syncbar")))
    }

    pub fn root(&self) -> &Path {
        &self.0
    }

    pub fn markers_dir(&self) -> PathBuf {
        self.0.join("markers")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.0.join("logs")
    }

    pub fn config_file(&self) -> PathBuf {
        self.0.join("config.toml")
    }

    pub fn exclude_file(&self) -> PathBuf {
        self.0.join("excludes.txt")
    }

    pub fn pid_file(&self) -> PathBuf {
        self.0.join("sync.pid")
    }

    /// Receives the sync program's standard output.
    pub fn output_log(&self) -> PathBuf {
        self.logs_dir().join("sync.log")
    }

    /// Receives the sync program's standard error.
    pub fn error_log(&self) -> PathBuf {
        self.logs_dir().join("sync-error.log")
    }

    pub fn app_log(&self) -> PathBuf {
        self.logs_dir().join("syncbar.log")
    }

    pub fn marker_store(&self) -> MarkerStore {
        MarkerStore::new(self.markers_dir())
    }

    /// Creates the directory layout and seeds the config template and an
    /// empty exclude file. Existing files are left alone.
    pub fn bootstrap(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.markers_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        write_if_absent(&self.config_file(), CONFIG_TEMPLATE)?;
        write_if_absent(&self.exclude_file(), "")?;
        Ok(())
    }
}

fn write_if_absent(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;

    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(mut file) => {
            tracing::info!("created {}", path.display());
            file.write_all(contents.as_bytes())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e),
    }
}
