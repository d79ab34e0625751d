use std::{io::ErrorKind, path::Path};

#[derive(Debug, thiserror::Error)]
pub enum PidFileError {
    #[error("no pid recorded in {}", .0.display())]
    Missing(std::path::PathBuf),
    #[error("invalid pid recorded in {}", .0.display())]
    Invalid(std::path::PathBuf),
    #[error("i/o error reading {}", .0.display())]
    IoError(std::path::PathBuf, #[source] std::io::Error),
}

/// Replaces the pid file in one step, readers never see it half written.
pub fn write(path: &Path, pid: u32) -> std::io::Result<()> {
    let partial = path.with_extension("pid.partial");
    std::fs::write(&partial, format!("{}\n", pid))?;
    std::fs::rename(&partial, path)
}

pub fn read(path: &Path) -> Result<u32, PidFileError> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PidFileError::Missing(path.to_owned()),
        _ => PidFileError::IoError(path.to_owned(), e),
    })?;
    contents
        .trim()
        .parse()
        .ok()
        .filter(|pid| *pid > 0)
        .ok_or_else(|| PidFileError::Invalid(path.to_owned()))
}

pub fn remove(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(error) => tracing::warn!(%error, "failed to remove pid file {}", path.display()),
    }
}
