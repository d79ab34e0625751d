use crate::config::Config;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::process::Command;

pub use process::*;

pub mod paths;
mod process;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to start sync process {}", .0.display())]
    FailedToStartSyncProcess(PathBuf, #[source] std::io::Error),
    #[error("error reading from subprocess output")]
    SubprocessIoError(#[source] std::io::Error),
    #[error("error writing subprocess output to log")]
    LogSinkError(#[source] std::io::Error),
    #[error("error getting subprocess status")]
    SubprocessStatusError(#[source] std::io::Error),
    #[error("error killing process")]
    SubprocessTerminateError(#[source] std::io::Error),
}

/// The external copy program, `rsync` or anything accepting the same
/// trailing `--exclude-from=FILE SOURCE DESTINATION` arguments.
#[derive(Debug, Clone)]
pub struct SyncCommand {
    executable: PathBuf,
}

impl SyncCommand {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        SyncCommand {
            executable: executable.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.executable_path.clone())
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn args(config: &Config, exclude_file: &Path) -> Vec<OsString> {
        let mut args = config
            .additional_arguments
            .iter()
            .map(OsString::from)
            .collect::<Vec<_>>();
        let mut exclude_from = OsString::from("--exclude-from=");
        exclude_from.push(exclude_file);
        args.push(exclude_from);
        args.push(paths::expand_local(&config.source).into_os_string());
        args.push(paths::expand_destination(&config.destination));
        args
    }

    /// Launches the program with its output piped, ready for
    /// [`SyncProcess::stream_to`].
    pub fn run(&self, config: &Config, exclude_file: &Path) -> Result<SyncProcess, Error> {
        let args = Self::args(config, exclude_file);
        tracing::info!(executable = %self.executable.display(), ?args, "starting sync");

        let mut cmd = Command::new(&self.executable);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // kill-on-drop is a final fallback, normally the process gets terminated gracefully
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| Error::FailedToStartSyncProcess(self.executable.clone(), e))?;
        Ok(SyncProcess(child))
    }
}
