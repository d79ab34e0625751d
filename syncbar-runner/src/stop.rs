use crate::{
    pid::{self, PidFileError},
    Context,
};
use syncbar_core::markers::{Marker, MarkerError};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum StopOutcome {
    NotRunning,
    /// The runner was asked to terminate and will record the failure itself.
    Signalled(u32),
    /// The lock belonged to a runner that no longer exists.
    StaleLockCleared,
}

#[derive(Debug, thiserror::Error)]
pub enum StopError {
    #[error("a sync is running but its process can't be determined")]
    UnknownProcess(#[source] PidFileError),
    #[error("failed to signal sync process {0}")]
    SignalFailed(u32, #[source] std::io::Error),
    #[error("failed to clear stale run markers")]
    Marker(#[from] MarkerError),
}

enum Delivery {
    Delivered,
    NoSuchProcess,
}

#[cfg(unix)]
fn request_termination(pid: u32) -> std::io::Result<Delivery> {
    if unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) } == 0 {
        return Ok(Delivery::Delivered);
    }
    let error = std::io::Error::last_os_error();
    if error.raw_os_error() == Some(libc::ESRCH) {
        Ok(Delivery::NoSuchProcess)
    } else {
        Err(error)
    }
}

#[cfg(not(unix))]
fn request_termination(_pid: u32) -> std::io::Result<Delivery> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "stopping a running sync is only supported on unix",
    ))
}

/// Whether `pid` runs the same program as this process. A lock that outlived
/// its runner (reboot, SIGKILL) leaves a pid behind that may since have been
/// handed to an unrelated process.
#[cfg(target_os = "linux")]
fn runs_this_program(pid: u32) -> bool {
    // the kernel appends this once the binary was replaced on disk
    let program = |path: std::path::PathBuf| {
        path.to_string_lossy()
            .trim_end_matches(" (deleted)")
            .to_owned()
    };
    let theirs = match std::fs::read_link(format!("/proc/{}/exe", pid)) {
        Ok(path) => program(path),
        Err(error) => {
            tracing::debug!(pid, %error, "can't inspect process");
            return false;
        }
    };
    match std::env::current_exe() {
        Ok(ours) => program(ours) == theirs,
        Err(error) => {
            tracing::warn!(%error, "can't determine own executable, assuming pid is a runner");
            true
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn runs_this_program(_pid: u32) -> bool {
    true
}

/// Asks the running sync, if any, to stop. The runner terminates its child
/// process, marks the run failed and releases the lock on its own.
#[tracing::instrument(name = "stop", skip_all)]
pub fn stop(ctx: &Context) -> Result<StopOutcome, StopError> {
    if !ctx.markers.exists(Marker::Lock) {
        tracing::info!("no sync running");
        return Ok(StopOutcome::NotRunning);
    }
    let pid_file = ctx.workdir.pid_file();
    let pid = pid::read(&pid_file).map_err(StopError::UnknownProcess)?;

    let delivery = if runs_this_program(pid) {
        request_termination(pid).map_err(|e| StopError::SignalFailed(pid, e))?
    } else {
        tracing::debug!(pid, "pid no longer belongs to a sync runner");
        Delivery::NoSuchProcess
    };
    match delivery {
        Delivery::Delivered => {
            tracing::info!(pid, "asked sync to stop");
            Ok(StopOutcome::Signalled(pid))
        }
        Delivery::NoSuchProcess => {
            // the runner died without cleaning up after itself, e.g. SIGKILL
            // or a reboot
            tracing::warn!(pid, "sync process is gone, clearing stale lock");
            ctx.markers.touch(Marker::Error)?;
            pid::remove(&pid_file);
            ctx.markers.remove(Marker::Lock)?;
            Ok(StopOutcome::StaleLockCleared)
        }
    }
}
