use crate::Context;
use std::{
    path::Path,
    process::{Command, Stdio},
};
use syncbar_core::{
    config::{Config, Frequency},
    markers::{Marker, MarkerError},
    status::RunStatus,
};
use time::OffsetDateTime;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Decision {
    Manual,
    AlreadyRunning,
    Due,
    /// `next` is `None` when the interval reaches past the last representable
    /// date, so no automatic run will ever come due.
    NotDue { next: Option<OffsetDateTime> },
}

/// Whether an automatic run should start now. A run is due once a full
/// interval has passed since the last one started, or if none ever did.
pub fn decide(
    frequency: &Frequency,
    status: &RunStatus,
    last_start: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Decision {
    let Some(interval) = frequency.interval() else {
        return Decision::Manual;
    };
    if status.is_running() {
        return Decision::AlreadyRunning;
    }
    match last_start {
        None => Decision::Due,
        Some(last_start) => {
            let next = time::Duration::try_from(interval)
                .ok()
                .and_then(|interval| last_start.checked_add(interval));
            match next {
                Some(next) if next <= now => Decision::Due,
                next => Decision::NotDue { next },
            }
        }
    }
}

/// Starts a run in a separate `--start` process if one is due, so the
/// caller can return to the status bar right away.
#[tracing::instrument(name = "schedule", skip_all)]
pub fn check(ctx: &Context, config: &Config, status: &RunStatus) -> eyre::Result<Decision> {
    let last_start = match ctx.markers.modified_at(Marker::Start) {
        Ok(modified) => Some(modified),
        Err(MarkerError::NotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };
    let decision = decide(
        &config.frequency,
        status,
        last_start,
        OffsetDateTime::now_utc(),
    );
    tracing::debug!(?decision, frequency = %config.frequency);

    if decision == Decision::Due {
        config.validate()?;
        let pid = spawn_detached_run(ctx.workdir.root())?;
        tracing::info!(pid, "started scheduled sync");
    }
    Ok(decision)
}

fn spawn_detached_run(workdir: &Path) -> eyre::Result<u32> {
    let exe = std::env::current_exe()?;
    let child = Command::new(exe)
        .arg("--start")
        .arg("--workdir")
        .arg(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(child.id())
}
