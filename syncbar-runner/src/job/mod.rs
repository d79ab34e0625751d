use crate::{pid, Context};
use std::{future::Future, time::Duration};
use syncbar_core::{
    config::{Config, ConfigurationInvalid},
    lock::{LockCoordinator, LockError},
    markers::{Marker, MarkerError},
    sync::{self, ExitStatus, SyncCommand},
};

pub mod cancellation;

const TERMINATE_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum RunOutcome {
    Succeeded,
    Failed,
}

impl RunOutcome {
    fn marker(&self) -> Marker {
        match self {
            RunOutcome::Succeeded => Marker::Success,
            RunOutcome::Failed => Marker::Error,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("a sync run is already in progress")]
    AlreadyRunning,
    #[error("refusing to start sync with invalid configuration")]
    ConfigurationInvalid(#[from] ConfigurationInvalid),
    #[error("failed to update run markers")]
    Marker(#[from] MarkerError),
}

impl From<LockError> for RunError {
    fn from(error: LockError) -> Self {
        match error {
            LockError::AlreadyRunning => RunError::AlreadyRunning,
            LockError::Marker(e) => RunError::Marker(e),
        }
    }
}

#[derive(Debug)]
enum Completion {
    Exited(ExitStatus),
    Cancelled(cancellation::Reason),
}

#[derive(Debug)]
pub struct Runner<'a> {
    ctx: &'a Context,
}

impl<'a> Runner<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Runner { ctx }
    }

    /// Runs the sync once, stopping early on a termination signal.
    pub async fn run(&self, config: &Config) -> Result<RunOutcome, RunError> {
        match cancellation::Signals::register() {
            Ok(mut signals) => self.run_until(config, async move { signals.recv().await }).await,
            Err(error) => {
                tracing::warn!(%error, "failed to listen for termination signals, the run can't be stopped");
                self.run_until(config, std::future::pending()).await
            }
        }
    }

    /// Runs the sync once, terminating it if `cancel` resolves first. Only the
    /// first caller across all processes gets past the lock; everyone else gets
    /// `AlreadyRunning` without any marker being touched.
    #[tracing::instrument(name = "run", skip_all)]
    pub async fn run_until(
        &self,
        config: &Config,
        cancel: impl Future<Output = cancellation::Reason>,
    ) -> Result<RunOutcome, RunError> {
        config.validate()?;
        let lock = LockCoordinator::new(&self.ctx.markers).acquire()?;

        let result = self.run_locked(config, cancel).await;

        pid::remove(&self.ctx.workdir.pid_file());
        let released = lock.release();
        let outcome = result?;
        released?;
        tracing::info!(?outcome, "run finished");
        Ok(outcome)
    }

    async fn run_locked(
        &self,
        config: &Config,
        cancel: impl Future<Output = cancellation::Reason>,
    ) -> Result<RunOutcome, RunError> {
        let markers = &self.ctx.markers;
        markers.touch(Marker::Start)?;
        if let Err(error) = pid::write(&self.ctx.workdir.pid_file(), std::process::id()) {
            tracing::warn!(%error, "failed to write pid file, the run can't be stopped");
        }
        markers.remove(Marker::Error)?;
        markers.remove(Marker::Success)?;

        let outcome = match self.sync(config, cancel).await {
            Ok(Completion::Exited(status)) if status.success() => RunOutcome::Succeeded,
            Ok(Completion::Exited(status)) => {
                tracing::error!("{}", status.message());
                RunOutcome::Failed
            }
            Ok(Completion::Cancelled(reason)) => {
                tracing::warn!(?reason, "sync cancelled");
                RunOutcome::Failed
            }
            Err(error) => {
                tracing::error!(%error, "sync failed");
                RunOutcome::Failed
            }
        };

        markers.touch(outcome.marker())?;
        Ok(outcome)
    }

    async fn sync(
        &self,
        config: &Config,
        cancel: impl Future<Output = cancellation::Reason>,
    ) -> Result<Completion, sync::Error> {
        let (stdout_sink, stderr_sink) = self.open_log_sinks().await?;
        let mut process =
            SyncCommand::from_config(config).run(config, &self.ctx.workdir.exclude_file())?;
        tracing::debug!(pid = process.id(), "sync process started");

        tokio::pin!(cancel);
        let reason = tokio::select! {
            status = async {
                process.stream_to(stdout_sink, stderr_sink).await?;
                process.wait().await
            } => return status.map(Completion::Exited),
            reason = &mut cancel => reason,
        };
        process.terminate(TERMINATE_GRACE_PERIOD).await?;
        Ok(Completion::Cancelled(reason))
    }

    async fn open_log_sinks(&self) -> Result<(tokio::fs::File, tokio::fs::File), sync::Error> {
        let workdir = &self.ctx.workdir;
        tokio::fs::create_dir_all(workdir.logs_dir())
            .await
            .map_err(sync::Error::LogSinkError)?;
        let open = |path: std::path::PathBuf| async move {
            tokio::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .await
                .map_err(sync::Error::LogSinkError)
        };
        Ok((open(workdir.output_log()).await?, open(workdir.error_log()).await?))
    }
}
