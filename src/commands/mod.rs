use std::process::ExitCode;
use syncbar_core::config::{Config, ConfigLoadError};
use syncbar_runner::{
    job::{RunError, RunOutcome, Runner},
    schedule,
    stop::{self, StopOutcome},
    Context,
};
use time::UtcOffset;

mod status_text;

async fn load_config(ctx: &Context) -> Result<Config, ConfigLoadError> {
    Config::parse_file(&ctx.workdir.config_file()).await
}

pub async fn start(ctx: &Context) -> eyre::Result<ExitCode> {
    let config = load_config(ctx).await?;
    match Runner::new(ctx).run(&config).await {
        Ok(RunOutcome::Succeeded) => Ok(ExitCode::SUCCESS),
        Ok(RunOutcome::Failed) => {
            tracing::warn!(
                "sync failed, see {} for details",
                ctx.workdir.error_log().display()
            );
            Ok(ExitCode::FAILURE)
        }
        Err(RunError::AlreadyRunning) => {
            tracing::info!("sync already running, not starting another one");
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => Err(error.into()),
    }
}

pub fn stop(ctx: &Context) -> eyre::Result<ExitCode> {
    match stop::stop(ctx)? {
        StopOutcome::NotRunning => println!("No sync running"),
        StopOutcome::Signalled(pid) => println!("Stopping sync (pid {})", pid),
        StopOutcome::StaleLockCleared => println!("Cleared leftover lock of a crashed sync"),
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn status(ctx: &Context, local_offset: UtcOffset) -> eyre::Result<ExitCode> {
    let status = ctx.status()?;
    print!("{}", status_text::render(&status, local_offset));

    // the status line is out already, a broken config only affects scheduling
    match load_config(ctx).await {
        Ok(config) => {
            if let Err(error) = schedule::check(ctx, &config, &status) {
                tracing::warn!("scheduling check failed: {:#}", error);
            }
        }
        Err(error) => tracing::warn!("not scheduling, {}", eyre::Report::new(error)),
    }
    Ok(ExitCode::SUCCESS)
}
