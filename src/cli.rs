use std::path::PathBuf;
use syncbar_core::workdir::Workdir;

/// Runs a recurring file sync and reports its status to the menu bar.
///
/// Without flags, prints the current status and starts a sync in the
/// background if the configured frequency says one is due.
#[derive(clap::Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Starts a sync now and waits for it to finish
    #[arg(long, conflicts_with = "stop")]
    pub start: bool,

    /// Stops the running sync
    #[arg(long)]
    pub stop: bool,

    /// Sets a custom working directory for configuration, markers and logs
    #[arg(short, long, env = "SYNCBAR_WORKDIR", value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Logs debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn workdir(&self) -> eyre::Result<Workdir> {
        match &self.workdir {
            Some(path) => Ok(Workdir::new(path)),
            None => Workdir::default_location()
                .ok_or_else(|| eyre::eyre!("failed to get default working directory")),
        }
    }
}
