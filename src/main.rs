use clap::Parser as _;
use std::process::ExitCode;
use syncbar_runner::Context;
use time::UtcOffset;

mod cli;
mod commands;
mod logging;

async fn run(args: cli::Cli, local_offset: UtcOffset) -> eyre::Result<ExitCode> {
    let workdir = args.workdir()?;
    logging::setup(&workdir.app_log(), args.verbose, local_offset)?;
    workdir.bootstrap()?;
    let ctx = Context::new(workdir);

    if args.start {
        commands::start(&ctx).await
    } else if args.stop {
        commands::stop(&ctx)
    } else {
        commands::status(&ctx, local_offset).await
    }
}

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    // time won't read the local offset once other threads exist
    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let args = cli::Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(args, local_offset))
}
