use std::path::Path;
use time::UtcOffset;

pub fn setup(log_file: &Path, verbose: bool, local_offset: UtcOffset) -> eyre::Result<()> {
    use tracing::Level;
    use tracing_subscriber::{
        filter::LevelFilter,
        fmt::{format::FmtSpan, layer, time::OffsetTime},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        Registry,
    };

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let time_format = time::macros::format_description!(
        "[year]-[month]-[day] [hour repr:24]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
    );

    if let Some(dir) = log_file.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = std::fs::File::options()
        .append(true)
        .create(true)
        .open(log_file)?;

    // stdout belongs to the status text, so the console only gets stderr
    Registry::default()
        .with(LevelFilter::from(level))
        .with(
            layer()
                .with_ansi(true)
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(
            layer()
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_timer(OffsetTime::new(local_offset, time_format))
                .with_writer(file),
        )
        .try_init()?;

    Ok(())
}
