use std::borrow::Cow;
use syncbar_core::status::RunStatus;
use time::{OffsetDateTime, UtcOffset};

fn minutes(n: u64) -> String {
    format!("{} min", n)
}

pub(super) fn status_text(status: &RunStatus) -> Cow<'static, str> {
    match status {
        RunStatus::NoStatus => "Idle".into(),
        RunStatus::Running(elapsed) => format!("Syncing for {}", minutes(elapsed.minutes)).into(),
        RunStatus::Failed(elapsed) => {
            format!("Sync failed after {}", minutes(elapsed.minutes)).into()
        }
        RunStatus::Succeeded(elapsed) => format!("Synced in {}", minutes(elapsed.minutes)).into(),
    }
}

fn format_local(timestamp: OffsetDateTime, offset: UtcOffset) -> Option<String> {
    let format = time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]");
    timestamp.to_offset(offset).format(format).ok()
}

pub(super) fn details(status: &RunStatus, offset: UtcOffset) -> Option<String> {
    let started_at = format_local(status.started_at()?, offset)?;
    Some(format!("Started {}", started_at))
}

/// The title line followed by detail lines, as consumed by the menu bar.
pub(super) fn render(status: &RunStatus, offset: UtcOffset) -> String {
    let mut out = format!("{}\n", status_text(status));
    if let Some(details) = details(status, offset) {
        out.push_str(&details);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncbar_core::status::Elapsed;
    use time::macros::{datetime, offset};

    fn elapsed(minutes: u64) -> Elapsed {
        Elapsed {
            started_at: datetime!(2022-03-14 10:05:00 UTC),
            minutes,
        }
    }

    #[test]
    fn should_describe_each_status() {
        assert_eq!(status_text(&RunStatus::NoStatus), "Idle");
        assert_eq!(
            status_text(&RunStatus::Running(elapsed(12))),
            "Syncing for 12 min"
        );
        assert_eq!(
            status_text(&RunStatus::Failed(elapsed(3))),
            "Sync failed after 3 min"
        );
        assert_eq!(
            status_text(&RunStatus::Succeeded(elapsed(0))),
            "Synced in 0 min"
        );
    }

    #[test]
    fn should_show_start_time_in_given_offset() {
        let details = details(&RunStatus::Failed(elapsed(3)), offset!(+2));

        assert_eq!(details.as_deref(), Some("Started 2022-03-14 12:05"));
    }

    #[test]
    fn should_have_no_details_without_status() {
        assert_eq!(details(&RunStatus::NoStatus, UtcOffset::UTC), None);
        assert_eq!(render(&RunStatus::NoStatus, UtcOffset::UTC), "Idle\n");
    }

    #[test]
    fn should_render_start_time_in_passed_local_offset() {
        let status = RunStatus::Succeeded(elapsed(7));

        assert_eq!(
            render(&status, offset!(-5)),
            "Synced in 7 min\nStarted 2022-03-14 05:05\n"
        );
    }
}
