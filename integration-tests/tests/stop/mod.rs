use crate::{new_fake_sync, Env};
use std::time::{Duration, Instant};
use syncbar_core::markers::Marker;
use syncbar_runner::{
    job::{RunOutcome, Runner},
    stop::{self, StopOutcome},
};

#[tokio::test]
async fn should_report_not_running_without_lock() {
    let env = Env::new();

    assert_eq!(stop::stop(&env.ctx).unwrap(), StopOutcome::NotRunning);
    assert!(env.present_markers().is_empty());
}

// The runner lives in this process, so stopping it sends SIGTERM here. It is
// only safe once the runner has installed its signal handlers, which happens
// before the pid file is written.
#[cfg(unix)]
#[tokio::test]
async fn should_terminate_running_sync_and_record_failure() {
    let env = Env::new();
    let fake = new_fake_sync().with_sleep_millis(30_000);
    let config = env.config(&fake);
    let pid_file = env.ctx.workdir.pid_file();

    let runner = Runner::new(&env.ctx);
    let started = Instant::now();
    let (outcome, stopped) = tokio::join!(runner.run(&config), async {
        while !pid_file.exists() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        stop::stop(&env.ctx)
    });

    assert_eq!(
        stopped.unwrap(),
        StopOutcome::Signalled(std::process::id())
    );
    assert_eq!(outcome.unwrap(), RunOutcome::Failed);
    assert!(started.elapsed() < Duration::from_secs(20));
    assert!(fake.was_run());
    assert_eq!(env.present_markers(), vec![Marker::Start, Marker::Error]);
    assert!(!pid_file.exists());
}
