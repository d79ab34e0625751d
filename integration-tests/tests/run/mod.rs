use crate::{new_fake_sync, Env};
use std::time::Duration;
use syncbar_core::markers::Marker;
use syncbar_runner::job::{cancellation::Reason, RunError, RunOutcome, Runner};

async fn stop_after(millis: u64) -> Reason {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Reason::StopRequested
}

#[tokio::test]
async fn should_leave_start_and_success_markers_after_successful_run() {
    let env = Env::new();
    let fake = new_fake_sync().with_exit_status(0);

    let outcome = Runner::new(&env.ctx)
        .run_until(&env.config(&fake), std::future::pending())
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Succeeded);
    assert_eq!(env.present_markers(), vec![Marker::Start, Marker::Success]);
    assert!(!env.ctx.workdir.pid_file().exists());
}

#[tokio::test]
async fn should_leave_start_and_error_markers_after_failed_run() {
    let env = Env::new();
    let fake = new_fake_sync().with_exit_status(1);

    let outcome = Runner::new(&env.ctx)
        .run_until(&env.config(&fake), std::future::pending())
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Failed);
    assert_eq!(env.present_markers(), vec![Marker::Start, Marker::Error]);
}

#[tokio::test]
async fn should_replace_outcome_of_previous_run() {
    let env = Env::new();
    let runner = Runner::new(&env.ctx);
    let failing = new_fake_sync().with_exit_status(23);
    let succeeding = new_fake_sync();

    runner
        .run_until(&env.config(&failing), std::future::pending())
        .await
        .unwrap();
    let outcome = runner
        .run_until(&env.config(&succeeding), std::future::pending())
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Succeeded);
    assert_eq!(env.present_markers(), vec![Marker::Start, Marker::Success]);
}

#[tokio::test]
async fn should_pass_additional_arguments_exclude_file_source_and_destination() {
    let env = Env::new();
    let fake = new_fake_sync();

    Runner::new(&env.ctx)
        .run_until(&env.config(&fake), std::future::pending())
        .await
        .unwrap();

    let exclude_from = format!(
        "--exclude-from={}",
        env.ctx.workdir.exclude_file().display()
    );
    fake.assert_args(&[
        "--archive",
        "--delete",
        &exclude_from,
        "/data/source/",
        "backup-host:/srv/backup",
    ]);
}

#[tokio::test]
async fn should_write_output_to_log_files() {
    let env = Env::new();
    let fake = new_fake_sync()
        .with_stdout("sending incremental file list\nfile1\nfile2\n")
        .with_stderr("rsync: some files vanished\n")
        .with_exit_status(24);

    Runner::new(&env.ctx)
        .run_until(&env.config(&fake), std::future::pending())
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(env.ctx.workdir.output_log()).unwrap(),
        "sending incremental file list\nfile1\nfile2\n"
    );
    assert_eq!(
        std::fs::read_to_string(env.ctx.workdir.error_log()).unwrap(),
        "rsync: some files vanished\n"
    );
}

#[tokio::test]
async fn should_succeed_when_output_is_not_utf8() {
    let env = Env::new();
    let fake = new_fake_sync()
        .with_stdout(b"sending incremental file list\ncaf\xe9.txt\n")
        .with_exit_status(0);

    let outcome = Runner::new(&env.ctx)
        .run_until(&env.config(&fake), std::future::pending())
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Succeeded);
    assert_eq!(env.present_markers(), vec![Marker::Start, Marker::Success]);
    assert_eq!(
        std::fs::read(env.ctx.workdir.output_log()).unwrap(),
        b"sending incremental file list\ncaf\xe9.txt\n"
    );
}

#[tokio::test]
async fn should_append_to_log_files_across_runs() {
    let env = Env::new();
    let runner = Runner::new(&env.ctx);
    let first = new_fake_sync().with_stdout("first\n");
    let second = new_fake_sync().with_stdout("second\n");

    runner
        .run_until(&env.config(&first), std::future::pending())
        .await
        .unwrap();
    runner
        .run_until(&env.config(&second), std::future::pending())
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(env.ctx.workdir.output_log()).unwrap(),
        "first\nsecond\n"
    );
}

#[tokio::test]
async fn should_not_run_while_lock_is_held() {
    let env = Env::new();
    let fake = new_fake_sync();
    env.ctx.markers.touch(Marker::Lock).unwrap();

    let result = Runner::new(&env.ctx)
        .run_until(&env.config(&fake), std::future::pending())
        .await;

    assert!(matches!(result, Err(RunError::AlreadyRunning)));
    assert_eq!(env.present_markers(), vec![Marker::Lock]);
    assert!(!fake.was_run());
}

#[tokio::test]
async fn should_allow_only_one_of_two_concurrent_runs() {
    let env = Env::new();
    let fake = new_fake_sync().with_sleep_millis(500);
    let config = env.config(&fake);
    let runner = Runner::new(&env.ctx);

    let (first, second) = tokio::join!(
        runner.run_until(&config, std::future::pending()),
        runner.run_until(&config, std::future::pending()),
    );

    let already_running = [&first, &second]
        .iter()
        .filter(|r| matches!(r, Err(RunError::AlreadyRunning)))
        .count();
    let succeeded = [&first, &second]
        .iter()
        .filter(|r| matches!(r, Ok(RunOutcome::Succeeded)))
        .count();
    assert_eq!((already_running, succeeded), (1, 1));
    assert!(!env.ctx.markers.exists(Marker::Lock));
}

#[cfg(unix)]
#[tokio::test]
async fn should_terminate_sync_and_record_failure_when_cancelled() {
    let env = Env::new();
    let fake = new_fake_sync().with_sleep_millis(30_000);

    let started = std::time::Instant::now();
    let outcome = Runner::new(&env.ctx)
        .run_until(&env.config(&fake), stop_after(300))
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Failed);
    assert!(started.elapsed() < Duration::from_secs(20));
    assert_eq!(env.present_markers(), vec![Marker::Start, Marker::Error]);
    assert!(!env.ctx.workdir.pid_file().exists());
}
