use crate::{new_fake_sync, Env};
use std::time::Duration;
use syncbar_core::status::RunStatus;
use syncbar_runner::job::{cancellation::Reason, RunOutcome, Runner};

#[tokio::test]
async fn should_have_no_status_before_first_run() {
    let env = Env::new();

    assert_eq!(env.ctx.status().unwrap(), RunStatus::NoStatus);
}

#[tokio::test]
async fn should_report_succeeded_after_successful_run() {
    let env = Env::new();
    let fake = new_fake_sync();

    Runner::new(&env.ctx)
        .run_until(&env.config(&fake), std::future::pending())
        .await
        .unwrap();

    let status = env.ctx.status().unwrap();
    assert!(matches!(status, RunStatus::Succeeded(_)));
    assert_eq!(status.duration_minutes(), Some(0));
}

#[tokio::test]
async fn should_report_failed_after_failed_run() {
    let env = Env::new();
    let fake = new_fake_sync().with_exit_status(12);

    Runner::new(&env.ctx)
        .run_until(&env.config(&fake), std::future::pending())
        .await
        .unwrap();

    assert!(matches!(env.ctx.status().unwrap(), RunStatus::Failed(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn should_report_running_while_sync_is_in_progress() {
    let env = Env::new();
    let fake = new_fake_sync().with_sleep_millis(30_000);
    let config = env.config(&fake);
    let runner = Runner::new(&env.ctx);
    let (stop_send, stop_recv) = tokio::sync::oneshot::channel::<()>();

    let run = runner.run_until(&config, async move {
        let _ = stop_recv.await;
        Reason::StopRequested
    });
    let observe = async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let status = env.ctx.status().unwrap();
        let _ = stop_send.send(());
        status
    };
    let (outcome, status_during_run) = tokio::join!(run, observe);

    assert!(status_during_run.is_running());
    assert_eq!(status_during_run.duration_minutes(), Some(0));
    assert_eq!(outcome.unwrap(), RunOutcome::Failed);
    assert!(matches!(env.ctx.status().unwrap(), RunStatus::Failed(_)));
}
