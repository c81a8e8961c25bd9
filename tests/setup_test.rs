//! Setup pass tests, without the long-running processes.

#![cfg(unix)]

use setup_runner::setup::{run_setup, SetupStep, StepStatus};

mod common;

#[tokio::test]
async fn test_steps_run_once_in_order() {
    let (dir, config) = common::project();

    let report = run_setup(&config).await;

    let order: Vec<SetupStep> = report.steps.iter().map(|s| s.step).collect();
    assert_eq!(order, [SetupStep::SchemaImport, SetupStep::CreateAdmin, SetupStep::SeedSample]);
    assert_eq!(report.failures(), 0);
    assert_eq!(common::steps(dir.path()), ["import", "admin", "seed"]);
}

#[tokio::test]
async fn test_every_step_failing_is_still_absorbed() {
    let (dir, mut config) = common::project();
    config.database.client_args = vec![common::fake_db_client(dir.path(), 2)];
    config.setup.create_admin = common::sh("echo admin >> steps.log; exit 1");
    config.setup.seed_sample = common::sh("echo seed >> steps.log; exit 1");

    let report = run_setup(&config).await;

    assert_eq!(report.failures(), 3);
    assert_eq!(common::steps(dir.path()), ["import", "admin", "seed"]);
}

#[tokio::test]
async fn test_hung_step_times_out_and_next_step_runs() {
    let (dir, mut config) = common::project();
    config.setup.step_timeout_secs = 1;
    config.setup.create_admin = common::sh("exec sleep 30");

    let report = run_setup(&config).await;

    match report.status_of(SetupStep::CreateAdmin) {
        Some(StepStatus::Failed(reason)) => assert!(reason.contains("timed out"), "{reason}"),
        other => panic!("unexpected status: {other:?}"),
    }
    assert_eq!(report.status_of(SetupStep::SeedSample), Some(&StepStatus::Completed));
    assert_eq!(common::steps(dir.path()), ["import", "seed"]);
}

#[tokio::test]
async fn test_missing_script_binary_is_a_failure_not_a_panic() {
    let (_dir, mut config) = common::project();
    config.setup.seed_sample = setup_runner::config::CommandSpec::new(
        "definitely-not-a-real-binary-xyz",
        ["seed.php"],
    );

    let report = run_setup(&config).await;

    assert!(matches!(report.status_of(SetupStep::SeedSample), Some(StepStatus::Failed(_))));
    assert_eq!(report.status_of(SetupStep::CreateAdmin), Some(&StepStatus::Completed));
}
