#![cfg(all(unix, feature = "proc"))]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use hk_core::{Progress, RunPlan, Scheduler};
use hk_exec::{ProcConfig, ProcInvoker};
use hk_model::{FailureKind, InvocationError};
use tempfile::TempDir;

/// Writes `body` to a shell script in a fresh directory and returns a command
/// running it through `sh`. The script lives as long as the returned dir.
fn producer(body: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("producer.sh");
    std::fs::write(&path, body).unwrap();
    let cmd = format!("sh {}", path.display());
    (dir, cmd)
}

fn counter() -> (Progress, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    (
        Progress::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }),
        hits,
    )
}

fn plan(command: String, producers: usize, scripts: usize, workers: usize) -> RunPlan {
    RunPlan::new(command)
        .with_producers(producers)
        .with_scripts(scripts)
        .with_workers(workers)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn constant_producer_serialized() {
    let (_dir, cmd) = producer("echo '{\"startDate\":0,\"endDate\":5}'\n");
    let (progress, hits) = counter();

    let results = hk_exec::run(&plan(cmd, 2, 2, 1), Some(progress)).await.unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(hits.load(Ordering::SeqCst), 4);
    for outcome in results.outcomes() {
        assert_eq!(outcome.as_ref().unwrap().duration(), 5.0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn index_dependent_output_lands_in_its_slot() {
    let (_dir, cmd) = producer(
        "echo \"{\\\"startDate\\\":0,\\\"endDate\\\":$((HK_INVOCATION_INDEX * 10))}\"\n",
    );

    let results = hk_exec::run(&plan(cmd, 1, 3, 3), None).await.unwrap();

    assert_eq!(results.durations(), vec![0.0, 10.0, 20.0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn producer_and_script_indices_are_exported() {
    let (_dir, cmd) = producer(
        "echo \"{\\\"startDate\\\":$HK_PRODUCER_INDEX,\\\"endDate\\\":$HK_SCRIPT_INDEX}\"\n",
    );

    let results = hk_exec::run(&plan(cmd, 3, 2, 4), None).await.unwrap();

    for p in 0..3 {
        for s in 0..2 {
            let record = results.at(p, s).unwrap().as_ref().unwrap();
            assert_eq!(record.start_date, p as f64);
            assert_eq!(record.end_date, s as f64);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn arguments_are_passed_through() {
    let (_script_dir, script) = producer("echo \"{\\\"startDate\\\":$1,\\\"endDate\\\":$2}\"\n");
    let cmd = format!("{script}   2.5 \t 7");

    let results = hk_exec::run(&plan(cmd, 1, 2, 2), None).await.unwrap();

    assert_eq!(results.durations(), vec![4.5, 4.5]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn missing_executable_fails_every_slot() {
    let (progress, hits) = counter();
    let cmd = "/nonexistent/hk-producer --flag".to_string();

    let results = hk_exec::run(&plan(cmd, 2, 3, 2), Some(progress)).await.unwrap();

    assert_eq!(results.len(), 6);
    assert_eq!(hits.load(Ordering::SeqCst), 6);
    for (_, cause) in results.failures() {
        assert!(matches!(cause, InvocationError::Spawn(_)), "{cause}");
        assert_eq!(cause.kind(), FailureKind::Execution);
    }
    assert_eq!(results.failure_count(), 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn malformed_output_fails_decoding() {
    let (_dir, cmd) = producer("echo 'this is not json'\n");

    let results = hk_exec::run(&plan(cmd, 2, 2, 4), None).await.unwrap();

    assert_eq!(results.failure_count(), 4);
    assert!(
        results
            .failures()
            .all(|(_, cause)| cause.kind() == FailureKind::Decode)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn array_output_is_not_a_record() {
    let (_dir, cmd) = producer("echo '[0,5]'\n");

    let results = hk_exec::run(&plan(cmd, 1, 2, 2), None).await.unwrap();

    assert_eq!(results.failure_count(), 2);
    for (_, cause) in results.failures() {
        assert!(matches!(cause, InvocationError::Decode(_)), "{cause}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn non_zero_exit_and_signals_are_execution_failures() {
    let (_exit_dir, exit) = producer("echo '{\"startDate\":0,\"endDate\":1}'\nexit 3\n");
    let results = hk_exec::run(&plan(exit, 1, 2, 2), None).await.unwrap();
    for (_, cause) in results.failures() {
        assert_eq!(cause, &InvocationError::NonZeroExit { code: 3 });
    }
    assert_eq!(results.failure_count(), 2);

    let (_killed_dir, killed) = producer("kill -9 $$\n");
    let results = hk_exec::run(&plan(killed, 1, 1, 1), None).await.unwrap();
    assert_eq!(
        results.get(0),
        Some(&Err(InvocationError::KilledBySignal))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stderr_is_ignored() {
    let (_dir, cmd) = producer("echo 'warming up' >&2\necho '{\"startDate\":1,\"endDate\":2}'\n");

    let results = hk_exec::run(&plan(cmd, 1, 1, 1), None).await.unwrap();

    assert_eq!(results.durations(), vec![1.0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_bad_invocation_does_not_stop_the_batch() {
    let (_dir, cmd) = producer(
        "if [ \"$HK_INVOCATION_INDEX\" = 2 ]; then exit 1; fi\necho '{\"startDate\":0,\"endDate\":3}'\n",
    );

    let results = hk_exec::run(&plan(cmd, 2, 3, 3), None).await.unwrap();

    assert_eq!(results.len(), 6);
    let failed: Vec<usize> = results.failures().map(|(i, _)| i).collect();
    assert_eq!(failed, vec![2]);
    assert_eq!(results.durations(), vec![3.0; 5]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn configured_env_and_cwd_reach_the_producer() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("producer.sh"),
        "echo \"{\\\"startDate\\\":0,\\\"endDate\\\":$HK_TEST_END}\"\n",
    )
    .unwrap();

    let invoker = ProcInvoker::new(
        ProcConfig::default()
            .with_cwd(dir.path())
            .with_env("HK_TEST_END", "42"),
    );
    let results = Scheduler::new(Arc::new(invoker))
        .run(&plan("sh producer.sh".into(), 1, 2, 2), None)
        .await
        .unwrap();

    assert_eq!(results.durations(), vec![42.0, 42.0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn gate_bounds_wall_clock_time() {
    let (_dir, cmd) = producer("sleep 0.2\necho '{\"startDate\":0,\"endDate\":1}'\n");

    let started = Instant::now();
    let serial = hk_exec::run(&plan(cmd.clone(), 2, 4, 1), None).await.unwrap();
    let serial_elapsed = started.elapsed();

    let started = Instant::now();
    let parallel = hk_exec::run(&plan(cmd, 2, 4, 50), None).await.unwrap();
    let parallel_elapsed = started.elapsed();

    assert_eq!(serial.failure_count(), 0);
    assert_eq!(parallel.failure_count(), 0);
    assert!(serial_elapsed >= Duration::from_millis(1600), "{serial_elapsed:?}");
    assert!(parallel_elapsed < Duration::from_millis(1200), "{parallel_elapsed:?}");
    assert!(parallel_elapsed < serial_elapsed);
}
