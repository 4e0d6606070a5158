use diskspeed::{BenchmarkEngine, EngineStatus, RunConfig, TestKind};
use tempfile::tempdir;

#[tokio::test]
async fn test_real_files_full_run() {
    let dir = tempdir().unwrap();
    let scratch = dir.path().join("diskspeed_scratch.tmp");
    let engine = BenchmarkEngine::new().with_scratch_path(scratch.clone());

    engine.start(0.25, 2).unwrap();
    engine.wait().await.unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.status, EngineStatus::Idle);
    assert!(!snapshot.running);
    assert_eq!(snapshot.current_iteration, 2);
    assert_eq!(snapshot.progress(), 1.0);

    for kind in TestKind::ALL {
        let result = snapshot.result(kind);
        assert_eq!(result.len(), 2, "{}", kind);
        for &sample in result.samples() {
            assert!(sample.is_finite() && sample >= 0.0);
        }
        assert!(result.min() <= result.avg() && result.avg() <= result.max());
    }

    let logs = engine.logs();
    assert!(logs.iter().any(|l| l.contains("All tests completed")));
    assert!(logs.iter().any(|l| l.contains("Removed scratch file")));
    assert!(!logs.iter().any(|l| l.contains("failed")));
    assert!(!scratch.exists());
}

#[tokio::test]
async fn test_restart_after_completion_uses_new_config() {
    let dir = tempdir().unwrap();
    let engine = BenchmarkEngine::new().with_scratch_path(dir.path().join("scratch.tmp"));

    engine.start(0.125, 1).unwrap();
    engine.wait().await.unwrap();

    let config = RunConfig::default().with_file_size_mb(0.125).with_iterations(3);
    engine.start_with(config).unwrap();
    engine.wait().await.unwrap();

    assert_eq!(engine.iterations(), 3);
    assert_eq!(engine.current_iteration(), 3);
    for result in engine.results() {
        assert_eq!(result.len(), 3);
    }
}

#[tokio::test]
async fn test_settings_file_drives_a_run() {
    let dir = tempdir().unwrap();
    let settings = dir.path().join("diskspeed.toml");

    RunConfig::new(0.125, 2).save_to(&settings).unwrap();
    let config = RunConfig::load_from(&settings).unwrap();

    let engine = BenchmarkEngine::new().with_scratch_path(dir.path().join("scratch.tmp"));
    engine.start_with(config).unwrap();
    engine.wait().await.unwrap();

    assert_eq!(engine.result(TestKind::RandomRead).len(), 2);
}
