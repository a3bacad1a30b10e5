//! Process-level startup tests

use std::net::TcpListener;
use std::process::Command;

/// Reserve and release an ephemeral port
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn test_exits_with_status_1_without_artifacts() {
    let work = tempfile::tempdir().unwrap();
    let cwd = work.path().join("service");
    let empty_models = work.path().join("empty");
    std::fs::create_dir_all(&cwd).unwrap();
    std::fs::create_dir_all(&empty_models).unwrap();
    let port = free_port();

    let output = Command::new(env!("CARGO_BIN_EXE_anomaly-scoring-service"))
        .current_dir(&cwd)
        .env("ML_MODELS_DIR", &empty_models)
        .env("ML_SERVICE_HOST", "127.0.0.1")
        .env("ML_SERVICE_PORT", port.to_string())
        .env("RUST_LOG", "info")
        .env_remove("LOG_FORMAT")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Model files not found"), "stderr: {}", stderr);
    assert!(stderr.contains(&empty_models.display().to_string()));
    assert!(!stderr.contains("Server listening"));
    assert!(output.stdout.is_empty());

    // Port was never taken
    assert!(TcpListener::bind(("127.0.0.1", port)).is_ok());
}
