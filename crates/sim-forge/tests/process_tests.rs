//! Process-level tests for sim-forge
//!
//! Each test writes a small shell script standing in for `forge` and runs it
//! through the real [`ProcessExecutor`].

#![cfg(unix)]

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sim_forge::{
    ForgeBinary, ForgeError, ForgeExecutor, ForgeInvocation, ProcessExecutor, Simulator,
};
use sim_types::fixtures::mock_request_body;
use sim_types::{ForgeData, ForgeDefaults, TestStatus};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Writes an executable `forge` script into a fresh temp dir
fn fake_forge(body: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forge");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    (dir, path)
}

/// Collects tracing output on the current thread
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn executor(path: PathBuf) -> ProcessExecutor {
    ProcessExecutor::new(ForgeBinary::Path(path)).with_timeout(Duration::from_secs(30))
}

fn invocation(payload: &str) -> ForgeInvocation {
    let config = ForgeDefaults::default().resolve(None);
    ForgeInvocation::new(&config, payload.to_string())
}

fn foo_request() -> sim_types::SimulationRequest {
    let mut request = mock_request_body();
    request.forge_data = Some(ForgeData {
        contract: Some("Foo_Test".to_string()),
        test: Some("test_bar".to_string()),
        test_relative_path: Some("test/Foo_Test.t.sol".to_string()),
        ..Default::default()
    });
    request
}

// =============================================================================
// 1. Output capture
// =============================================================================

mod capture {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_stderr_and_code() {
        let (_dir, path) = fake_forge("echo out; echo err >&2; exit 0");
        let output = executor(path).execute(&invocation("{}")).await.unwrap();

        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert_eq!(output.code, Some(0));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported_not_raised() {
        let (_dir, path) = fake_forge("echo '{}'; echo 'Error: compiler run failed' >&2; exit 3");
        let output = executor(path).execute(&invocation("{}")).await.unwrap();

        assert_eq!(output.code, Some(3));
        assert!(output.stderr.contains("compiler run failed"));

        let err = output.check().unwrap_err();
        assert!(matches!(err, ForgeError::ProcessExecution { code: Some(3), .. }));
    }

    #[tokio::test]
    async fn test_zero_exit_empty_stdout_fails_check() {
        let (_dir, path) = fake_forge("echo 'swallowed' >&2; exit 0");
        let output = executor(path).execute(&invocation("{}")).await.unwrap();

        assert!(output.stdout.is_empty());
        let err = output.check().unwrap_err();
        assert!(matches!(
            err,
            ForgeError::ProcessExecution {
                code: Some(0),
                empty_stdout: true
            }
        ));
    }

    #[tokio::test]
    async fn test_large_output_on_both_streams() {
        let (_dir, path) = fake_forge(
            "head -c 400000 /dev/zero | tr '\\0' 'a'\nhead -c 300000 /dev/zero | tr '\\0' 'b' >&2",
        );
        let output = executor(path).execute(&invocation("{}")).await.unwrap();

        assert_eq!(output.stdout.len(), 400_000);
        assert_eq!(output.stderr.len(), 300_000);
        assert!(output.stdout.bytes().all(|b| b == b'a'));
        assert!(output.stderr.bytes().all(|b| b == b'b'));
    }
}

// =============================================================================
// 2. Arguments and environment
// =============================================================================

mod environment {
    use super::*;

    #[tokio::test]
    async fn test_payload_env() {
        let (_dir, path) = fake_forge("printf '%s' \"$SIMULATION_JSON_DATA\"");
        let payload = r#"{"backendSigner":"0x01","handleOpsCalldata":""}"#;
        let output = executor(path).execute(&invocation(payload)).await.unwrap();

        assert_eq!(output.stdout, payload);
    }

    #[tokio::test]
    async fn test_profile_color_and_args() {
        let (_dir, path) = fake_forge("echo \"$FOUNDRY_PROFILE|$FORCE_COLOR|$*\"");
        let output = executor(path).execute(&invocation("{}")).await.unwrap();

        assert_eq!(
            output.stdout.trim(),
            "default|1|test --match-contract SimulateEnsoCheckout_Fork_Test \
             --match-test test_simulateHandleOps_1 -vvvv --json --fork-url 127.0.0.1:8545"
        );
    }

    #[tokio::test]
    async fn test_path_includes_binary_dir() {
        let (dir, path) = fake_forge("echo \"$PATH\"");
        let output = executor(path).execute(&invocation("{}")).await.unwrap();

        let last = output.stdout.trim().rsplit(':').next().unwrap().to_string();
        assert_eq!(PathBuf::from(last), dir.path());
    }

    #[tokio::test]
    async fn test_term_is_set() {
        let (_dir, path) = fake_forge("echo \"$TERM\"");
        let output = executor(path).execute(&invocation("{}")).await.unwrap();
        assert!(!output.stdout.trim().is_empty());
    }

    #[tokio::test]
    async fn test_working_dir() {
        let (_dir, path) = fake_forge("pwd");
        let project = TempDir::new().unwrap();
        let output = executor(path)
            .with_working_dir(project.path())
            .execute(&invocation("{}"))
            .await
            .unwrap();

        let reported = std::fs::canonicalize(output.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(project.path()).unwrap());
    }
}

// =============================================================================
// 3. Failures to run
// =============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary() {
        let err = executor(PathBuf::from("/nonexistent/forge"))
            .execute(&invocation("{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::BinaryNotFound(_)));
    }

    #[tokio::test]
    async fn test_not_executable_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forge");
        std::fs::write(&path, "not a program").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = executor(path).execute(&invocation("{}")).await.unwrap_err();
        assert!(matches!(err, ForgeError::ProcessSpawn(_)));
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let (dir, path) = fake_forge("echo $$ > \"$(dirname \"$0\")/pid\"\necho started\nexec sleep 30");
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let started = Instant::now();
        let err = executor(path)
            .with_timeout(Duration::from_millis(500))
            .execute(&invocation("{}"))
            .await
            .unwrap_err();

        assert!(matches!(err, ForgeError::ProcessTimeout(_)));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(logs.contents().contains("started"));

        // `exec` keeps the pid, so this is the sleeping child itself
        let pid = std::fs::read_to_string(dir.path().join("pid")).unwrap();
        let alive = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("kill -0 {}", pid.trim()))
            .stderr(std::process::Stdio::null())
            .status()
            .unwrap();
        assert!(!alive.success());
    }
}

// =============================================================================
// 4. End to end through the simulator
// =============================================================================

mod simulate {
    use super::*;

    fn simulator(body: &str) -> (TempDir, Simulator) {
        let (dir, path) = fake_forge(body);
        let simulator = Simulator::new(Arc::new(executor(path)), ForgeDefaults::default());
        (dir, simulator)
    }

    #[tokio::test]
    async fn test_passing_test() {
        let (_dir, simulator) = simulator(
            r#"cat <<'EOF'
{"test/Foo_Test.t.sol:Foo_Test":{"duration":{"secs":0,"nanos":0},"test_results":{"test_bar()":{"status":"Success","reason":null,"counterexample":null,"logs":[],"decoded_logs":[],"labeled_addresses":{}}}}}
EOF"#,
        );

        let response = simulator.simulate(&foo_request()).await.unwrap();
        assert!(response.success);
        assert_eq!(response.output.unwrap()["test_bar()"].status, TestStatus::Success);
    }

    #[tokio::test]
    async fn test_failing_test() {
        let (_dir, simulator) = simulator(
            r#"cat <<'EOF'
{"test/Foo_Test.t.sol:Foo_Test":{"duration":{"secs":2,"nanos":1},"test_results":{"test_bar()":{"status":"Failure","reason":"FailedOp(0, \"AA33 reverted\")","counterexample":null,"logs":[],"decoded_logs":["funding 1000000 USDC"],"labeled_addresses":{}}}}}
EOF
exit 0"#,
        );

        let response = simulator.simulate(&foo_request()).await.unwrap();
        assert!(!response.success);
        assert!(response.message.contains("test_bar"));
        assert!(response.error.unwrap().contains("AA33"));
    }

    #[tokio::test]
    async fn test_forge_failure_exit_code() {
        // forge exits 1 when a test fails; the report is not decoded
        let (_dir, simulator) = simulator("echo '{\"not\":\"checked\"}'; exit 1");

        let err = simulator.simulate(&foo_request()).await.unwrap_err();
        assert!(matches!(err, ForgeError::ProcessExecution { code: Some(1), .. }));
    }

    #[tokio::test]
    async fn test_truncated_report() {
        let (_dir, simulator) = simulator("printf '%s' '{\"foo\": }'");

        let err = simulator.simulate(&foo_request()).await.unwrap_err();
        assert!(matches!(err, ForgeError::MalformedReport(_)));
    }
}
