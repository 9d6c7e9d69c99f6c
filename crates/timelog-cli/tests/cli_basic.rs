//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary HOME so the
//! database and config never touch the real user directory.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

struct Cli {
    home: TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    /// Run a CLI command and return (exit code, stdout, stderr).
    fn run(&self, args: &[&str]) -> (i32, String, String) {
        let output = Command::new(env!("CARGO_BIN_EXE_timelog"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("TIMELOG_ENV")
            .env_remove("TIMELOG_LOG")
            .env("NOTION_TOKEN", "test-token")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (output.status.code().unwrap_or(-1), stdout, stderr)
    }

    /// Run with `input` piped to stdin.
    fn run_with_stdin(&self, args: &[&str], input: &str) -> (i32, String, String) {
        let mut child = Command::new(env!("CARGO_BIN_EXE_timelog"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("TIMELOG_ENV")
            .env_remove("TIMELOG_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn CLI command");
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
        let output = child.wait_with_output().unwrap();

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (output.status.code().unwrap_or(-1), stdout, stderr)
    }

    fn success(&self, args: &[&str]) -> String {
        let (code, stdout, stderr) = self.run(args);
        assert_eq!(code, 0, "{args:?} failed: {stderr}");
        stdout
    }
}

#[test]
fn test_timer_idle_status() {
    let cli = Cli::new();
    assert_eq!(cli.success(&["timer", "status"]).trim(), "--:--");
    let json: serde_json::Value =
        serde_json::from_str(&cli.success(&["timer", "status", "--json"])).unwrap();
    assert_eq!(json["state"], "idle");
}

#[test]
fn test_timer_lifecycle() {
    let cli = Cli::new();
    let started: serde_json::Value =
        serde_json::from_str(&cli.success(&["timer", "start", "25"])).unwrap();
    assert_eq!(started["length"], 1500);
    assert_eq!(started["parts"].as_array().unwrap().len(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&cli.success(&["timer", "status", "--json"])).unwrap();
    assert_eq!(json["state"], "running");
    assert_eq!(json["paused"], false);

    assert!(cli.success(&["timer", "pause"]).contains("(paused)"));
    assert!(!cli.success(&["timer", "resume"]).contains("(paused)"));

    cli.success(&["timer", "reset"]);
    assert_eq!(cli.success(&["timer", "status"]).trim(), "--:--");
}

#[test]
fn test_timer_rejects_zero_minutes() {
    let cli = Cli::new();
    let (code, _, _) = cli.run(&["timer", "start", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn test_pause_without_interval_fails() {
    let cli = Cli::new();
    let (code, _, stderr) = cli.run(&["timer", "pause"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no interval"));
}

#[test]
fn test_check_recording_follows_timer() {
    let cli = Cli::new();
    assert_eq!(cli.success(&["check-recording"]).trim(), "true");
    cli.success(&["timer", "start", "10"]);
    assert_eq!(cli.success(&["check-recording"]).trim(), "false");
}

#[test]
fn test_classify() {
    let cli = Cli::new();
    assert_eq!(cli.success(&["classify", "会議の準備"]).trim(), "会議");
    let (code, _, stderr) = cli.run(&["classify", "xyz123 unrelated"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no category"));
}

#[test]
fn test_classify_watch_reports_only_the_settled_title() {
    let cli = Cli::new();
    let (code, stdout, stderr) =
        cli.run_with_stdin(&["classify", "--watch"], "会\n会議\n会議の準備\n");
    assert_eq!(code, 0, "{stderr}");
    assert_eq!(stdout, "会議の準備\t会議\n");
}

#[test]
fn test_classify_list() {
    let cli = Cli::new();
    let out = cli.success(&["classify", "--list"]);
    let work = out.find("## Work").unwrap();
    let personal = out.find("## Personal").unwrap();
    assert!(work < personal);
    assert!(out.contains("- 開発"));
}

#[test]
fn test_config_get_set() {
    let cli = Cli::new();
    assert_eq!(cli.success(&["config", "get", "form.default_minutes"]).trim(), "30");
    cli.success(&["config", "set", "form.default_minutes", "45"]);
    assert_eq!(cli.success(&["config", "get", "form.default_minutes"]).trim(), "45");

    let (code, _, _) = cli.run(&["config", "set", "form.default_minutes", "many"]);
    assert_eq!(code, 1);
    let (code, _, stderr) = cli.run(&["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));

    cli.success(&["config", "reset"]);
    assert_eq!(cli.success(&["config", "get", "form.default_minutes"]).trim(), "30");
}

#[test]
fn test_record_requires_database_id() {
    let cli = Cli::new();
    let (code, _, stderr) = cli.run(&["record", "create", "実装"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("notion.database_id"));
    // A failed submission must not leave the form marked as open.
    assert_eq!(cli.success(&["check-recording"]).trim(), "true");
}

#[test]
fn test_record_minutes_must_be_numbers() {
    let cli = Cli::new();
    let (code, _, stderr) = cli.run(&["record", "create", "実装", "--minutes", "ten"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("'minutes' must be a number"), "{stderr}");

    // Negative start offsets parse; the run then stops at the missing database id.
    let (code, _, stderr) = cli.run(&["record", "create", "実装", "--start", "-30"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("notion.database_id"), "{stderr}");
}
