//! End-to-end console sessions driven through stdin

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONFIG_VARS: [&str; 8] = [
    "ENABLE_COLOR",
    "LOG_LEVEL",
    "CHECK_TIMEOUT_SECONDS",
    "LOOKUP_TIMEOUT_SECONDS",
    "GEO_API_URL",
    "IPV4_RANGES_URL",
    "IPV6_RANGES_URL",
    "DSTAT_INTERVAL_MS",
];

/// Console binary with a clean configuration environment, run from an empty directory
fn console(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("netdiag").unwrap();
    cmd.current_dir(dir.path()).arg("--no-color");
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_unknown_command_then_exit() {
    let dir = TempDir::new().unwrap();
    console(&dir)
        .write_stdin("help\nbadcmd\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type 'help' for available commands"))
        .stdout(predicate::str::contains("DSTAT  - Network and system statistics monitor"))
        .stdout(predicate::str::contains("CFIP   - CloudFlare IP range finder"))
        .stdout(predicate::str::contains(
            "[ERROR] Command 'BADCMD' not found. Type 'help' for available commands.",
        ))
        .stdout(predicate::str::contains("[INFO] Goodbye!"));
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    console(&dir)
        .write_stdin("\n   \n")
        .assert()
        .success()
        .stdout(predicate::str::contains("@netdiag:~# "))
        .stdout(predicate::str::contains("Goodbye!").not());
}

#[test]
fn test_exit_from_sub_prompt_ends_session() {
    let dir = TempDir::new().unwrap();
    console(&dir)
        .write_stdin("check\nLOGOUT\nhelp\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("give-me-ipaddress# "))
        .stdout(predicate::str::contains("Available Tools:").not())
        .stdout(predicate::str::contains("Goodbye!").not());
}

#[test]
fn test_invalid_utf8_input_keeps_session_alive() {
    let dir = TempDir::new().unwrap();
    console(&dir)
        .write_stdin(&b"caf\xe9\nhelp\nexit\n"[..])
        .assert()
        .success()
        .stdout(predicate::str::contains("Available Tools:"))
        .stdout(predicate::str::contains("[INFO] Goodbye!"));
}

#[test]
fn test_back_then_exit_alias() {
    let dir = TempDir::new().unwrap();
    console(&dir)
        .write_stdin("dns\nback\nQ\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("give-me-domain# "))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_conflicting_color_flags_fail() {
    let dir = TempDir::new().unwrap();
    console(&dir)
        .arg("--color")
        .write_stdin("exit\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--color"));
}

#[test]
fn test_invalid_environment_value_fails() {
    let dir = TempDir::new().unwrap();
    console(&dir)
        .env("CHECK_TIMEOUT_SECONDS", "0")
        .write_stdin("exit\n")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_env_file_is_validated() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "GEO_API_URL=ftp://geo.example.com/\n").unwrap();

    console(&dir)
        .write_stdin("exit\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("GEO_API_URL").or(predicate::str::contains("http")));
}
