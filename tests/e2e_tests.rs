//! End-to-end tests for the cirrus binary.
//!
//! These run the real executable:
//! - flag parsing and validation
//! - shell completion generation
//! - console sessions fed through stdin

use assert_cmd::Command;
use predicates::prelude::*;

fn cirrus() -> Command {
    let mut cmd = Command::cargo_bin("cirrus").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Flags
// ============================================================================

mod flags {
    use super::*;

    #[test]
    fn help_lists_flags() {
        cirrus()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--duration"))
            .stdout(predicate::str::contains("--start"))
            .stdout(predicate::str::contains("completions"));
    }

    #[test]
    fn version() {
        cirrus()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("cirrus "));
    }

    #[test]
    fn zero_duration_rejected() {
        cirrus()
            .args(["--duration", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("at least"));
    }

    #[test]
    fn non_numeric_duration_rejected() {
        cirrus()
            .args(["--duration", "soon"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not a number"));
    }

    #[test]
    fn completions_bash() {
        cirrus()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cirrus"));
    }
}

// ============================================================================
// Console sessions
// ============================================================================

#[cfg(not(target_os = "macos"))]
mod console {
    use super::*;

    #[test]
    fn status_then_quit() {
        cirrus()
            .write_stdin("status\nquit\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("stopped 25:00 (25 min)"));
    }

    #[test]
    fn status_json() {
        cirrus()
            .args(["--duration", "4.2"])
            .write_stdin("status json\nq\n")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""phase":"stopped""#))
            .stdout(predicate::str::contains(r#""remainingSeconds":240"#));
    }

    #[test]
    fn preset_reloads_duration() {
        cirrus()
            .write_stdin("preset 10\nstatus\nexit\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("stopped 10:00 (10 min)"));
    }

    #[test]
    fn unknown_command_reported_and_ignored() {
        cirrus()
            .write_stdin("launch\nstatus\nquit\n")
            .assert()
            .success()
            .stderr(predicate::str::contains("unknown command `launch`"))
            .stdout(predicate::str::contains("stopped 25:00"));
    }

    #[test]
    fn start_flag_runs_timer() {
        cirrus()
            .args(["--start", "--duration", "5"])
            .write_stdin("status\nquit\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("running 05:00"));
    }

    #[test]
    fn help_command() {
        cirrus()
            .write_stdin("help\nquit\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("preset <minutes>"));
    }
}
