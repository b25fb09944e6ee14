use std::{
    path::Path,
    process::{Command, Output},
};

use tempfile::TempDir;

//--------------------------------------------------------------------------------------------------
// Function: Helper
//--------------------------------------------------------------------------------------------------

/// Runs the stackrun binary built for this test with `args`.
fn stackrun(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stackrun"))
        .args(args)
        .env("TERM", "dumb")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute stackrun")
}

/// Creates a project directory, with a config naming `stack` if one is given.
fn create_project(stack: Option<&str>) -> TempDir {
    let temp_dir = TempDir::new().expect("failed to create temp directory");
    if let Some(stack) = stack {
        std::fs::write(
            temp_dir.path().join(".stackrun-config.yaml"),
            format!("stack: {}\n", stack),
        )
        .expect("failed to write project config");
    }

    temp_dir
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp dir path is not utf-8")
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[test]
fn integration_test_help_lists_subcommands() {
    let output = stackrun(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["run", "debug", "test", "stop", "ps", "verify"] {
        assert!(stdout.contains(subcommand), "help should list {subcommand}");
    }
}

#[test]
fn integration_test_run_rejects_port_without_separator() {
    let project = create_project(Some("stacks/nodejs:0.3"));
    let output = stackrun(&[
        "--dry-run",
        "run",
        "--project-dir",
        path_arg(project.path()),
        "-p",
        "3000",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("the port input: 3000 is not valid as the : separator is missing"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn integration_test_run_rejects_out_of_range_port() {
    let project = create_project(Some("stacks/nodejs:0.3"));
    let output = stackrun(&[
        "--dry-run",
        "debug",
        "--project-dir",
        path_arg(project.path()),
        "--publish",
        "3000:65536",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("the numeric port input: 3000:65536 is not valid"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn integration_test_run_requires_project_config() {
    let project = create_project(None);
    let output = stackrun(&["--dry-run", "test", "--project-dir", path_arg(project.path())]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("project configuration error"),
        "unexpected stderr: {stderr}"
    );
}
