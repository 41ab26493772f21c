//! Integration tests for the CLI binary
//!
//! These run the built binary against arguments that fail before any
//! request leaves the machine.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cta-tracker"))
        .args(args)
        .env_remove("CTA_API_KEY")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run cta-tracker: {e}"))
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn help_lists_subcommands() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["bus", "train", "snapshot"] {
        assert!(stdout.contains(name), "help is missing {name}: {stdout}");
    }
}

#[test]
fn missing_subcommand_fails() {
    let output = run(&[]);
    assert!(!output.status.success());
}

#[test]
fn conflicting_bus_parameters_rejected() {
    let output = run(&[
        "--api-key",
        "test-key",
        "--bus-url",
        "http://127.0.0.1:1/bustime/api/v3",
        "bus",
        "predictions",
        "--stpid",
        "1001",
        "--vid",
        "8012",
    ]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid argument"), "{}", stderr(&output));
}

#[test]
fn too_many_ids_rejected() {
    let output = run(&[
        "--api-key",
        "test-key",
        "--typed",
        "bus",
        "vehicles",
        "--vid",
        "1,2,3,4,5,6,7,8,9,10,11",
    ]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid argument"), "{}", stderr(&output));
}

#[test]
fn bad_station_id_rejected() {
    let output = run(&["--api-key", "test-key", "train", "arrivals", "--mapid", "123"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("mapid"), "{}", stderr(&output));
}

#[test]
fn blank_api_key_rejected() {
    let output = run(&["--api-key", " ", "bus", "routes"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("api_key"), "{}", stderr(&output));
}
