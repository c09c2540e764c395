/// CLI integration tests for zorg
///
/// These tests exercise the CLI as a black box against a fresh temporary
/// database: argument parsing, scope validation, empty-state output and
/// the JSON emitters.
use predicates::prelude::*;

mod helpers;
use helpers::CliTestHarness;

const CAREGIVER: &str = "0190f7a0-5bfa-7000-8000-000000000001";
const CLIENT: &str = "0190f7a0-5bfa-7000-8000-000000000002";

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("reconciliation"))
        .stdout(predicate::str::contains("today"))
        .stdout(predicate::str::contains("missed"));

    harness.run_success(&["--version"]).stdout(predicate::str::contains("zorg"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_today_on_empty_database() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["today", CAREGIVER])
        .stdout(predicate::str::contains("No shifts"));

    harness
        .run_success(&["today", CAREGIVER, "--date", "2024-06-10"])
        .stdout(predicate::str::contains("2024-06-10"));

    harness
        .run_success(&["today", CAREGIVER, "--json"])
        .stdout(predicate::str::contains("\"clients\": []"));
}

#[test]
fn test_today_rejects_malformed_input() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["today", "not-a-uuid"])
        .stderr(predicate::str::contains("error"));

    harness
        .run_failure(&["today", CAREGIVER, "--date", "10/06/2024"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missed_requires_a_scope() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["missed"])
        .stderr(predicate::str::contains("--caregiver").and(predicate::str::contains("--client")));

    // The two scopes are mutually exclusive.
    harness
        .run_failure(&["missed", "--caregiver", CAREGIVER, "--client", CLIENT])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missed_on_empty_database() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["missed", "--caregiver", CAREGIVER])
        .stdout(predicate::str::contains("Nothing missed"));

    harness
        .run_success(&["missed", "--client", CLIENT, "--days", "14"])
        .stdout(predicate::str::contains("Nothing missed"));

    harness
        .run_success(&["missed", "--caregiver", CAREGIVER, "--json"])
        .stdout(predicate::str::contains("\"missedDays\": []"));
}

#[test]
fn test_missed_rejects_zero_day_window() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["missed", "--caregiver", CAREGIVER, "--days", "0"])
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_medication_on_empty_database() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["medication", CLIENT])
        .stdout(predicate::str::contains("accounted for"));

    harness
        .run_success(&["medication", CLIENT, "--json"])
        .stdout(predicate::str::contains("\"totalMissing\": 0"))
        .stdout(predicate::str::contains("\"missingAdministrations\": []"));
}
