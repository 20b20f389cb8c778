//! End-to-end tests for CLI exit codes.
//!
//! - Exit code 0: Success
//! - Exit code 1: Any merge, pack or publish failure
//! - Exit code 2: Invalid command-line usage (handled by clap)

mod common;
use common::prelude::*;

/// Exit code 0 is returned for a successful merge.
#[test]
fn test_exit_code_success() {
    let fixture = TestFixture::new().with_sample_build();

    fixture
        .command()
        .args([
            "merge",
            "--nuspec",
            "Sample.nuspec",
            "--assembly",
            "Sample.dll",
            "--project",
            "Sample.csproj",
            "--assembly-info",
            "assembly.yaml",
        ])
        .assert()
        .code(0);
}

#[test]
fn test_exit_code_help() {
    cargo_bin_cmd!("nuspec-pack").arg("--help").assert().code(0);
}

#[test]
fn test_exit_code_version() {
    cargo_bin_cmd!("nuspec-pack")
        .arg("--version")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("nuspec-pack"));
}

#[test]
fn test_exit_code_subcommand_help() {
    cargo_bin_cmd!("nuspec-pack")
        .args(["merge", "--help"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("--version-policy"));
}

/// Exit code 1 is returned when the configuration file named by --config is missing.
#[test]
fn test_exit_code_error_config_not_found() {
    let fixture = TestFixture::new().with_file("Sample.nuspec", fixtures::MANIFEST);

    fixture
        .command()
        .args(["--config", "nonexistent.yaml", "pack"])
        .args(["--nuspec", "Sample.nuspec", "--output", "out"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"));
}

/// Exit code 1 is returned for a configuration file with invalid YAML.
#[test]
fn test_exit_code_error_invalid_yaml() {
    let fixture = TestFixture::new()
        .with_file("Sample.nuspec", fixtures::MANIFEST)
        .with_file("nuspec-pack.yaml", "tool: [unclosed\n");

    fixture
        .command()
        .args(["pack", "--nuspec", "Sample.nuspec", "--output", "out"])
        .assert()
        .code(1);
}

#[test]
fn test_exit_code_usage_unknown_flag() {
    cargo_bin_cmd!("nuspec-pack")
        .arg("--unknown-flag-that-does-not-exist")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_exit_code_usage_unknown_subcommand() {
    cargo_bin_cmd!("nuspec-pack")
        .arg("unknown-subcommand-xyz")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

/// Exit code 2 is returned when required arguments are missing.
#[test]
fn test_exit_code_usage_missing_required_arg() {
    cargo_bin_cmd!("nuspec-pack")
        .args(["pack", "--nuspec", "Sample.nuspec"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_exit_code_usage_invalid_arg_value() {
    cargo_bin_cmd!("nuspec-pack")
        .args(["merge", "--version-policy", "newest"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_exit_code_usage_zero_timeout() {
    cargo_bin_cmd!("nuspec-pack")
        .args(["pack", "--nuspec", "a.nuspec", "--output", "out", "--timeout", "0"])
        .assert()
        .code(2);
}
