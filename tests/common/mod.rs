//! Shared test helpers for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a valuekit command with logging and env seeds cleared
pub fn valuekit() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("valuekit"));
    cmd.env_remove("VALUEKIT_SEED").env_remove("VALUEKIT_LOG");
    cmd
}

/// Revenue-multiple request varying the multiple on a triangular distribution
pub const REVENUE_REQUEST: &str = r#"
method: revenue-multiple
nominal_params:
  revenue: 2000000
  multiple: 8
distributions:
  - name: multiple
    distribution_type: triangular
    params: { min: 5, mode: 8, max: 14 }
n_samples: 2000
seed: 42
"#;

/// DCF request whose discount rate never exceeds terminal growth, so every trial fails
pub const FAILING_REQUEST: &str = r#"
method: dcf
nominal_params:
  cash_flow: 100000
  growth_rate: 0.1
  terminal_growth: 0.05
  years: 5
distributions:
  - name: discount_rate
    distribution_type: uniform
    params: { min: 0.0, max: 0.04 }
n_samples: 200
seed: 7
"#;

/// Write a request file into a fresh temp directory
pub fn write_request(name: &str, content: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(name);
    std::fs::write(&path, content).unwrap();
    (tmp, path)
}
