//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - A furnished restaurant fixture open every day

use assert_cmd::Command;
use chrono::{Duration, Local, NaiveDate};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would leak the caller's setup into a test.
const BISTRO_ENV_VARS: [&str; 13] = [
    "BISTRO_DATA_DIR",
    "BISTRO_BUSY_TIMEOUT",
    "BISTRO_DISABLE_AUTOINIT",
    "BISTRO_OUTPUT_FORMAT",
    "BISTRO_LOG_MODE",
    "BISTRO_POOL_MAX_SIZE",
    "BISTRO_POOL_MAX_IDLE",
    "BISTRO_POOL_IDLE_TIMEOUT_SECS",
    "BISTRO_POOL_REAP_INTERVAL_SECS",
    "BISTRO_POOL_ACQUIRE_TIMEOUT_MS",
    "BISTRO_GRACE_PERIOD_MINUTES",
    "BISTRO_BOOKING_HORIZON_DAYS",
    "BISTRO_BUSY_TIMEOUT_MS",
];

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the bistro data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; bistro creates it on demand.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("bistro-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// A command with no flags and a clean `BISTRO_*` environment.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("bistro").expect("Failed to find bistro binary");
        for var in BISTRO_ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// A command with `--data-dir` pointing at this environment.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Path to the store file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("bistro.db")
    }

    /// Run a command that must succeed and return its trimmed stdout.
    pub fn run(&self, args: &[&str]) -> String {
        let output = self
            .command()
            .args(args)
            .output()
            .expect("Failed to run bistro");
        assert!(
            output.status.success(),
            "bistro {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .to_string()
    }

    /// Add tables given as `(number, capacity)`.
    pub fn add_tables(&self, tables: &[(u32, u32)]) {
        for (number, capacity) in tables {
            self.run(&[
                "tables",
                "add",
                &number.to_string(),
                "--capacity",
                &capacity.to_string(),
            ]);
        }
    }

    /// Open 17:00-23:00 every day of the week.
    pub fn open_every_evening(&self) {
        for day in ["mon", "tue", "wed", "thu", "fri", "sat", "sun"] {
            self.run(&["hours", "set", day, "17:00-23:00"]);
        }
    }

    /// A store with the given tables, open every evening.
    pub fn furnished(tables: &[(u32, u32)]) -> Self {
        let env = Self::new();
        env.open_every_evening();
        env.add_tables(tables);
        env
    }

    /// Book a table and return the confirmation code.
    pub fn reserve(&self, at: &str, party: u32, customer: &str) -> String {
        self.run(&[
            "reserve",
            "--at",
            at,
            "--party",
            &party.to_string(),
            "--customer",
            customer,
        ])
    }
}

/// Tomorrow's date in local time.
#[allow(dead_code)]
pub fn tomorrow() -> NaiveDate {
    Local::now().date_naive() + Duration::days(1)
}

/// `HH:MM` tomorrow as accepted by `--at`.
#[allow(dead_code)]
pub fn tomorrow_at(time: &str) -> String {
    format!("{} {time}", tomorrow().format("%Y-%m-%d"))
}
