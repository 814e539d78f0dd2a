//! Explicit initialization of a data directory.
//!
//! Opening a [`Restaurant`](crate::Restaurant) creates the store on demand
//! unless auto-initialization is disabled; [`init_data_dir`] does the same
//! up front and can also write a commented configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE_NAME;
use crate::database::{Database, DatabaseConfig, DATABASE_FILE_NAME};
use crate::error::{Error, Result};

/// What to initialize and how.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory that holds the store and the configuration file.
    pub data_dir: PathBuf,
    /// Replace an existing store.
    pub overwrite: bool,
    /// Write `config.yaml` if it does not exist yet.
    pub create_config: bool,
}

impl InitOptions {
    /// Options for `data_dir` that neither overwrite nor write a config.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overwrite: false,
            create_config: false,
        }
    }

    /// Sets whether an existing store is replaced.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether `config.yaml` is written.
    #[must_use]
    pub const fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }
}

/// What [`init_data_dir`] actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitResult {
    /// The initialized directory.
    pub data_dir: PathBuf,
    /// The directory did not exist before.
    pub data_dir_created: bool,
    /// An existing store was removed first.
    pub database_replaced: bool,
    /// `config.yaml` was written.
    pub config_created: bool,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r"# bistro configuration
# Environment variables (BISTRO_*) override these values.

# pool:
#   max_size: 8
#   max_idle: 8
#   idle_timeout_secs: 300
#   reap_interval_secs: 30     # 0 disables the background reaper
#   acquire_timeout_ms: 5000

# check_in:
#   grace_period_minutes: 15
#   max_claim_attempts: 8

# booking:
#   horizon_days: 60
#   slot_minutes: 30
#   dining_minutes: 120
#   max_party_size: 20

# database:
#   busy_timeout_ms: 5000

# output_format: table
";

/// Creates the data directory and an empty store.
///
/// # Errors
///
/// - [`Error::Validation`] if a store exists and `overwrite` is not set
/// - [`Error::Io`] if the directory or files cannot be written
/// - Any error from opening the new store
pub fn init_data_dir(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir: options.data_dir.clone(),
        data_dir_created: false,
        database_replaced: false,
        config_created: false,
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::Validation {
                field: "database".into(),
                message: format!(
                    "a store already exists at {}; use --overwrite to replace it",
                    db_path.display()
                ),
            });
        }
        remove_store(&db_path)?;
        result.database_replaced = true;
    }

    Database::open(DatabaseConfig::new(&db_path))?;
    log::info!("Initialized store at {}", db_path.display());

    if options.create_config {
        let config_path = options.data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}

/// Removes the store file and its WAL side files.
fn remove_store(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut side = db_path.as_os_str().to_owned();
        side.push(suffix);
        let side = PathBuf::from(side);
        if side.exists() {
            fs::remove_file(side)?;
        }
    }
    Ok(())
}
