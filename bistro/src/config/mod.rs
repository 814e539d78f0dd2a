//! Configuration system for bistro.
//!
//! Settings for the connection pool, the check-in rules and the booking
//! window come from up to three layers, highest precedence first:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`BISTRO_*`)
//! 3. The data directory's `config.yaml`
//!
//! Anything left unset falls back to built-in defaults when resolved.
//!
//! # Examples
//!
//! ```no_run
//! use bistro::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .with_data_dir("/srv/bistro")
//!     .build()
//!     .unwrap();
//!
//! println!("grace period: {} min", config.lifecycle_settings().grace_period.num_minutes());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
pub use merger::ConfigMerger;
pub use schema::{
    BookingSettings, CheckInSettings, Config, DatabaseSettings, OutputFormat, PoolSettings,
};
pub use validator::ConfigValidator;
