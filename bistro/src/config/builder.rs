//! Layered configuration assembly.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builds a [`Config`] from the file, the environment and programmatic
/// overrides, in that order of increasing precedence.
///
/// # Examples
///
/// ```
/// use bistro::config::{BookingSettings, Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config {
///         booking: Some(BookingSettings {
///             horizon_days: Some(14),
///             ..Default::default()
///         }),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(config.availability_settings().horizon.num_days(), 14);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    data_dir: Option<PathBuf>,
    overrides: Option<Config>,
    skip_files: bool,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Creates a builder that reads the default data directory and the
    /// environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `config.yaml` from `data_dir` instead of the default location.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(data_dir.as_ref().to_path_buf());
        self
    }

    /// Applies `config` on top of every other source.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Skips the configuration file.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Skips `BISTRO_*` environment overrides.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Loads, merges and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed, an environment
    /// variable holds a bad value, or the merged result fails validation.
    pub fn build(self) -> Result<Config> {
        let mut sources = Vec::new();

        if !self.skip_files {
            if let Some(source) = ConfigLoader::load_user_config(self.data_dir.as_deref())? {
                ConfigValidator::validate(&source.config)?;
                sources.push(source);
            }
        }

        let mut config = ConfigMerger::merge(sources);

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        if let Some(ref overrides) = self.overrides {
            ConfigMerger::merge_into(&mut config, overrides);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PoolSettings;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_skip_everything_gives_defaults() {
        let config = ConfigBuilder::new().skip_files().skip_env().build().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides_beat_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "pool:\n  max_size: 4\n  max_idle: 4\n",
        )
        .unwrap();

        let config = ConfigBuilder::new()
            .with_data_dir(dir.path())
            .skip_env()
            .with_config(Config {
                pool: Some(PoolSettings {
                    max_idle: Some(1),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .build()
            .unwrap();

        let pool = config.pool_config();
        assert_eq!(pool.max_size, 4);
        assert_eq!(pool.max_idle, 1);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "booking:\n  slot_minutes: 0\n").unwrap();

        let result = ConfigBuilder::new()
            .with_data_dir(dir.path())
            .skip_env()
            .build();
        assert!(matches!(result, Err(Error::Validation { .. })));
    }
}
