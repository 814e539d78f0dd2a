//! Configuration file loading.
//!
//! Only one file is consulted: `config.yaml` in the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// File name of the configuration file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// A configuration file and its parsed contents.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Parsed configuration.
    pub config: Config,
}

/// Loads configuration files.
///
/// # Examples
///
/// ```no_run
/// use bistro::config::ConfigLoader;
/// use std::path::Path;
///
/// if let Some(source) = ConfigLoader::load_user_config(Some(Path::new("/srv/bistro"))).unwrap() {
///     println!("loaded {}", source.path.display());
/// }
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `{data_dir}/config.yaml`, or the one in the default data
    /// directory when `data_dir` is `None`.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_user_config(data_dir: Option<&Path>) -> Result<Option<ConfigSource>> {
        let path = match data_dir {
            Some(dir) => dir.join(CONFIG_FILE_NAME),
            None => crate::database::default_data_dir()?.join(CONFIG_FILE_NAME),
        };

        if !path.exists() {
            return Ok(None);
        }

        let config = Self::load_file(&path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(Some(ConfigSource { path, config }))
    }

    /// Loads and parses a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the YAML is invalid.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read configuration file: {e}"),
        })?;

        // A file of nothing but comments is an empty configuration.
        if contents
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'))
        {
            return Ok(Config::default());
        }

        Ok(serde_yaml::from_str(&contents)?)
    }
}
