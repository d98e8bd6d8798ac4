use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".hogwarts-registry";
/// Overrides the data directory when set.
pub const HOME_ENV: &str = "HOGWARTS_HOME";
const DB_FILE_NAME: &str = "Hogwarts.db";
const EVENT_LOG_FILE_NAME: &str = "hogwarts_log.json";
const ERROR_LOG_FILE_NAME: &str = "hogwarts_error_log.json";

/// Where one installation keeps its database and audit logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub event_log_path: PathBuf,
    pub error_log_path: PathBuf,
}

impl Config {
    /// Use `$HOGWARTS_HOME` if set, otherwise `~/.hogwarts-registry`.
    pub fn from_env() -> Result<Self> {
        if let Some(dir) = env::var_os(HOME_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(Self::in_dir(dir));
        }
        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::in_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Lay out the fixed file names under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let data_dir = dir.as_ref().to_path_buf();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            event_log_path: data_dir.join(EVENT_LOG_FILE_NAME),
            error_log_path: data_dir.join(ERROR_LOG_FILE_NAME),
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_uses_fixed_file_names() {
        let config = Config::in_dir("/srv/hogwarts");
        assert_eq!(config.data_dir, PathBuf::from("/srv/hogwarts"));
        assert_eq!(config.db_path, PathBuf::from("/srv/hogwarts/Hogwarts.db"));
        assert_eq!(
            config.event_log_path,
            PathBuf::from("/srv/hogwarts/hogwarts_log.json")
        );
        assert_eq!(
            config.error_log_path,
            PathBuf::from("/srv/hogwarts/hogwarts_error_log.json")
        );
    }
}
