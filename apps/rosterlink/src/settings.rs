//! Configuration file lookup and command-line overrides

use std::fs;
use std::path::{Path, PathBuf};

use rosterlink_core::{ConfigError, RosterConfig};
use thiserror::Error;

/// Config file name under the platform config directory
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("invalid config {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: ConfigError,
    },
}

/// `<config dir>/rosterlink/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rosterlink").join(CONFIG_FILE))
}

/// Load the effective configuration.
///
/// An explicit path must exist. Without one, the default location is used
/// when present and built-in defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<RosterConfig, SettingsError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => path,
            None => {
                tracing::debug!("no config file, using defaults");
                return Ok(RosterConfig::default());
            }
        },
    };

    let text = fs::read_to_string(&path).map_err(|e| SettingsError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let config = RosterConfig::from_toml(&text).map_err(|source| SettingsError::Invalid {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub threshold: Option<f64>,
    pub store: Option<PathBuf>,
    pub dry_run: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut RosterConfig) {
        if let Some(threshold) = self.threshold {
            config.matching.threshold = threshold;
        }
        if let Some(store) = &self.store {
            config.export.store_path = store.clone();
        }
        if self.dry_run {
            config.export.dry_run = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[matching]\nthreshold = 85.0").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.matching.threshold, 85.0);
        assert_eq!(config.stages.len(), 3);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let err = load(Some(Path::new("/nonexistent/rosterlink.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_unparseable_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "matching = [").unwrap();
        assert!(matches!(
            load(Some(file.path())),
            Err(SettingsError::Invalid { .. })
        ));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = RosterConfig::default();
        let overrides = Overrides {
            threshold: Some(85.0),
            store: Some(PathBuf::from("out/linked.json")),
            dry_run: true,
        };
        overrides.apply(&mut config);
        assert_eq!(config.matching.threshold, 85.0);
        assert_eq!(config.export.store_path, PathBuf::from("out/linked.json"));
        assert!(config.export.dry_run);
    }

    #[test]
    fn test_dry_run_flag_does_not_clear_config() {
        let mut config = RosterConfig::default();
        config.export.dry_run = true;
        Overrides::default().apply(&mut config);
        assert!(config.export.dry_run);
    }
}
