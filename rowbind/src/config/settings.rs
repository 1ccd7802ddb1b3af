//! Connection and binding settings

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::defaults;
use crate::error::{Error, Result};

/// What the binder does with a method parameter that has no name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnnamedParameterPolicy {
    /// Fail with a naming error before anything is bound.
    #[default]
    Reject,
    /// Bind scalars by position; unnamed composites are dropped with a warning.
    Positional,
}

/// Settings a handle is built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// MySQL connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Minimum pooled connections
    #[serde(default)]
    pub pool_min: Option<usize>,

    /// Maximum pooled connections
    #[serde(default)]
    pub pool_max: Option<usize>,

    /// Handling of parameters without a name
    #[serde(default)]
    pub unnamed_parameters: UnnamedParameterPolicy,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_database_url() -> String {
    defaults::DATABASE_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_min: None,
            pool_max: None,
            unnamed_parameters: UnnamedParameterPolicy::default(),
            log_level: None,
        }
    }
}

impl Settings {
    /// Default settings pointing at `database_url`
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let settings: Settings = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(settings)
    }

    /// Load settings using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // ROWBIND__DATABASE_URL, ROWBIND__UNNAMED_PARAMETERS, ...
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator(defaults::ENV_SEPARATOR)
                .separator(defaults::ENV_SEPARATOR),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;

        Ok(settings)
    }

    /// Effective pool bounds, filling the unset side from the defaults
    pub fn pool_bounds(&self) -> Option<(usize, usize)> {
        if self.pool_min.is_none() && self.pool_max.is_none() {
            return None;
        }
        Some((
            self.pool_min.unwrap_or(defaults::POOL_MIN),
            self.pool_max.unwrap_or(defaults::POOL_MAX),
        ))
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("database_url is required".into()));
        }

        if let Some((min, max)) = self.pool_bounds() {
            if max == 0 {
                return Err(Error::Config("pool_max must be greater than zero".into()));
            }
            if min > max {
                return Err(Error::Config(format!(
                    "pool_min ({}) must not exceed pool_max ({})",
                    min, max
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.database_url, defaults::DATABASE_URL);
        assert_eq!(settings.unnamed_parameters, UnnamedParameterPolicy::Reject);
        assert!(settings.pool_bounds().is_none());
        assert!(settings.log_level.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_policy_from_toml() {
        let toml_content = r#"
            database_url = "mysql://app@db/app"
            unnamed_parameters = "positional"
            log_level = "debug"
        "#;
        let settings: Settings = toml::from_str(toml_content).unwrap();
        assert_eq!(settings.unnamed_parameters, UnnamedParameterPolicy::Positional);
        assert_eq!(settings.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::with_url("");
        assert!(settings.validate().is_err());

        settings.database_url = "mysql://localhost/test".into();
        settings.pool_min = Some(20);
        assert_eq!(settings.pool_bounds(), Some((20, defaults::POOL_MAX)));
        assert!(settings.validate().is_ok());

        settings.pool_min = Some(200);
        assert!(matches!(settings.validate(), Err(Error::Config(_))));

        settings.pool_min = Some(20);
        settings.pool_max = Some(30);
        assert_eq!(settings.pool_bounds(), Some((20, 30)));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_file_and_load() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "database_url = \"mysql://app@db/app\"\npool_max = 5\npool_min = 1"
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.database_url, "mysql://app@db/app");
        assert_eq!(settings.pool_bounds(), Some((1, 5)));

        let loaded = Settings::load(Some(file.path())).unwrap();
        assert_eq!(loaded.pool_max, Some(5));
    }

    #[test]
    fn test_from_file_rejects_bad_policy() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "unnamed_parameters = \"guess\"").unwrap();
        assert!(matches!(
            Settings::from_file(file.path()),
            Err(Error::Config(_))
        ));
    }
}
