//! Runtime settings.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! `WX_*` environment variables, then `DATABASE_URL`. Command-line flags are
//! applied on top by the CLI.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_CONFIG_FILE, DEFAULT_DATABASE_FILE, DEFAULT_DATA_FILE_EXTENSION,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    pub database_path: PathBuf,

    #[validate(length(min = 1))]
    pub bind_address: String,

    #[validate(length(min = 1))]
    pub data_file_extension: String,

    #[validate(range(min = 1))]
    pub default_page_size: u32,

    #[validate(range(min = 1))]
    pub max_page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            data_file_extension: DEFAULT_DATA_FILE_EXTENSION.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Load settings, reading `config_file` if given or `wx-processor.toml` if present
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok();
        Self::load_with(config_file, database_url.as_deref())
    }

    fn load_with(config_file: Option<&Path>, database_url: Option<&str>) -> Result<Self> {
        let defaults = Settings::default();

        let file_source = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut builder = Config::builder()
            .set_default(
                "database_path",
                defaults.database_path.to_string_lossy().into_owned(),
            )?
            .set_default("bind_address", defaults.bind_address)?
            .set_default("data_file_extension", defaults.data_file_extension)?
            .set_default("default_page_size", i64::from(defaults.default_page_size))?
            .set_default("max_page_size", i64::from(defaults.max_page_size))?
            .add_source(file_source)
            .add_source(Environment::with_prefix("WX").try_parsing(true));

        if let Some(url) = database_url {
            builder = builder.set_override("database_path", database_path_from_url(url)?)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.check()?;
        Ok(settings)
    }

    /// Field-level validation plus the page size ordering
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.default_page_size > self.max_page_size {
            return Err(ProcessingError::Config(format!(
                "default_page_size ({}) exceeds max_page_size ({})",
                self.default_page_size, self.max_page_size
            )));
        }

        Ok(())
    }
}

/// Accept `sqlite:///relative.db`, `sqlite:////abs/path.db` or a plain path
fn database_path_from_url(url: &str) -> Result<String> {
    if let Some(path) = url.strip_prefix("sqlite:///") {
        if path.is_empty() {
            return Err(ProcessingError::Config(format!(
                "DATABASE_URL has no path: {}",
                url
            )));
        }
        return Ok(path.to_string());
    }

    if url.contains("://") {
        return Err(ProcessingError::Config(format!(
            "Only sqlite DATABASE_URL values are supported, got: {}",
            url
        )));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.check().is_ok());
        assert_eq!(settings.default_page_size, 100);
        assert_eq!(settings.max_page_size, 1000);
    }

    #[test]
    fn test_database_url_forms() {
        assert_eq!(
            database_path_from_url("sqlite:///./weather.db").unwrap(),
            "./weather.db"
        );
        assert_eq!(
            database_path_from_url("sqlite:////var/lib/wx.db").unwrap(),
            "/var/lib/wx.db"
        );
        assert_eq!(database_path_from_url("data/wx.db").unwrap(), "data/wx.db");
        assert!(database_path_from_url("postgres://localhost/wx").is_err());
        assert!(database_path_from_url("sqlite:///").is_err());
    }

    #[test]
    fn test_load_from_file_and_url() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "database_path = \"from_file.db\"")?;
        writeln!(file, "default_page_size = 50")?;

        let settings = Settings::load_with(Some(file.path()), None)?;
        assert_eq!(settings.database_path, PathBuf::from("from_file.db"));
        assert_eq!(settings.default_page_size, 50);
        assert_eq!(settings.max_page_size, 1000);

        let settings = Settings::load_with(Some(file.path()), Some("sqlite:///./url.db"))?;
        assert_eq!(settings.database_path, PathBuf::from("./url.db"));

        Ok(())
    }

    #[test]
    fn test_rejects_default_above_max() -> Result<()> {
        let mut file: NamedTempFile = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "default_page_size = 2000")?;
        writeln!(file, "max_page_size = 1000")?;

        assert!(Settings::load_with(Some(file.path()), None).is_err());
        Ok(())
    }
}
