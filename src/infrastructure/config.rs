//! Application configuration

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::application::dto::ModuleConfig;

pub const CONFIG_FILE: &str = "casefile";
pub const ENV_PREFIX: &str = "CASEFILE";
pub const DEFAULT_LOG_FILTER: &str = "casefile_engine=debug";

/// Harness configuration, layered from defaults, an optional `casefile.toml`
/// and `CASEFILE_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// JSON room catalog replacing the built-in rooms
    pub rooms_file: Option<PathBuf>,
    /// Countdown tick period
    pub tick_interval_ms: u64,
    /// How long a hint stays highlighted
    pub hint_duration_ms: u64,
    /// JSON module configuration used when the host sends none
    pub module_config: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from `casefile.toml` (if present) and the environment
    pub fn from_env() -> Result<Self> {
        Self::load(File::with_name(CONFIG_FILE).required(false))
    }

    fn load<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config: Self = Config::builder()
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .set_default("tick_interval_ms", 1000)?
            .set_default("hint_duration_ms", 5000)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration")?;

        anyhow::ensure!(config.tick_interval_ms > 0, "tick_interval_ms must be greater than zero");
        anyhow::ensure!(config.hint_duration_ms > 0, "hint_duration_ms must be greater than zero");
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn hint_duration(&self) -> Duration {
        Duration::from_millis(self.hint_duration_ms)
    }

    /// Read the fallback module configuration, if one is configured
    pub fn read_module_config(&self) -> Result<Option<ModuleConfig>> {
        let Some(path) = &self.module_config else {
            return Ok(None);
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read module config {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Malformed module config {}", path.display()))?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_defaults_apply_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("casefile");
        let config = AppConfig::load(File::from(missing.as_path()).required(false)).unwrap();

        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.hint_duration(), Duration::from_secs(5));
        assert!(config.rooms_file.is_none());
        assert!(config.read_module_config().unwrap().is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file("tick_interval_ms = 250\nrooms_file = \"cases/rooms.json\"\n");
        let config = AppConfig::load(File::from(file.path())).unwrap();

        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.hint_duration_ms, 5000);
        assert_eq!(config.rooms_file, Some(PathBuf::from("cases/rooms.json")));
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let file = toml_file("tick_interval_ms = 0\n");
        let err = AppConfig::load(File::from(file.path())).unwrap_err();
        assert!(err.to_string().contains("tick_interval_ms"));
    }

    #[test]
    fn test_zero_hint_duration_rejected() {
        let file = toml_file("hint_duration_ms = 0\n");
        let err = AppConfig::load(File::from(file.path())).unwrap_err();
        assert!(err.to_string().contains("hint_duration_ms"));
    }

    #[test]
    fn test_read_module_config() {
        let mut module = tempfile::NamedTempFile::new().unwrap();
        write!(module, r#"{{"gameTitle": "Harbor Case", "maxHints": 1}}"#).unwrap();

        let file = toml_file(&format!("module_config = {:?}\n", module.path().display().to_string()));
        let config = AppConfig::load(File::from(file.path())).unwrap();
        let module_config = config.read_module_config().unwrap().unwrap();

        assert_eq!(module_config.game_title, "Harbor Case");
        assert_eq!(module_config.max_hints, 1);
    }
}
