//! qrmint runtime configuration handling

use crate::error::{Error, Result};
use crate::request::{ColorSpec, EcLevel, RenderDefaults};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrmintConfig {
    /// Values used for every field the user does not customize
    pub defaults: RenderDefaults,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl QrmintConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrmint.toml / qrmint.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrmint.toml", "qrmint.yaml", "qrmint.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrmint");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        apply_default_overrides(&mut self.defaults, |key| env::var(key).ok());
        self.logging.apply_env_overrides();
    }
}

/// Merge `QRMINT_DEFAULT_*` values onto the render defaults.
///
/// Unparseable numbers and unknown levels are ignored.
fn apply_default_overrides(defaults: &mut RenderDefaults, var: impl Fn(&str) -> Option<String>) {
    if let Some(version) = var("QRMINT_DEFAULT_VERSION").and_then(|v| v.parse::<i64>().ok()) {
        defaults.version = version;
    }
    if let Some(level) = var("QRMINT_DEFAULT_EC_LEVEL").and_then(|v| EcLevel::parse(&v)) {
        defaults.ec_level = level;
    }
    if let Some(size) = var("QRMINT_DEFAULT_BOX_SIZE").and_then(|v| v.parse::<i64>().ok()) {
        defaults.box_size = size;
    }
    if let Some(border) = var("QRMINT_DEFAULT_BORDER").and_then(|v| v.parse::<i64>().ok()) {
        defaults.border = border;
    }
    if let Some(fill) = var("QRMINT_DEFAULT_FILL_COLOR") {
        defaults.fill_color = ColorSpec::new(fill);
    }
    if let Some(back) = var("QRMINT_DEFAULT_BACK_COLOR") {
        defaults.back_color = ColorSpec::new(back);
    }
    if let Some(filename) = var("QRMINT_DEFAULT_FILENAME").filter(|f| !f.trim().is_empty()) {
        defaults.filename = PathBuf::from(filename);
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRMINT_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QRMINT_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("QRMINT_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("QRMINT_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
        if let Ok(rotation) = env::var("QRMINT_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("qrmint-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_toml_defaults_section() {
        let path = scratch_file(
            "partial.toml",
            "[defaults]\nbox_size = 6\nec_level = \"Q\"\nfill_color = \"#123456\"\n\n[logging]\nlevel = \"debug\"\n",
        );
        let config = QrmintConfig::from_file(&path).unwrap();
        assert_eq!(config.defaults.box_size, 6);
        assert_eq!(config.defaults.ec_level, EcLevel::Q);
        assert_eq!(config.defaults.fill_color.as_str(), "#123456");
        assert_eq!(config.defaults.border, 4);
        assert_eq!(config.defaults.filename, PathBuf::from("qr_code.png"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_yaml_config() {
        let path = scratch_file(
            "config.yaml",
            "defaults:\n  version: 3\n  filename: codes/out.png\nlogging:\n  rotation: daily\n",
        );
        let config = QrmintConfig::from_file(&path).unwrap();
        assert_eq!(config.defaults.version, 3);
        assert_eq!(config.defaults.filename, PathBuf::from("codes/out.png"));
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));
    }

    #[test]
    fn test_unsupported_extension() {
        let path = scratch_file("config.ini", "box_size=3");
        assert!(matches!(
            QrmintConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_default_overrides() {
        let vars: HashMap<&str, &str> = [
            ("QRMINT_DEFAULT_VERSION", "4"),
            ("QRMINT_DEFAULT_EC_LEVEL", "h"),
            ("QRMINT_DEFAULT_BOX_SIZE", "not-a-number"),
            ("QRMINT_DEFAULT_BACK_COLOR", "ivory"),
            ("QRMINT_DEFAULT_FILENAME", "  "),
        ]
        .into_iter()
        .collect();

        let mut defaults = RenderDefaults::default();
        apply_default_overrides(&mut defaults, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(defaults.version, 4);
        assert_eq!(defaults.ec_level, EcLevel::H);
        assert_eq!(defaults.box_size, 10);
        assert_eq!(defaults.back_color.as_str(), "ivory");
        assert_eq!(defaults.filename, PathBuf::from("qr_code.png"));
    }

    #[test]
    fn test_log_rotation_from_str() {
        assert_eq!(LogRotation::from_str("HOURLY"), Some(LogRotation::Hourly));
        assert!(LogRotation::from_str("weekly").is_none());
    }
}
