use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::ClientConfig;

/// Environment variable overriding `server.base_url`
pub const SERVER_ENV: &str = "TESSERNOTE_SERVER";
/// Environment variable overriding `log.level`
pub const LOG_ENV: &str = "TESSERNOTE_LOG";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
}

/// Default config path, respecting XDG_CONFIG_HOME
pub fn default_config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    config_dir.join("tessernote").join("config.toml")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config at `path`. A missing file yields defaults.
pub fn read_config_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load config from `explicit` (or the default path), then apply environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    let mut config = read_config_from(&path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Apply `TESSERNOTE_*` overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(SERVER_ENV).filter(|v| !v.trim().is_empty()) {
        config.server.base_url = url.trim().to_string();
    }
    if let Some(level) = lookup(LOG_ENV).filter(|v| !v.trim().is_empty()) {
        config.log.level = level.trim().to_string();
    }
}

/// Write `config` to `path`, creating parent directories.
pub fn write_config(path: &Path, config: &ClientConfig, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let text = toml::to_string_pretty(config)?;
    fs::write(path, text).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::DeleteMethod;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config_from(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.server.base_url, "http://localhost:8080");
        assert_eq!(config.server.timeout_secs, 10);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r##"[server]
base_url = "http://notes.local:9000/api"
delete_method = "get"

[ui.tag_colors]
work = "#FF4444"
"##,
        )
        .unwrap();

        let config = read_config_from(&path).unwrap();
        assert_eq!(config.server.base_url, "http://notes.local:9000/api");
        assert_eq!(config.server.delete_method, DeleteMethod::Get);
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(config.ui.tag_colors.get("work").unwrap(), "#FF4444");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn bad_toml_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[server\nbase_url = 1").unwrap();
        let err = read_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn env_overrides_win() {
        let mut config = ClientConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            SERVER_ENV => Some(" http://other:1234 ".into()),
            LOG_ENV => Some("debug".into()),
            _ => None,
        });
        assert_eq!(config.server.base_url, "http://other:1234");
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = ClientConfig::default();
        apply_env_overrides(&mut config, |_| Some("  ".into()));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn write_then_read_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let mut config = ClientConfig::default();
        config.server.base_url = "http://example.test".into();
        write_config(&path, &config, false).unwrap();
        assert_eq!(read_config_from(&path).unwrap(), config);

        let err = write_config(&path, &config, false).unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists(_)));
        write_config(&path, &config, true).unwrap();
    }
}
