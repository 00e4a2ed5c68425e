use std::path::{Path, PathBuf};

use crate::config::schema::ManagerConfig;
use crate::error::ConfigError;

pub const ENV_ADDR: &str = "HARVEST_MANAGER_ADDR";
pub const ENV_DB: &str = "HARVEST_MANAGER_DB";
pub const ENV_LOG_LEVEL: &str = "HARVEST_MANAGER_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "HARVEST_MANAGER_LOG_JSON";

/// Returns `~/.harvest-manager/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".harvest-manager").join("config.yaml"))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ManagerConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<ManagerConfig, ConfigError> {
    let config: ManagerConfig = if content.trim().is_empty() {
        ManagerConfig::default()
    } else {
        serde_yaml::from_str(content)?
    };

    validate_config(&config)?;

    Ok(config)
}

/// Loads the effective configuration.
///
/// An explicit `path` must exist. Without one, the default file is used when
/// present and built-in defaults otherwise. Environment overrides are applied
/// last.
pub fn resolve_config(path: Option<&Path>) -> Result<ManagerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => match default_config_path() {
            Some(default) if default.exists() => load_config(&default)?,
            _ => ManagerConfig::default(),
        },
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config)?;

    Ok(config)
}

fn apply_env_overrides<F>(config: &mut ManagerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup(ENV_ADDR) {
        config.server.addr = addr;
    }
    if let Some(db) = lookup(ENV_DB) {
        config.database.path = Some(PathBuf::from(db));
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    if let Some(json) = lookup(ENV_LOG_JSON) {
        config.logging.json = parse_bool(&json).ok_or_else(|| ConfigError::InvalidEnv {
            name: ENV_LOG_JSON.to_string(),
            reason: format!("expected true or false, got '{}'", json),
        })?;
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn validate_config(config: &ManagerConfig) -> Result<(), ConfigError> {
    if let Err(e) = config.server.socket_addr() {
        return Err(ConfigError::Validation {
            message: format!("Invalid server address '{}': {}", config.server.addr, e),
        });
    }

    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "Log level must not be empty".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, ManagerConfig::default());
        assert_eq!(config.server.addr, "127.0.0.1:3000");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_yaml() {
        let config = load_config_from_str(
            "server:\n  addr: 0.0.0.0:8080\nlogging:\n  json: true\n",
        )
        .unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert!(!config.server.cors);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_invalid_addr_rejected() {
        let err = load_config_from_str("server:\n  addr: not-an-addr\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let err = load_config_from_str("server: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::ParseYaml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "database:\n  path: /var/lib/harvest/manager.db\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(
            config.database.path,
            Some(PathBuf::from("/var/lib/harvest/manager.db"))
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nonexistent/harvest-manager.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_ADDR, "0.0.0.0:9000"),
            (ENV_DB, "/tmp/override.db"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_LOG_JSON, "yes"),
        ]
        .into_iter()
        .collect();

        let mut config = ManagerConfig::default();
        apply_env_overrides(&mut config, |name| env.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(config.server.addr, "0.0.0.0:9000");
        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/override.db")));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_bad_bool_env_rejected() {
        let mut config = ManagerConfig::default();
        let err = apply_env_overrides(&mut config, |name| {
            (name == ENV_LOG_JSON).then(|| "maybe".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    #[serial]
    fn test_resolve_config_reads_process_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server:\n  addr: 127.0.0.1:4000\n").unwrap();

        std::env::set_var(ENV_ADDR, "127.0.0.1:4100");
        let config = resolve_config(Some(&path));
        std::env::remove_var(ENV_ADDR);

        assert_eq!(config.unwrap().server.addr, "127.0.0.1:4100");
    }

    #[test]
    #[serial]
    fn test_resolve_config_rejects_invalid_env_addr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server:\n  addr: 127.0.0.1:3000\n").unwrap();

        std::env::set_var(ENV_ADDR, "nowhere");
        let result = resolve_config(Some(&path));
        std::env::remove_var(ENV_ADDR);

        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }
}
