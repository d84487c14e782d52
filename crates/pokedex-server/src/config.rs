//! Server configuration loading from file and environment variables.

use pokedex_db::DbRuntimeSettings;
use pokedex_types::ReadMode;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Environment overrides that were present but could not be parsed.
    /// Collected while loading, before any subscriber exists, and reported
    /// by [`Config::warn_rejected_overrides`].
    #[serde(skip)]
    pub rejected_overrides: Vec<RejectedOverride>,
}

/// An environment override whose value did not parse for its setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOverride {
    /// Variable name, e.g. `POKEDEX_PORT`.
    pub key: &'static str,
    /// The raw value that was ignored.
    pub value: String,
}

impl Config {
    /// Logs each rejected environment override. Call after tracing is
    /// initialized.
    pub fn warn_rejected_overrides(&self) {
        for rejected in &self.rejected_overrides {
            tracing::warn!(
                key = rejected.key,
                value = %rejected.value,
                "ignoring unparseable environment override"
            );
        }
    }
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// How long a connection waits on a locked database, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,

    /// How the semi-structured columns are decoded on read.
    #[serde(default)]
    pub read_mode: ReadMode,
}

impl DatabaseConfig {
    /// Connection settings for [`pokedex_db::create_pool`] and
    /// [`pokedex_db::open_connection`].
    pub fn runtime_settings(&self) -> DbRuntimeSettings {
        DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "pokedex_catalog=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "pokedex.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    DbRuntimeSettings::default().pool_max_size
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
            read_mode: ReadMode::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// A missing file is not an error. Environment variables override the file:
/// - `POKEDEX_HOST` overrides `server.host`
/// - `POKEDEX_PORT` overrides `server.port`
/// - `POKEDEX_DB_PATH` overrides `database.path`
/// - `POKEDEX_DB_BUSY_TIMEOUT_MS` overrides `database.busy_timeout_ms`
/// - `POKEDEX_DB_POOL_MAX_SIZE` overrides `database.pool_max_size`
/// - `POKEDEX_READ_MODE` overrides `database.read_mode` (`strict` or `lenient`)
/// - `POKEDEX_LOG_LEVEL` overrides `logging.level`
/// - `POKEDEX_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// Unparseable override values are ignored and recorded in
/// [`Config::rejected_overrides`].
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    config.rejected_overrides = apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies overrides from `lookup`, which maps a variable name to its value,
/// and returns the ones whose value did not parse.
fn apply_env_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Vec<RejectedOverride> {
    let mut rejected = Vec::new();
    override_parsed(&lookup, "POKEDEX_HOST", &mut config.server.host, &mut rejected);
    override_parsed(&lookup, "POKEDEX_PORT", &mut config.server.port, &mut rejected);
    if let Some(db_path) = lookup("POKEDEX_DB_PATH") {
        config.database.path = db_path;
    }
    override_parsed(
        &lookup,
        "POKEDEX_DB_BUSY_TIMEOUT_MS",
        &mut config.database.busy_timeout_ms,
        &mut rejected,
    );
    override_parsed(
        &lookup,
        "POKEDEX_DB_POOL_MAX_SIZE",
        &mut config.database.pool_max_size,
        &mut rejected,
    );
    override_parsed(
        &lookup,
        "POKEDEX_READ_MODE",
        &mut config.database.read_mode,
        &mut rejected,
    );
    if let Some(level) = lookup("POKEDEX_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("POKEDEX_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    rejected
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    target: &mut T,
    rejected: &mut Vec<RejectedOverride>,
) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(parsed) => *target = parsed,
        Err(_) => rejected.push(RejectedOverride { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_no_path() {
        let config = Config::default();
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, "pokedex.db");
        assert_eq!(config.database.busy_timeout_ms, 5000);
        assert_eq!(config.database.pool_max_size, 8);
        assert_eq!(config.database.read_mode, ReadMode::Strict);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.server.port, default_port());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [database]
            path = "/var/lib/pokedex/pokedex.db"
            read_mode = "lenient"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, default_host());
        assert_eq!(config.database.path, "/var/lib/pokedex/pokedex.db");
        assert_eq!(config.database.read_mode, ReadMode::Lenient);
        assert_eq!(config.database.busy_timeout_ms, 5000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn unknown_read_mode_in_file_is_a_parse_error() {
        let result: Result<Config, _> = toml::from_str("[database]\nread_mode = \"loose\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn malformed_file_is_reported() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[server\nport = ").unwrap();
        let err = load_config(file.path().to_str()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = Config::default();
        let rejected = apply_env_overrides(
            &mut config,
            env(&[
                ("POKEDEX_HOST", "127.0.0.1"),
                ("POKEDEX_PORT", "4000"),
                ("POKEDEX_DB_PATH", "other.db"),
                ("POKEDEX_DB_BUSY_TIMEOUT_MS", "250"),
                ("POKEDEX_DB_POOL_MAX_SIZE", "2"),
                ("POKEDEX_READ_MODE", "Lenient"),
                ("POKEDEX_LOG_LEVEL", "debug"),
                ("POKEDEX_LOG_JSON", "1"),
            ]),
        );

        assert!(rejected.is_empty());
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.database.path, "other.db");
        assert_eq!(config.database.busy_timeout_ms, 250);
        assert_eq!(config.database.pool_max_size, 2);
        assert_eq!(config.database.read_mode, ReadMode::Lenient);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn unparseable_env_overrides_are_ignored_and_reported() {
        let mut config = Config::default();
        let rejected = apply_env_overrides(
            &mut config,
            env(&[
                ("POKEDEX_PORT", "80a"),
                ("POKEDEX_READ_MODE", "lenent"),
                ("POKEDEX_HOST", "nowhere"),
                ("POKEDEX_DB_POOL_MAX_SIZE", "4"),
            ]),
        );

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.read_mode, ReadMode::Strict);
        assert_eq!(config.server.host, default_host());
        assert_eq!(config.database.pool_max_size, 4);

        let keys: Vec<&str> = rejected.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["POKEDEX_HOST", "POKEDEX_PORT", "POKEDEX_READ_MODE"]);
        assert_eq!(
            rejected[1],
            RejectedOverride {
                key: "POKEDEX_PORT",
                value: "80a".to_string(),
            }
        );
    }

    #[test]
    fn file_values_never_carry_rejected_overrides() {
        let config: Config = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert!(config.rejected_overrides.is_empty());
    }

    #[test]
    fn runtime_settings_follow_database_config() {
        let config = DatabaseConfig {
            busy_timeout_ms: 100,
            pool_max_size: 1,
            ..DatabaseConfig::default()
        };
        let settings = config.runtime_settings();
        assert_eq!(settings.busy_timeout_ms, 100);
        assert_eq!(settings.pool_max_size, 1);
    }
}
