//! Process configuration, read from the environment (and `.env`, if present).

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("STORAGE_MODE must be `mysql` or `memory`, got {0:?}")]
    UnknownStorageMode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    MySql,
    Memory,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "memory" | "in_memory" => Ok(Self::Memory),
            _ => Err(ConfigError::UnknownStorageMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageMode,
    pub database: DatabaseConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source. Unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage = match lookup("STORAGE_MODE") {
            Some(mode) => mode.parse()?,
            None => StorageMode::MySql,
        };

        Ok(Self {
            host: text("HOST", "0.0.0.0"),
            port: parse(&lookup, "PORT", 3000)?,
            storage,
            database: DatabaseConfig {
                host: text("DB_HOST", "localhost"),
                port: parse(&lookup, "DB_PORT", 3306)?,
                user: text("DB_USER", "root"),
                password: text("DB_PASSWORD", ""),
                name: text("DB_NAME", "todo_db"),
                max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 10)?,
                acquire_timeout_secs: parse(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 30)?,
            },
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            expected: std::any::type_name::<T>(),
            value,
        }),
    }
}
