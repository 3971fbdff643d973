//! Process configuration, read from the environment once at startup.

use thiserror::Error;

use stockbook_observability::LogFormat;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://stockbook.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            reason: reason.into(),
        }
    }
}

/// Which [`stockbook_infra::InventoryStore`] backend to run on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Sqlite { url: String, max_connections: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset and empty values take the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("PORT", e.to_string()))?,
            None => DEFAULT_PORT,
        };

        let store = match get("STOCKBOOK_STORE").as_deref().map(str::trim) {
            None | Some("sqlite") => {
                let url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
                let max_connections = match get("STOCKBOOK_DB_MAX_CONNECTIONS") {
                    Some(raw) => match raw.trim().parse::<u32>() {
                        Ok(0) => {
                            return Err(ConfigError::invalid(
                                "STOCKBOOK_DB_MAX_CONNECTIONS",
                                "must be at least 1",
                            ));
                        }
                        Ok(n) => n,
                        Err(e) => {
                            return Err(ConfigError::invalid(
                                "STOCKBOOK_DB_MAX_CONNECTIONS",
                                e.to_string(),
                            ));
                        }
                    },
                    None => DEFAULT_MAX_CONNECTIONS,
                };
                StoreConfig::Sqlite {
                    url,
                    max_connections,
                }
            }
            Some("memory") => StoreConfig::Memory,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "STOCKBOOK_STORE",
                    format!("must be sqlite or memory (got \"{other}\")"),
                ));
            }
        };

        let log_format = match get("STOCKBOOK_LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|reason| ConfigError::invalid("STOCKBOOK_LOG_FORMAT", reason))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            store,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
