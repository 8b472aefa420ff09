//! Configuration loading from the process environment.

use std::net::SocketAddr;

use thiserror::Error;

use invoicedesk_observability::LogFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{set} is set but {missing} is not")]
    Incomplete {
        set: &'static str,
        missing: &'static str,
    },
}

/// Seed account for local runs against the in-memory user directory.
#[derive(Clone, PartialEq, Eq)]
pub struct DevUser {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for DevUser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DevUser")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres connection string. `None` selects the in-memory stores.
    pub database_url: Option<String>,
    pub log_format: LogFormat,
    pub session_ttl: chrono::Duration,
    pub dev_user: Option<DevUser>,
    /// Add `Secure` to the session cookie. Turn off only for plain-http development.
    pub secure_cookies: bool,
}

impl AppConfig {
    /// Read `BIND_ADDR`, `DATABASE_URL`, `LOG_FORMAT`, `SESSION_TTL_SECS`,
    /// `COOKIE_SECURE`, `DEV_USER_EMAIL` and `DEV_USER_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw.trim().parse::<SocketAddr>().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    var: "BIND_ADDR",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_BIND_ADDR
                .parse::<SocketAddr>()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    var: "BIND_ADDR",
                    value: DEFAULT_BIND_ADDR.to_string(),
                    reason: e.to_string(),
                })?,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e: invoicedesk_observability::ParseLogFormatError| {
                ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => LogFormat::default(),
        };

        let ttl_secs = match get("SESSION_TTL_SECS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: "SESSION_TTL_SECS",
                        value: raw,
                        reason: "must be positive".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "SESSION_TTL_SECS",
                        value: raw,
                        reason: e.to_string(),
                    });
                }
            },
            None => DEFAULT_SESSION_TTL_SECS,
        };

        let secure_cookies = match get("COOKIE_SECURE") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "COOKIE_SECURE",
                        value: raw,
                        reason: "expected true or false".to_string(),
                    });
                }
            },
            None => true,
        };

        let dev_user = match (get("DEV_USER_EMAIL"), get("DEV_USER_PASSWORD")) {
            (Some(email), Some(password)) => Some(DevUser { email, password }),
            (Some(_), None) => {
                return Err(ConfigError::Incomplete {
                    set: "DEV_USER_EMAIL",
                    missing: "DEV_USER_PASSWORD",
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete {
                    set: "DEV_USER_PASSWORD",
                    missing: "DEV_USER_EMAIL",
                });
            }
            (None, None) => None,
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            log_format,
            session_ttl: chrono::Duration::seconds(ttl_secs),
            dev_user,
            secure_cookies,
        })
    }
}
