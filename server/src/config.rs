//! Runtime configuration, read from environment variables once at startup.

use std::net::SocketAddr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Origin used for absolute links (media, pagination, short links), without trailing slash.
    pub public_url: String,
    pub db_pool_size: u32,
    pub session_ttl_days: i64,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let public_url = lookup("PUBLIC_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();
        if !public_url.starts_with("http://") && !public_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "PUBLIC_URL",
                value: public_url,
            });
        }

        Ok(Self {
            database_url,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            public_url,
            db_pool_size: parse_or(&lookup, "DB_POOL_SIZE", 10)?,
            session_ttl_days: parse_or(&lookup, "SESSION_TTL_DAYS", 30)?,
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", 16 * 1024 * 1024)?,
        })
    }

    /// Absolute URL for a path on this server, e.g. `/media/<id>`.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.public_url, path)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/foodgram")]).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.public_url, "http://localhost:3000");
        assert_eq!(config.db_pool_size, 10);
        assert_eq!(config.session_ttl_days, 30);
    }

    #[test]
    fn test_database_url_required() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
    }

    #[test]
    fn test_public_url_trailing_slash_trimmed() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/foodgram"),
            ("PUBLIC_URL", "https://foodgram.example/"),
        ])
        .unwrap();
        assert_eq!(
            config.absolute_url("/s/abc123"),
            "https://foodgram.example/s/abc123"
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://db/foodgram"),
            ("DB_POOL_SIZE", "lots"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "DB_POOL_SIZE",
                value: "lots".to_string()
            }
        );
    }
}
