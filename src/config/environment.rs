//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del cliente. Todas las variables
//! son opcionales; un valor inválido se reemplaza por el de por defecto.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_RECONCILE_MAX_ATTEMPTS: u32 = 12;

/// Configuración del cliente
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: String,
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub reconcile_interval: Duration,
    pub reconcile_max_attempts: u32,
    pub session_file: PathBuf,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(30),
            reconcile_interval: Duration::from_secs(DEFAULT_RECONCILE_INTERVAL_SECS),
            reconcile_max_attempts: DEFAULT_RECONCILE_MAX_ATTEMPTS,
            session_file: PathBuf::from(".rental_session.json"),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Cargar la configuración desde el entorno del proceso
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Cargar la configuración desde una fuente de claves arbitraria
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        let reconcile_max_attempts = parse_or(
            &lookup,
            "RECONCILE_MAX_ATTEMPTS",
            defaults.reconcile_max_attempts,
        )
        .max(1);

        Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            api_base_url,
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30u64).max(1)),
            reconcile_interval: Duration::from_secs(parse_or(
                &lookup,
                "RECONCILE_INTERVAL_SECS",
                DEFAULT_RECONCILE_INTERVAL_SECS,
            )),
            reconcile_max_attempts,
            session_file: lookup("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            log_level: lookup("LOG_LEVEL")
                .map(|level| level.trim().to_lowercase())
                .filter(|level| match tracing::Level::from_str(level) {
                    Ok(_) => true,
                    Err(_) => {
                        warn!("⚠️ LOG_LEVEL inválido: '{}', usando info", level);
                        false
                    }
                })
                .unwrap_or(defaults.log_level),
        }
    }

    /// Nivel máximo de logging para tracing
    pub fn tracing_level(&self) -> tracing::Level {
        tracing::Level::from_str(&self.log_level).unwrap_or(tracing::Level::INFO)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("⚠️ Valor inválido para {}: '{}', usando {}", key, raw, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.reconcile_interval, Duration::from_secs(5));
        assert_eq!(config.reconcile_max_attempts, DEFAULT_RECONCILE_MAX_ATTEMPTS);
        assert_eq!(config.environment, "development");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = config_from(&[
            ("API_BASE_URL", "https://rentals.example.com/"),
            ("RECONCILE_INTERVAL_SECS", "2"),
            ("RECONCILE_MAX_ATTEMPTS", "not-a-number"),
            ("LOG_LEVEL", "DEBUG"),
        ]);
        assert_eq!(config.api_base_url, "https://rentals.example.com");
        assert_eq!(config.reconcile_interval, Duration::from_secs(2));
        assert_eq!(config.reconcile_max_attempts, DEFAULT_RECONCILE_MAX_ATTEMPTS);
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_zero_timeout_and_bad_log_level_fall_back() {
        let config = config_from(&[("HTTP_TIMEOUT_SECS", "0"), ("LOG_LEVEL", "loud")]);
        assert_eq!(config.http_timeout, Duration::from_secs(1));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }
}
