use anyhow::Context;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::service::DEFAULT_MAX_ATTEMPTS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    /// Upper bound for any single storage call
    pub storage_timeout_ms: u64,
    /// Attempts before auto-generation gives up on collisions
    pub codegen_max_attempts: u32,
    #[serde(default)]
    pub redirect_status: RedirectMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// HTTP status used for redirects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectMode {
    /// 301
    MovedPermanently,
    /// 302
    Found,
    /// 307
    #[default]
    Temporary,
    /// 308
    Permanent,
}

impl RedirectMode {
    pub fn status_code(self) -> StatusCode {
        match self {
            RedirectMode::MovedPermanently => StatusCode::MOVED_PERMANENTLY,
            RedirectMode::Found => StatusCode::FOUND,
            RedirectMode::Temporary => StatusCode::TEMPORARY_REDIRECT,
            RedirectMode::Permanent => StatusCode::PERMANENT_REDIRECT,
        }
    }

    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim() {
            "301" => Ok(RedirectMode::MovedPermanently),
            "302" => Ok(RedirectMode::Found),
            "307" => Ok(RedirectMode::Temporary),
            "308" => Ok(RedirectMode::Permanent),
            other => anyhow::bail!("unsupported REDIRECT_STATUS '{other}', expected 301, 302, 307 or 308"),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            "memory" => DatabaseBackend::Memory,
            "sqlite" => DatabaseBackend::Sqlite,
            other => {
                tracing::warn!(
                    "Unknown DATABASE_BACKEND '{other}', falling back to 'sqlite'. Supported values: sqlite, postgres, memory"
                );
                DatabaseBackend::Sqlite
            }
        };

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./snaplink.db".to_string());

        let max_connections = parse_max_connections(
            &std::env::var("DATABASE_MAX_CONNECTIONS").unwrap_or_else(|_| "5".to_string()),
        )?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let storage_timeout_ms = std::env::var("STORAGE_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u64>()
            .context("STORAGE_TIMEOUT_MS must be an integer number of milliseconds")?;

        let codegen_max_attempts = match std::env::var("CODEGEN_MAX_ATTEMPTS") {
            Ok(v) => v
                .parse::<u32>()
                .context("CODEGEN_MAX_ATTEMPTS must be a positive integer")?,
            Err(_) => DEFAULT_MAX_ATTEMPTS,
        };

        let redirect_status = match std::env::var("REDIRECT_STATUS") {
            Ok(v) => RedirectMode::parse(&v)?,
            Err(_) => RedirectMode::default(),
        };

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            server: ServerConfig { host, port },
            storage_timeout_ms,
            codegen_max_attempts,
            redirect_status,
        })
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }
}

/// A pool capped at zero connections would stall every request.
fn parse_max_connections(value: &str) -> anyhow::Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => anyhow::bail!("DATABASE_MAX_CONNECTIONS must be a positive integer, got '{value}'"),
    }
}
