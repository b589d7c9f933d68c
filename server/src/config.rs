// revstoran_server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use revstoran::TransactionScope;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,

  pub session_cookie_name: String,
  pub session_cookie_secure: bool,
  pub session_idle_timeout: Duration,

  pub checkout_scope: TransactionScope,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let database_max_connections = get_env("DATABASE_MAX_CONNECTIONS")
      .unwrap_or_else(|_| "5".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;

    let session_cookie_name = get_env("SESSION_COOKIE_NAME").unwrap_or_else(|_| "revstoran_session".to_string());
    if session_cookie_name.trim().is_empty() {
      return Err(AppError::Config("SESSION_COOKIE_NAME cannot be empty.".to_string()));
    }
    let session_cookie_secure = get_env("SESSION_COOKIE_SECURE")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_COOKIE_SECURE value: {}", e)))?;

    let session_idle_timeout = parse_idle_timeout(&get_env("SESSION_IDLE_TIMEOUT_SECS").unwrap_or_else(|_| "86400".to_string()))?;

    let checkout_scope = match get_env("CHECKOUT_TRANSACTION_SCOPE") {
      Ok(raw) => raw
        .parse::<TransactionScope>()
        .map_err(|e| AppError::Config(format!("Invalid CHECKOUT_TRANSACTION_SCOPE: {}", e)))?,
      Err(_) => TransactionScope::default(),
    };

    let log_format = parse_log_format(&get_env("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()))?;

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      session_cookie_name,
      session_cookie_secure,
      session_idle_timeout,
      checkout_scope,
      log_format,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }

  /// How often idle sessions are swept: the idle timeout, at most once a minute.
  pub fn session_sweep_interval(&self) -> Duration {
    self.session_idle_timeout.min(Duration::from_secs(60))
  }
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "pretty" | "text" => Ok(LogFormat::Pretty),
    "json" => Ok(LogFormat::Json),
    other => Err(AppError::Config(format!(
      "Invalid LOG_FORMAT '{}' (expected 'pretty' or 'json')",
      other
    ))),
  }
}

fn parse_idle_timeout(raw: &str) -> Result<Duration> {
  match raw.trim().parse::<u64>() {
    Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
    Ok(_) => Err(AppError::Config("SESSION_IDLE_TIMEOUT_SECS must be positive.".to_string())),
    Err(e) => Err(AppError::Config(format!("Invalid SESSION_IDLE_TIMEOUT_SECS: {}", e))),
  }
}
