// revstoran_server/src/main.rs

mod config;
mod errors;
mod models;
mod services;
mod state;
mod web;

use crate::config::{AppConfig, LogFormat};
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use revstoran::SessionStore;
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

/// Periodically drops sessions that went idle.
fn spawn_session_sweeper(sessions: Arc<SessionStore>, every: Duration) {
  actix_web::rt::spawn(async move {
    let mut ticker = actix_web::rt::time::interval(every);
    loop {
      ticker.tick().await;
      let evicted = sessions.evict_idle();
      if evicted > 0 {
        tracing::info!(evicted, remaining = sessions.len(), "Idle sessions evicted.");
      }
    }
  });
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      init_tracing(LogFormat::Pretty);
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  init_tracing(app_config.log_format);
  tracing::info!("Starting revstoran server...");

  let db_pool = PgPoolOptions::new()
    .max_connections(app_config.database_max_connections)
    .connect(&app_config.database_url)
    .await
    .map_err(|e| {
      tracing::error!(error = %e, "Failed to connect to the database.");
      io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
    })?;
  tracing::info!("Successfully connected to the database.");

  let app_state = AppState::new(db_pool, app_config.clone());
  tracing::info!(
    checkout_scope = ?app_state.materializer.scope(),
    idle_timeout_secs = app_state.sessions.idle_timeout().as_secs(),
    "Session store ready."
  );
  spawn_session_sweeper(Arc::clone(&app_state.sessions), app_config.session_sweep_interval());

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
