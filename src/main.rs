use anyhow::Context;
use tokio::signal;

use dotenvy::dotenv;

use users_api::app::{create_app, with_request_timeout};
use users_api::config::{Config, ListenType};
use users_api::db::client::create_database;
use users_api::state::SharedAppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv().ok();

  let config = Config::load()?;

  users_api::logging::init(&config)?;
  tracing::info!("read application configuration from {}", Config::path());

  tracing::info!("create storage");
  let db = create_database(&config.mongodb).await?;

  tracing::info!("create user service");
  let app_state = SharedAppState::new(&db, &config.mongodb.collection);
  let app = with_request_timeout(create_app(app_state), config.listen.request_timeout());

  match config.listen.listen_type {
    ListenType::Sock => serve_unix(app).await?,
    ListenType::Port => {
      let addr = config.listen.socket_addr()?;
      let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

      tracing::info!("start listening on {}", listener.local_addr()?);

      axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    }
  }

  Ok(())
}

#[cfg(unix)]
async fn serve_unix(app: axum::Router) -> anyhow::Result<()> {
  let exe = std::env::current_exe().context("failed to detect app path")?;
  let app_dir = exe.parent().context("executable has no parent directory")?;
  let socket_path = app_dir.join("app.sock");

  if socket_path.exists() {
    std::fs::remove_file(&socket_path)
      .with_context(|| format!("failed to remove stale socket {}", socket_path.display()))?;
  }

  let listener = tokio::net::UnixListener::bind(&socket_path)
    .with_context(|| format!("failed to bind unix socket {}", socket_path.display()))?;

  tracing::info!("start listening on unix socket {}", socket_path.display());

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}

#[cfg(not(unix))]
async fn serve_unix(_app: axum::Router) -> anyhow::Result<()> {
  anyhow::bail!("unix socket listening is only supported on unix platforms")
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::error!("failed to install Ctrl+C handler: {}", e);
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(e) => {
        tracing::error!("failed to install signal handler: {}", e);
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("received termination signal, shutting down gracefully");
}
