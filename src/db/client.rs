use std::time::Duration;

use anyhow::{Context, Result};
use mongodb::{
  bson::doc,
  options::{ClientOptions, Credential},
  Client, Database,
};

use crate::config::MongoConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn client_options(config: &MongoConfig) -> Result<ClientOptions> {
  let mut options = ClientOptions::parse(config.uri())
    .await
    .with_context(|| format!("invalid mongodb address {}", config.uri()))?;

  options.app_name = Some("users-api".to_string());
  options.connect_timeout = Some(CONNECT_TIMEOUT);
  options.server_selection_timeout = Some(CONNECT_TIMEOUT);

  if config.has_credentials() {
    let mut credential = Credential::default();
    credential.username = Some(config.username.clone());
    credential.password = Some(config.password.clone());
    credential.source = Some(config.auth_source().to_string());
    options.credential = Some(credential);
  }

  Ok(options)
}

/// Connects to MongoDB, verifies the server answers a ping and returns the configured database.
///
/// The returned handle is cheap to clone; the driver pools connections behind it.
pub async fn create_database(config: &MongoConfig) -> Result<Database> {
  let options = client_options(config).await?;
  let client = Client::with_options(options).context("failed to connect mongodb")?;
  let db = client.database(&config.database);

  db.run_command(doc! { "ping": 1 })
    .await
    .context("failed to ping mongodb")?;

  tracing::info!(host = %config.host, port = config.port, database = %config.database, "connected to mongodb");
  Ok(db)
}
