use std::{env, net::SocketAddr, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub is_debug: bool,
  #[serde(default = "default_log_dir")]
  pub log_dir: String,
  pub listen: ListenConfig,
  pub mongodb: MongoConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenType {
  /// Unix domain socket next to the executable.
  Sock,
  #[default]
  Port,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
  #[serde(rename = "type", default)]
  pub listen_type: ListenType,
  #[serde(default = "default_bind_ip")]
  pub bind_ip: String,
  #[serde(default = "default_port")]
  pub port: u16,
  #[serde(default = "default_read_timeout")]
  pub read_timeout_secs: u64,
  #[serde(default = "default_write_timeout")]
  pub write_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
  pub host: String,
  #[serde(default = "default_mongo_port")]
  pub port: u16,
  pub database: String,
  #[serde(default)]
  pub auth_db: String,
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub password: String,
  pub collection: String,
}

fn default_log_dir() -> String {
  "logs".to_string()
}

fn default_bind_ip() -> String {
  "0.0.0.0".to_string()
}

fn default_port() -> u16 {
  8080
}

fn default_read_timeout() -> u64 {
  5
}

fn default_write_timeout() -> u64 {
  10
}

fn default_mongo_port() -> u16 {
  27017
}

impl Config {
  /// Path of the config file: `CONFIG_PATH`, or `config.yml`.
  pub fn path() -> String {
    env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
  }

  /// Reads the YAML file at [`Config::path`] and applies environment overrides.
  pub fn load() -> Result<Self> {
    let path = Self::path();
    let raw = std::fs::read_to_string(&path).with_context(|| format!("failed to read config file {}", path))?;
    let mut config = Self::from_yaml(&raw).with_context(|| format!("failed to parse config file {}", path))?;
    config.apply_env_overrides()?;
    Ok(config)
  }

  pub fn from_yaml(raw: &str) -> Result<Self> {
    Ok(serde_yaml::from_str(raw)?)
  }

  pub fn apply_env_overrides(&mut self) -> Result<()> {
    if let Ok(port) = env::var("PORT") {
      self.listen.port = port.parse().with_context(|| format!("invalid PORT: {}", port))?;
    }
    if let Ok(host) = env::var("DB_HOST") {
      self.mongodb.host = host;
    }
    if let Ok(port) = env::var("DB_PORT") {
      self.mongodb.port = port.parse().with_context(|| format!("invalid DB_PORT: {}", port))?;
    }
    if let Ok(username) = env::var("DB_USERNAME") {
      self.mongodb.username = username;
    }
    if let Ok(password) = env::var("DB_PASSWORD") {
      self.mongodb.password = password;
    }
    Ok(())
  }

  /// Filter directive used when `RUST_LOG` is not set.
  pub fn default_log_filter(&self) -> &'static str {
    if self.is_debug {
      "users_api=debug,tower_http=debug"
    } else {
      "users_api=info,tower_http=info"
    }
  }
}

impl ListenConfig {
  pub fn socket_addr(&self) -> Result<SocketAddr> {
    let addr = format!("{}:{}", self.bind_ip, self.port);
    addr.parse().with_context(|| format!("invalid listen address {}", addr))
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.read_timeout_secs.max(self.write_timeout_secs))
  }
}

impl MongoConfig {
  pub fn uri(&self) -> String {
    format!("mongodb://{}:{}", self.host, self.port)
  }

  pub fn has_credentials(&self) -> bool {
    !self.username.is_empty() || !self.password.is_empty()
  }

  pub fn auth_source(&self) -> &str {
    if self.auth_db.is_empty() {
      &self.database
    } else {
      &self.auth_db
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const SAMPLE: &str = r#"
is_debug: true
listen:
  type: sock
  bind_ip: 127.0.0.1
  port: 9000
mongodb:
  host: mongo
  port: 27018
  database: users-service
  auth_db: admin
  username: root
  password: secret
  collection: users
"#;

  const MINIMAL: &str = r#"
listen: {}
mongodb:
  host: localhost
  database: users-service
  collection: users
"#;

  fn clear_overrides() {
    for key in ["PORT", "DB_HOST", "DB_PORT", "DB_USERNAME", "DB_PASSWORD"] {
      env::remove_var(key);
    }
  }

  #[test]
  fn parses_full_config() {
    let config = Config::from_yaml(SAMPLE).unwrap();
    assert!(config.is_debug);
    assert_eq!(config.listen.listen_type, ListenType::Sock);
    assert_eq!(config.listen.socket_addr().unwrap().to_string(), "127.0.0.1:9000");
    assert_eq!(config.mongodb.uri(), "mongodb://mongo:27018");
    assert_eq!(config.mongodb.auth_source(), "admin");
    assert!(config.mongodb.has_credentials());
  }

  #[test]
  fn applies_defaults() {
    let config = Config::from_yaml(MINIMAL).unwrap();
    assert!(!config.is_debug);
    assert_eq!(config.log_dir, "logs");
    assert_eq!(config.listen.listen_type, ListenType::Port);
    assert_eq!(config.listen.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
    assert_eq!(config.listen.request_timeout(), Duration::from_secs(10));
    assert_eq!(config.mongodb.uri(), "mongodb://localhost:27017");
    assert_eq!(config.mongodb.auth_source(), "users-service");
    assert!(!config.mongodb.has_credentials());
    assert_eq!(config.default_log_filter(), "users_api=info,tower_http=info");
  }

  #[test]
  fn rejects_unknown_listen_type() {
    let raw = MINIMAL.replace("listen: {}", "listen:\n  type: pipe");
    assert!(Config::from_yaml(&raw).is_err());
  }

  #[test]
  #[serial]
  fn env_overrides_file_values() {
    clear_overrides();
    env::set_var("PORT", "9100");
    env::set_var("DB_HOST", "db.internal");
    env::set_var("DB_PORT", "27100");
    env::set_var("DB_USERNAME", "svc");
    env::set_var("DB_PASSWORD", "pw");

    let mut config = Config::from_yaml(MINIMAL).unwrap();
    config.apply_env_overrides().unwrap();
    clear_overrides();

    assert_eq!(config.listen.port, 9100);
    assert_eq!(config.mongodb.uri(), "mongodb://db.internal:27100");
    assert_eq!(config.mongodb.username, "svc");
    assert_eq!(config.mongodb.password, "pw");
  }

  #[test]
  #[serial]
  fn invalid_numeric_override_is_an_error() {
    clear_overrides();
    env::set_var("DB_PORT", "not-a-port");

    let mut config = Config::from_yaml(MINIMAL).unwrap();
    let result = config.apply_env_overrides();
    clear_overrides();

    assert!(result.is_err());
  }

  #[test]
  #[serial]
  fn path_defaults_to_config_yml_and_honours_override() {
    env::remove_var("CONFIG_PATH");
    assert_eq!(Config::path(), "config.yml");

    env::set_var("CONFIG_PATH", "/etc/users-api/config.yml");
    let overridden = Config::path();
    env::remove_var("CONFIG_PATH");
    assert_eq!(overridden, "/etc/users-api/config.yml");
  }

  #[test]
  #[serial]
  fn load_reads_file_from_config_path() {
    clear_overrides();
    let path = env::temp_dir().join(format!("users-api-config-{}.yml", std::process::id()));
    std::fs::write(&path, SAMPLE).unwrap();
    env::set_var("CONFIG_PATH", &path);

    let config = Config::load();
    env::remove_var("CONFIG_PATH");
    let _ = std::fs::remove_file(&path);

    let config = config.unwrap();
    assert_eq!(config.mongodb.collection, "users");
    assert_eq!(config.listen.port, 9000);
  }
}
