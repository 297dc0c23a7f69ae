use std::{
  fs::{self, File, OpenOptions},
  io,
  path::Path,
  sync::Mutex,
};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub const LOG_FILE: &str = "app.log";

/// Opens `<dir>/app.log` for appending, creating the directory when missing.
pub fn open_log_file(dir: &Path) -> io::Result<File> {
  fs::create_dir_all(dir)?;
  OpenOptions::new().create(true).append(true).open(dir.join(LOG_FILE))
}

/// Installs the global subscriber: stdout plus the log file, both tagged with the caller's file and line.
///
/// `RUST_LOG` takes precedence over the level derived from `is_debug`.
pub fn init(config: &Config) -> anyhow::Result<()> {
  let file = open_log_file(Path::new(&config.log_dir))?;
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.default_log_filter().into());

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_file(true).with_line_number(true))
    .with(
      fmt::layer()
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(file)),
    )
    .try_init()?;

  Ok(())
}
