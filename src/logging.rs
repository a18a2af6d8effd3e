use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Route tracing output to a daily log file. The terminal belongs to the UI.
///
/// Keep the returned guard alive for the lifetime of the program so buffered
/// lines are flushed on exit.
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
  let dir = match &config.dir {
    Some(dir) => dir.clone(),
    None => default_log_dir()?,
  };
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(&dir, "txr.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(env_filter(&config.level)?)
    .with_writer(writer)
    .with_ansi(false)
    .with_target(true)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}

/// TXR_LOG wins over the configured level
fn env_filter(level: &str) -> Result<EnvFilter> {
  match EnvFilter::try_from_env("TXR_LOG") {
    Ok(filter) => Ok(filter),
    Err(_) => {
      EnvFilter::try_new(level).map_err(|e| eyre!("Invalid log level '{}': {}", level, e))
    }
  }
}

fn default_log_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("txr").join("logs"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_level_directive_parses() {
    assert!(EnvFilter::try_new("txr=debug,reqwest=warn").is_ok());
  }

  #[test]
  fn test_default_log_dir_is_namespaced() {
    if let Ok(dir) = default_log_dir() {
      assert!(dir.ends_with("txr/logs"));
    }
  }
}
