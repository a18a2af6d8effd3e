use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::fixture::DEFAULT_PAGE_SIZE;
use crate::api::{FixtureSource, HttpSource, Source};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Custom title for header (defaults to "txr")
  pub title: Option<String>,
  #[serde(default)]
  pub source: SourceConfig,
  #[serde(default)]
  pub log: LogConfig,
}

/// Where employees and transactions come from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
  /// Remote transaction API
  Http { url: String },
  /// JSON dataset on disk, or the built-in sample when `path` is unset
  Fixture {
    path: Option<PathBuf>,
    #[serde(default = "default_page_size")]
    page_size: usize,
    #[serde(default = "default_latency_ms")]
    latency_ms: u64,
  },
}

impl Default for SourceConfig {
  fn default() -> Self {
    SourceConfig::Fixture {
      path: None,
      page_size: default_page_size(),
      latency_ms: default_latency_ms(),
    }
  }
}

fn default_page_size() -> usize {
  DEFAULT_PAGE_SIZE
}

fn default_latency_ms() -> u64 {
  300
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// tracing filter directive, overridden by TXR_LOG
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Log directory (default: $XDG_DATA_HOME/txr/logs)
  pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      dir: None,
    }
  }
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./txr.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/txr/config.yaml
  ///
  /// Falls back to defaults (built-in sample data) when no file exists.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("txr.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("txr").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Apply command line overrides
  pub fn with_overrides(mut self, fixture: Option<PathBuf>, page_size: Option<usize>) -> Self {
    if let Some(path) = fixture {
      let latency_ms = match &self.source {
        SourceConfig::Fixture { latency_ms, .. } => *latency_ms,
        SourceConfig::Http { .. } => default_latency_ms(),
      };
      self.source = SourceConfig::Fixture {
        path: Some(path),
        page_size: default_page_size(),
        latency_ms,
      };
    }

    if let (Some(size), SourceConfig::Fixture { page_size, .. }) = (page_size, &mut self.source) {
      *page_size = size;
    }
    self
  }

  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("txr")
  }

  /// Build the configured data source
  pub fn build_source(&self) -> Result<Source> {
    match &self.source {
      SourceConfig::Http { url } => Ok(Source::Http(HttpSource::new(url, Self::get_api_token())?)),
      SourceConfig::Fixture {
        path,
        page_size,
        latency_ms,
      } => {
        let fixture = match path {
          Some(p) => FixtureSource::load(p)?,
          None => FixtureSource::sample()?,
        };
        Ok(Source::Fixture(
          fixture
            .with_page_size(*page_size)
            .with_latency(Duration::from_millis(*latency_ms)),
        ))
      }
    }
  }

  /// Get the API bearer token from the environment, if set.
  ///
  /// Checks TXR_API_TOKEN.
  pub fn get_api_token() -> Option<String> {
    std::env::var("TXR_API_TOKEN")
      .ok()
      .filter(|t| !t.is_empty())
  }
}
