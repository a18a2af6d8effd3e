mod api;
mod app;
mod cache;
mod config;
mod controller;
mod event;
mod logging;
mod ui;
mod worker;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "txr")]
#[command(about = "A terminal UI for reviewing and approving employee transactions")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/txr/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Read data from a JSON dataset instead of the configured source
  #[arg(short, long)]
  fixture: Option<PathBuf>,

  /// Page size for fixture data
  #[arg(long)]
  page_size: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config =
    config::Config::load(args.config.as_deref())?.with_overrides(args.fixture, args.page_size);

  // Keep the guard alive so buffered log lines are flushed on exit
  let _log_guard = logging::init(&config.log)?;

  let source = config.build_source()?;
  info!(source = %source.describe(), "starting txr");

  // Initialize and run the app
  let events = event::EventHandler::new(Duration::from_millis(250));
  let mut app = app::App::new(&config, source, events.sender());
  app.run(events).await?;

  info!("exiting");
  Ok(())
}
