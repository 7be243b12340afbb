mod app;
mod badges;
mod board;
mod cache;
mod config;
mod event;
mod fetch;
mod jira;
mod logging;
mod scanner;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "jira-badges")]
#[command(about = "Annotates Jira scrum board tickets with pull request and hygiene badges")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/jira-badges/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Agile board id to watch
  #[arg(short, long)]
  board: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override board if specified on command line
  if let Some(board) = args.board {
    config.board.id = board;
  }

  let _log_guard = logging::init()?;
  info!(board = config.board.id, version = scanner::VERSION, "starting");

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
