use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;

mod app;
mod chat;
mod config;
mod handler;
mod locale;
mod logging;
mod message;
mod reply;
mod tui;
mod ui;

use app::App;
use config::Config;
use reply::ReplyScheduler;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "museum-mate")]
#[command(about = "Chat with the museum ticket assistant in your terminal")]
#[command(version)]
struct Cli {
    /// Delay before the assistant answers, in milliseconds
    #[arg(long, env = "MUSEUM_MATE_REPLY_DELAY_MS")]
    reply_delay_ms: Option<u64>,
    /// Write logs here instead of the config directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?.with_overrides(cli.reply_delay_ms, cli.log_file);
    logging::init(&config.log_path()?)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        reply_delay_ms = config.reply_delay_ms,
        "starting museum-mate"
    );

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &config).await;

    tui::restore()?;
    match &result {
        Ok(()) => tracing::info!("exited cleanly"),
        Err(e) => tracing::error!(error = %e, "exited with error"),
    }
    result
}

async fn run(terminal: &mut Tui, config: &Config) -> Result<()> {
    let mut events = EventHandler::new();
    let mut app = App::new(ReplyScheduler::new(events.sender(), config.reply_delay()));

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event),
            None => break,
        }
    }

    Ok(())
}
