mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use temperature_heatmap::config::init_app_config;
use temperature_heatmap::logging::init_logging;
use temperature_heatmap::LogTarget;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;
    let headless = args.wants_headless() || !is_terminal();

    // The UI owns the terminal, so interactive runs log to a file
    let log_target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_file.clone())
    };
    init_logging(config.debug, &log_target)?;
    log::info!("Using dataset from {}", config.source);

    let mut app = App::new(config);

    if headless {
        return event::run_headless(&mut app, args.json, args.svg.is_some()).await;
    }

    let mut terminal = terminal::setup_terminal()?;

    let result = event::run(&mut terminal, &mut app).await;

    terminal::cleanup_terminal_state(true, true);

    if let Err(e) = &result {
        log::error!("Exited with error: {e}");
    }
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
