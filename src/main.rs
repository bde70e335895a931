use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::cli::handlers;
use taskboard::io::api_client::HttpTaskApi;
use taskboard::io::config_io::{default_config_path, env_base_url, load_config, resolve_base_url};
use taskboard::io::state::state_path;
use taskboard::logging::{LogTarget, init_logging};

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;

    let target = if cli.command.is_some() {
        LogTarget::Stderr
    } else {
        LogTarget::File
    };
    let _guard = init_logging(target, cli.log_level.as_deref(), &config.log)?;

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let base_url = resolve_base_url(
        cli.base_url.as_deref(),
        env_base_url().as_deref(),
        &config,
        &config_path,
    )?;
    let timeout = match config.api.timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let api = HttpTaskApi::new(&base_url, timeout)?;

    match cli.command {
        // No subcommand → launch TUI
        None => taskboard::tui::run(Arc::new(api), &config, cli.query.as_deref(), &state_path()),
        Some(command) => handlers::dispatch(command, &api, cli.json),
    }
}
