//! Network Diagnostics Console - entry point
//!
//! Loads configuration, builds the tool set and runs the interactive console
//! on stdin/stdout until an exit command or end of input.

use clap::Parser;
use netdiag_console::{
    cli::Cli,
    config::parser::{display_config_summary, load_config},
    error::{AppError, Result},
    logging::LoggerFactory,
    output::Presenter,
    stats::hostname,
    Console, Toolkit, PKG_NAME, VERSION,
};
use std::process;
use tokio::io::BufReader;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(netdiag_console::cli::supports_color()));
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

async fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::validation)?;

    let config = load_config(cli)?;

    if config.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!("{}", display_config_summary(&config));
        eprintln!();
    }

    let loggers = LoggerFactory::new(config.clone());
    let logger = loggers.create_logger("MAIN").await;
    netdiag_console::log_info!(logger, "Starting session {}", loggers.session_id());

    let toolkit = Toolkit::from_config(&config, &loggers).await?;
    let presenter = Presenter::new(config.enable_color);

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin, stdout.lock(), presenter, toolkit, hostname());

    console.run().await?;

    netdiag_console::log_info!(logger, "Session ended");
    Ok(())
}

fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) | AppError::Parse(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - URLs must start with http:// or https://");
            eprintln!("  - Timeouts are whole seconds between 1 and 300");
            eprintln!("  - DSTAT_INTERVAL_MS must be between 100 and 60000");
        }
        AppError::Network(_) | AppError::HttpRequest(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check your internet connection");
            eprintln!("  - Verify proxy and firewall settings");
        }
        _ => {}
    }
}
