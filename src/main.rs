use clap::Parser;
use tessernote::cli::commands::Cli;
use tessernote::cli::handlers;
use tessernote::tracing_setup::{self, Fallback};

fn main() {
    let cli = Cli::parse();

    let config = match handlers::resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let fallback = if cli.command.is_none() {
        Fallback::Discard
    } else {
        Fallback::Stderr
    };
    if let Err(e) = tracing_setup::init(&config.log, fallback) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = tessernote::tui::run(&config, cli.demo) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli, config) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
