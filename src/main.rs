mod accounts;
mod categorizer;
mod checksum;
mod cli;
mod converter;
mod enhancer;
mod error;
mod fmt;
mod importer;
mod models;
mod reviewer;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands, ConfigCommands};

const LOG_ENV: &str = "LEDGERCONV_LOG";

fn init_logging(verbose: bool) {
    // Logs go to stderr; stdout carries the prompts and summary tables.
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    // Only fails if a subscriber is already installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert { input_dir, output } => cli::convert::run(&input_dir, output),
        Commands::Enhance {
            input_file,
            output,
            auto_enhance_spec,
            only_auto,
        } => cli::enhance::run(&input_file, output, auto_enhance_spec, only_auto),
        Commands::Rules { spec_file } => cli::rules::run(&spec_file),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::SetSign { sign } => cli::config::set_sign(sign),
        },
    };

    if let Err(e) = result {
        tracing::debug!(cause = %e.root(), "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
