//! Notetype CLI - classify zettelkasten notes from the command line.

use clap::Parser;
use notetype_cli::commands;
use notetype_cli::{Cli, Command, ConfigStore, Formatter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> notetype_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    notetype_cli::init_tracing(cli.verbose);

    // Flags and environment override saved credentials
    let overrides = cli.credential_overrides();

    // Load or create config
    let store = ConfigStore::open(cli.config)?;
    let config = store.load_or_init().await?;

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.output.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.output.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Classify(args) => {
            commands::execute_classify(args, &store, &overrides, &config, &formatter).await?;
        }
        Command::Settings(args) => {
            commands::execute_settings(args, &store, &overrides, &formatter).await?;
        }
    }

    Ok(())
}
