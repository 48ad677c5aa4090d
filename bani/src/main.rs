use anyhow::Result;
use bani::cli::{Cli, Commands};
use bani::commands;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so BANI_CATALOG can come from there.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let catalog = cli.catalog.as_path();
    match cli.command {
        Commands::Issuers(args) => commands::handle_issuers(args, catalog).await?,
        Commands::Tree => commands::handle_tree(catalog).await?,
        Commands::Comment(args) => commands::handle_comment(args, catalog).await?,
        Commands::Remove(args) => commands::handle_remove(args, catalog).await?,
    }

    Ok(())
}

/// RUST_LOG takes precedence over the verbosity flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
