//! jpkg - dependency-aware package installs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jpkg_cli::ops::Context;
use jpkg_cli::{Cli, Commands, cmd};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::load(cli.home, cli.dry_run, cli.yes)?;

    match cli.command {
        Commands::Install {
            packages,
            reinstall,
            reinstall_dependencies,
        } => cmd::install::install(&ctx, &packages, reinstall, reinstall_dependencies),
        Commands::Upgrade => cmd::upgrade::upgrade(&ctx),
        Commands::List => cmd::list::list(&ctx),
        Commands::Available => cmd::available::available(&ctx),
        Commands::Search { queries } => cmd::search::search(&ctx, &queries),
    }
}
