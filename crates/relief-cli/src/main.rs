//! Relief CLI Entry Point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relief_cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Predict(args) => commands::execute_predict(config, args)?,
        Commands::Estimate(args) => commands::execute_estimate(config, args)?,
        Commands::Allocate(args) => commands::execute_allocate(config, args)?,
        Commands::Analyze(args) => commands::execute_analyze(config, args)?,
        Commands::Regions(args) => commands::execute_regions(config, args)?,
        Commands::Serve(args) => commands::execute_serve(config, args).await?,
        Commands::Version => {
            println!("relief {}", env!("CARGO_PKG_VERSION"));
            println!("relief-core version: {}", relief_core::VERSION);
        }
    }

    Ok(())
}
