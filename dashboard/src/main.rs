use clap::Parser;
use hospital_dashboard::cli::{self, Cli};
use hospital_dashboard::Dashboard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config()?;
    tracing::debug!(api = %config.base_url(), "using backend");

    let mut dashboard = Dashboard::new(&config)?;
    if !cli::run(&mut dashboard, cli.command).await? {
        std::process::exit(1);
    }

    Ok(())
}
