use clap::Parser;
use feedkit::cli::{self, Cli};
use feedkit::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    tracing::debug!(version = feedkit::VERSION, built = feedkit::BUILD_DATE, "Starting");

    cli::run(cli).await
}
