use loan_calculator::{api::Server, config::Config, logging::init_logging};
use tracing::{info, warn};

/// The main entry point for the loan calculator service.
///
/// Loads configuration (file named by `LOAN_CALCULATOR_CONFIG`, falling back
/// to `config/default.toml` and then to defaults), initializes logging, and
/// serves the API until Ctrl+C.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_logging(&config.logging);

    match &config.source {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => warn!("No configuration file found, using defaults"),
    }
    info!("Loan calculator starting with config: {:?}", config);

    let server = Server::new(config);
    server.start().await?;

    Ok(())
}
