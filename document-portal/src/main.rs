use clap::Parser;
use document_portal::cli::{self, Cli};
use document_portal::config::get_configuration;
use document_portal::session::store::FileTokenStore;
use document_portal::PortalContext;
use portal_core::observability::init_tracing;
use std::sync::Arc;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let configuration = get_configuration(cli.config.as_deref()).map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(&configuration.log.level);
    init_tracing(log_level, configuration.log.format);

    let tokens = Arc::new(FileTokenStore::new(
        configuration.session.token_path.clone(),
    ));
    debug!(
        api_root = %configuration.api.api_root(),
        token_path = %tokens.path().display(),
        "Starting document-portal"
    );

    let ctx = PortalContext::new(configuration, tokens).map_err(|e| {
        tracing::error!("Failed to build HTTP client: {}", e);
        anyhow::anyhow!("Failed to build HTTP client: {}", e)
    })?;

    cli::run(cli.command, ctx).await
}
