use anyhow::Result;
use tracing::info;

use expense_dashboard::config::Config;
use expense_dashboard::{create_router, initialize_backend, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the process environment still applies
    let dotenv = dotenvy::dotenv();

    logging::init();
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env()?;
    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config.cors_origin)?;

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
