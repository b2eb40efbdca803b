use anyhow::{Context, Result};
use api_localization::{config::LocalizationConfig, i18n::Catalogs, server};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_localization=info".parse()?),
        )
        .init();

    info!("Starting localized API server");

    // Load configuration from environment
    let config = LocalizationConfig::from_env()?;

    let catalogs = Arc::new(Catalogs::from_config(&config));
    let languages = catalogs.preload();
    if languages.is_empty() {
        info!(
            "No catalogs under {}, responses will use source text ({})",
            config.locale_dir.display(),
            config.source_language
        );
    }

    let app = server::app(catalogs);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✓ Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
