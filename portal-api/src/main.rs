use tracing::info;
use tracing_subscriber::EnvFilter;

mod adapters;
mod app_state;
mod auth;
mod config;
mod factory;
mod repositories;
mod router;
mod routes;

use app_state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("portal_api=info,portal_search=info,tower_http=info")
        }))
        .init();

    let config = config::read_config()?;

    let searcher = factory::create_searcher(&config);
    let app_state = AppState::new(searcher, config.search.clone());
    let app = router::create(app_state, &config);

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, backend = %config.search.backend, "Portal API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
