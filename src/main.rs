use tour_pricing::cache::start_cache_warmer;
use tour_pricing::config::Config;
use tour_pricing::{app, build_state};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tour_pricing=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = build_state(&config).await?;

    if let Some(db) = state.db.clone() {
        tokio::spawn(start_cache_warmer(state.cache.clone(), db));
    }

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!("Tour pricing listening on {}", config.listen_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
