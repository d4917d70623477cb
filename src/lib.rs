//! Tour package pricing service.
//!
//! Prices multi-person, multi-room tour packages whose hotel costs are in EUR
//! and whose fixed trip costs are in TRY, and returns the breakdown as XML.

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cache::{AppCache, CacheStats};
use crate::config::Config;
use crate::pricing::models::HotelTariff;
use crate::pricing::{
    DefaultTourRepository, HttpRateSource, OfflineRateSource, PgTourRepository, PricingService,
    RateSource, TourRepository,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pricing: Arc<PricingService>,
    pub cache: AppCache,
    /// Present only when DATABASE_URL is configured
    pub db: Option<PgPool>,
}

/// Build state from configuration.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let tariff = match &config.tariff_path {
        Some(path) => {
            info!("Loading tariff from {}", path.display());
            HotelTariff::from_json_file(path)?
        }
        None => HotelTariff::default(),
    };

    let rates: Arc<dyn RateSource> = if config.rates_offline {
        info!("Rate source offline, pricing with fallback rates");
        Arc::new(OfflineRateSource)
    } else {
        Arc::new(HttpRateSource::new(&config.rates_api_url, config.rates_timeout)?)
    };

    let cache = AppCache::new();
    let db = match &config.database_url {
        Some(url) => Some(
            PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect_lazy(url)?,
        ),
        None => None,
    };
    let tours: Arc<dyn TourRepository> = match &db {
        Some(pool) => Arc::new(PgTourRepository::new(pool.clone(), cache.clone())),
        None => {
            info!("DATABASE_URL not set, tour lookups disabled");
            Arc::new(DefaultTourRepository)
        }
    };

    let pricing = PricingService::new(tariff, rates, tours, config.rates_base.clone());

    Ok(AppState {
        pricing: Arc::new(pricing),
        cache,
        db,
    })
}

/// Build the HTTP application.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(pricing::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: bool,
    cache: CacheStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        database: state.db.is_some(),
        cache: state.cache.stats(),
    })
}
