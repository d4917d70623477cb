//! In-memory caching using moka
//!
//! Caches tour data read from the database. Exchange rates are never cached;
//! every pricing request fetches its own snapshot.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::pricing::models::{FixedExpense, RoomOccupant};
use crate::pricing::queries;

/// Number of tours preloaded by the cache warmer
const WARM_TOUR_LIMIT: i64 = 50;

/// Application cache holding per-tour lookups
#[derive(Clone)]
pub struct AppCache {
    /// Fixed expenses (tour id -> expense lines)
    pub expenses: Cache<Uuid, Arc<Vec<FixedExpense>>>,
    /// Room layouts (tour id -> rooms)
    pub rooms: Cache<Uuid, Arc<Vec<RoomOccupant>>>,
    /// Tour display names (tour id -> name)
    pub tour_names: Cache<Uuid, Arc<String>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Expenses: 500 tours, 10 min TTL (edited from the admin side)
            expenses: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),

            // Rooms: 500 tours, 10 min TTL
            rooms: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),

            // Names rarely change
            tour_names: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(60 * 60))
                .time_to_idle(Duration::from_secs(30 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            expenses_size: self.expenses.entry_count(),
            rooms_size: self.rooms.entry_count(),
            tour_names_size: self.tour_names.entry_count(),
        }
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub expenses_size: u64,
    pub rooms_size: u64,
    pub tour_names_size: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Preload expenses and rooms of the most recent tours
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    let tour_ids = match queries::list_recent_tour_ids(db, WARM_TOUR_LIMIT).await {
        Ok(ids) => ids,
        Err(e) => {
            warn!("Failed to list tours for cache warm-up: {}", e);
            return;
        }
    };

    for tour_id in tour_ids {
        match queries::get_tour_expenses(db, tour_id).await {
            Ok(rows) => {
                let expenses: Vec<FixedExpense> = rows.into_iter().map(FixedExpense::from).collect();
                cache.expenses.insert(tour_id, Arc::new(expenses)).await;
            }
            Err(e) => warn!("Failed to warm expenses for tour {}: {}", tour_id, e),
        }

        match queries::get_tour_rooms(db, tour_id).await {
            Ok(rows) => {
                let rooms: Vec<RoomOccupant> = rows.into_iter().map(RoomOccupant::from).collect();
                cache.rooms.insert(tour_id, Arc::new(rooms)).await;
            }
            Err(e) => warn!("Failed to warm rooms for tour {}: {}", tour_id, e),
        }
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
