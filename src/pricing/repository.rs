//! Tour data lookup: per-tour fixed expenses, room layouts and names.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::AppError;

use super::models::{FixedExpense, RoomOccupant};
use super::queries;

/// Read access to stored tours
#[async_trait]
pub trait TourRepository: Send + Sync {
    /// Fixed expenses recorded for a tour, in display order. Empty if none.
    async fn load_fixed_expenses(&self, tour_id: Uuid) -> Result<Vec<FixedExpense>, AppError>;

    /// Room layout recorded for a tour, in room-number order. Empty if none.
    async fn load_rooms(&self, tour_id: Uuid) -> Result<Vec<RoomOccupant>, AppError>;

    async fn tour_name(&self, tour_id: Uuid) -> Result<Option<String>, AppError>;
}

/// Repository used when no database is configured; it knows no tours.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTourRepository;

#[async_trait]
impl TourRepository for DefaultTourRepository {
    async fn load_fixed_expenses(&self, _tour_id: Uuid) -> Result<Vec<FixedExpense>, AppError> {
        Ok(Vec::new())
    }

    async fn load_rooms(&self, _tour_id: Uuid) -> Result<Vec<RoomOccupant>, AppError> {
        Ok(Vec::new())
    }

    async fn tour_name(&self, _tour_id: Uuid) -> Result<Option<String>, AppError> {
        Ok(None)
    }
}

/// Postgres-backed repository with a moka cache in front.
#[derive(Clone)]
pub struct PgTourRepository {
    pool: PgPool,
    cache: AppCache,
}

impl PgTourRepository {
    pub fn new(pool: PgPool, cache: AppCache) -> Self {
        Self { pool, cache }
    }
}

#[async_trait]
impl TourRepository for PgTourRepository {
    async fn load_fixed_expenses(&self, tour_id: Uuid) -> Result<Vec<FixedExpense>, AppError> {
        if let Some(cached) = self.cache.expenses.get(&tour_id).await {
            debug!("Cache HIT for tour expenses: {}", tour_id);
            return Ok((*cached).clone());
        }

        debug!("Cache MISS for tour expenses: {}", tour_id);
        let expenses: Vec<FixedExpense> = queries::get_tour_expenses(&self.pool, tour_id)
            .await?
            .into_iter()
            .map(FixedExpense::from)
            .collect();

        self.cache
            .expenses
            .insert(tour_id, Arc::new(expenses.clone()))
            .await;
        Ok(expenses)
    }

    async fn load_rooms(&self, tour_id: Uuid) -> Result<Vec<RoomOccupant>, AppError> {
        if let Some(cached) = self.cache.rooms.get(&tour_id).await {
            debug!("Cache HIT for tour rooms: {}", tour_id);
            return Ok((*cached).clone());
        }

        debug!("Cache MISS for tour rooms: {}", tour_id);
        let rooms: Vec<RoomOccupant> = queries::get_tour_rooms(&self.pool, tour_id)
            .await?
            .into_iter()
            .map(RoomOccupant::from)
            .collect();

        self.cache.rooms.insert(tour_id, Arc::new(rooms.clone())).await;
        Ok(rooms)
    }

    async fn tour_name(&self, tour_id: Uuid) -> Result<Option<String>, AppError> {
        if let Some(cached) = self.cache.tour_names.get(&tour_id).await {
            return Ok(Some((*cached).clone()));
        }

        let tour = queries::get_tour(&self.pool, tour_id).await?;
        if let Some(tour) = &tour {
            self.cache
                .tour_names
                .insert(tour_id, Arc::new(tour.name.clone()))
                .await;
        }
        Ok(tour.map(|tour| tour.name))
    }
}
