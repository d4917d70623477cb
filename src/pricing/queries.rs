//! Database queries for stored tours.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::{Tour, TourExpense, TourRoom};

/// Get a tour by id
pub async fn get_tour(pool: &PgPool, tour_id: Uuid) -> Result<Option<Tour>, AppError> {
    let tour = sqlx::query_as::<_, Tour>(
        r#"
        SELECT id, name
        FROM tours
        WHERE id = $1
        "#,
    )
    .bind(tour_id)
    .fetch_optional(pool)
    .await?;

    Ok(tour)
}

/// Fixed expense lines for a tour, in display order
pub async fn get_tour_expenses(pool: &PgPool, tour_id: Uuid) -> Result<Vec<TourExpense>, AppError> {
    let expenses = sqlx::query_as::<_, TourExpense>(
        r#"
        SELECT label, amount
        FROM tour_expenses
        WHERE tour_id = $1
        ORDER BY position ASC, label ASC
        "#,
    )
    .bind(tour_id)
    .fetch_all(pool)
    .await?;

    Ok(expenses)
}

/// Room occupancy records for a tour, by room number
pub async fn get_tour_rooms(pool: &PgPool, tour_id: Uuid) -> Result<Vec<TourRoom>, AppError> {
    let rooms = sqlx::query_as::<_, TourRoom>(
        r#"
        SELECT room_number, adults, children, infants, room_type
        FROM tour_rooms
        WHERE tour_id = $1
        ORDER BY room_number ASC
        "#,
    )
    .bind(tour_id)
    .fetch_all(pool)
    .await?;

    Ok(rooms)
}

/// Most recently created tour ids, for cache warm-up
pub async fn list_recent_tour_ids(pool: &PgPool, limit: i64) -> Result<Vec<Uuid>, AppError> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM tours
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}
