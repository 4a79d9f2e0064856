use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::{
    features::listings::models::{ListingStatus, OpType},
    utilities::errors::AppError,
};

const UNIQUE_VIOLATION: &str = "23505";

/// A favorite joined with its listing summary.
#[derive(FromRow, Serialize, Debug)]
pub struct FavoriteOut {
    pub listing_id: Uuid,
    pub favorited_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub op_type: OpType,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub listing_created_at: DateTime<Utc>,
}

pub async fn get_favorites(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FavoriteOut>, AppError> {
    let favorites = sqlx::query_as::<_, FavoriteOut>(
        r#"
        SELECT
            f.listing_id,
            f.created_at AS favorited_at,
            l.title,
            l.description,
            l.price,
            l.op_type,
            l.lat,
            l.lng,
            l.created_at AS listing_created_at
        FROM favorites f
        JOIN listings l ON l.id = f.listing_id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(favorites)
}

pub async fn add_favorite(pool: &PgPool, user_id: Uuid, listing_id: Uuid) -> Result<(), AppError> {
    let status = sqlx::query_scalar::<_, ListingStatus>(
        "SELECT status FROM listings WHERE id = $1",
    )
    .bind(listing_id)
    .fetch_optional(pool)
    .await?;

    match status {
        None => return Err(AppError::NotFoundError("Listing not found".to_string())),
        Some(ListingStatus::Published) => {}
        Some(_) => {
            return Err(AppError::ValidationError(
                "Listing not available".to_string(),
            ));
        }
    }

    let result = sqlx::query("INSERT INTO favorites (user_id, listing_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(listing_id)
        .execute(pool)
        .await;

    match result {
        Ok(_) => Ok(()),
        // Already favorited, treat as success
        Err(err)
            if err
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .as_deref()
                == Some(UNIQUE_VIOLATION) =>
        {
            debug!("Listing {listing_id} already favorited by {user_id}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn remove_favorite(
    pool: &PgPool,
    user_id: Uuid,
    listing_id: Uuid,
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND listing_id = $2")
        .bind(user_id)
        .bind(listing_id)
        .execute(pool)
        .await?;

    Ok(())
}
