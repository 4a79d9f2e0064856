use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    features::listings::{
        models::{Listing, ListingStatus},
        schemas::{CreateListing, UpdateListing},
    },
    services::geo::{polygon_centroid, postgis_point},
    utilities::errors::AppError,
};

const LISTING_COLUMNS: &str = "id, owner_id, title, description, price, op_type, rooms, surface, \
     status, lat, lng, sub_polygon, polygon_color, created_at, updated_at";

pub async fn create_listing(
    pool: &PgPool,
    owner_id: Uuid,
    input: &CreateListing,
) -> Result<Listing, AppError> {
    let location = postgis_point(input.lat, input.lng)?;

    let query = format!(
        r#"
        INSERT INTO listings
            (id, owner_id, title, description, price, op_type, rooms, surface, status, lat, lng, location)
        VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, ST_GeogFromText($12))
        RETURNING {LISTING_COLUMNS}
        "#
    );

    let listing = sqlx::query_as::<_, Listing>(&query)
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.op_type)
        .bind(input.rooms)
        .bind(input.surface)
        .bind(ListingStatus::Draft)
        .bind(input.lat)
        .bind(input.lng)
        .bind(location)
        .fetch_one(pool)
        .await?;

    Ok(listing)
}

pub async fn get_listing(pool: &PgPool, listing_id: &Uuid) -> Result<Listing, AppError> {
    let query = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1");

    sqlx::query_as::<_, Listing>(&query)
        .bind(listing_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Listing not found".to_string()))
}

pub async fn get_listing_photo_paths(
    pool: &PgPool,
    listing_id: &Uuid,
) -> Result<Vec<String>, AppError> {
    let paths = sqlx::query_scalar::<_, String>(
        r#"
        SELECT storage_path
        FROM listing_photos
        WHERE listing_id = $1
        ORDER BY is_primary DESC, created_at
        "#,
    )
    .bind(listing_id)
    .fetch_all(pool)
    .await?;

    Ok(paths)
}

pub async fn get_own_listings(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Listing>, AppError> {
    let query = format!(
        r#"
        SELECT {LISTING_COLUMNS}
        FROM listings
        WHERE owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    );

    let listings = sqlx::query_as::<_, Listing>(&query)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(listings)
}

pub async fn update_listing(
    pool: &PgPool,
    listing_id: Uuid,
    user_id: Uuid,
    update: &UpdateListing,
) -> Result<Listing, AppError> {
    let existing = get_listing(pool, &listing_id).await?;

    if existing.owner_id != user_id {
        return Err(AppError::ForbiddenError);
    }

    let target_status = update.status.unwrap_or(existing.status);
    if target_status == ListingStatus::Published {
        ensure_resolvable_location(&existing, update)?;
    }

    let mut qb = QueryBuilder::new("UPDATE listings SET updated_at = now()");

    if let Some(title) = &update.title {
        qb.push(", title = ").push_bind(title);
    }
    if let Some(op_type) = update.op_type {
        qb.push(", op_type = ").push_bind(op_type);
    }
    if let Some(price) = update.price {
        qb.push(", price = ").push_bind(price);
    }
    if let Some(rooms) = update.rooms {
        qb.push(", rooms = ").push_bind(rooms);
    }
    if let Some(surface) = update.surface {
        qb.push(", surface = ").push_bind(surface);
    }
    if let Some(description) = &update.description {
        qb.push(", description = ").push_bind(description);
    }
    if let Some(status) = update.status {
        qb.push(", status = ").push_bind(status);
    }
    if let (Some(lat), Some(lng)) = (update.lat, update.lng) {
        let location = postgis_point(lat, lng)?;
        qb.push(", lat = ").push_bind(lat);
        qb.push(", lng = ").push_bind(lng);
        qb.push(", location = ST_GeogFromText(");
        qb.push_bind(location);
        qb.push(")");
    }

    qb.push(" WHERE id = ").push_bind(listing_id);
    qb.push(" RETURNING ").push(LISTING_COLUMNS);

    let listing = qb.build_query_as::<Listing>().fetch_one(pool).await?;

    Ok(listing)
}

pub async fn delete_listing(
    pool: &PgPool,
    listing_id: Uuid,
    user_id: Uuid,
) -> Result<(), AppError> {
    let query_result = sqlx::query("DELETE FROM listings WHERE owner_id = $1 AND id = $2")
        .bind(user_id)
        .bind(listing_id)
        .execute(pool)
        .await?;

    match query_result.rows_affected() {
        0 => Err(AppError::DatabaseDeleteError {
            resource: "Listing".to_string(),
            id: listing_id.to_string(),
        }),
        _ => Ok(()),
    }
}

/// A published listing must map somewhere: an explicit lat/lng pair (either
/// incoming or already stored) or a polygon centroid.
fn ensure_resolvable_location(
    existing: &Listing,
    update: &UpdateListing,
) -> Result<(), AppError> {
    let lat = update.lat.or(existing.lat);
    let lng = update.lng.or(existing.lng);

    if lat.is_some() && lng.is_some() {
        return Ok(());
    }

    if let Some(polygon) = &existing.sub_polygon
        && polygon_centroid(&polygon.0).is_some()
    {
        return Ok(());
    }

    Err(AppError::ValidationError(
        "A published listing needs a resolvable location (lat/lng or polygon)".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn listing_without_location() -> Listing {
        Listing {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Appartement au Ksar".to_string(),
            description: None,
            price: 60000.0,
            op_type: Default::default(),
            rooms: Some(3),
            surface: None,
            status: ListingStatus::Draft,
            lat: None,
            lng: None,
            sub_polygon: None,
            polygon_color: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn publish_rejected_without_any_location() {
        let existing = listing_without_location();
        let update = UpdateListing {
            status: Some(ListingStatus::Published),
            ..Default::default()
        };

        assert!(ensure_resolvable_location(&existing, &update).is_err());
    }

    #[test]
    fn publish_allowed_with_incoming_latlng() {
        let existing = listing_without_location();
        let update = UpdateListing {
            status: Some(ListingStatus::Published),
            lat: Some(18.08),
            lng: Some(-15.97),
            ..Default::default()
        };

        assert!(ensure_resolvable_location(&existing, &update).is_ok());
    }

    #[test]
    fn publish_allowed_with_polygon_centroid() {
        let mut existing = listing_without_location();
        existing.sub_polygon = Some(Json(vec![
            [-15.98, 18.07],
            [-15.96, 18.07],
            [-15.97, 18.09],
        ]));

        let update = UpdateListing {
            status: Some(ListingStatus::Published),
            ..Default::default()
        };

        assert!(ensure_resolvable_location(&existing, &update).is_ok());
    }
}
