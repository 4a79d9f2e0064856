use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    features::listings::{
        repository::{
            create_listing, delete_listing, get_listing, get_listing_photo_paths,
            get_own_listings, update_listing,
        },
        schemas::{CreateListing, ListingOut, UpdateListing},
    },
    features::pagination::Pagination,
    services::database::Database,
    utilities::{app_state::AppState, errors::AppError, identity::UserId, photos::photo_urls},
};

pub async fn create_listing_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Json(input): Json<CreateListing>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    let listing = create_listing(&database.pool, user_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ListingOut {
            listing,
            photos: vec![],
        }),
    ))
}

pub async fn get_listing_handler(
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let listing = get_listing(&state.database.pool, &listing_id).await?;
    let paths = get_listing_photo_paths(&state.database.pool, &listing_id).await?;
    let photos = photo_urls(&state.config.storage_public_url, &paths);

    Ok(Json(ListingOut { listing, photos }))
}

pub async fn get_own_listings_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let pagination = pagination.clamped();
    let listings =
        get_own_listings(&database.pool, user_id, pagination.limit, pagination.offset).await?;
    let count = listings.len();

    Ok(Json(serde_json::json!({
        "data": listings,
        "pagination": {
            "limit": pagination.limit,
            "offset": pagination.offset,
            "count": count,
        },
    })))
}

pub async fn update_listing_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Path(listing_id): Path<Uuid>,
    Json(update): Json<UpdateListing>,
) -> Result<impl IntoResponse, AppError> {
    update.validate()?;

    if update.is_empty() {
        return Err(AppError::ValidationError(
            "No fields to update".to_string(),
        ));
    }

    let listing = update_listing(&database.pool, listing_id, user_id, &update).await?;

    Ok(Json(listing))
}

pub async fn delete_listing_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Path(listing_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    delete_listing(&database.pool, listing_id, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
