use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    features::{
        favorites::repository::{add_favorite, get_favorites, remove_favorite},
        pagination::Pagination,
        search::schemas::SearchResponse,
    },
    services::database::Database,
    utilities::{errors::AppError, identity::UserId},
};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddFavorite {
    pub listing_id: Uuid,
}

pub async fn get_favorites_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let pagination = pagination.clamped();
    let favorites =
        get_favorites(&database.pool, user_id, pagination.limit, pagination.offset).await?;

    Ok(Json(SearchResponse::new(
        favorites,
        pagination.limit,
        pagination.offset,
    )))
}

pub async fn add_favorite_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Json(body): Json<AddFavorite>,
) -> Result<impl IntoResponse, AppError> {
    add_favorite(&database.pool, user_id, body.listing_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"message": "Listing added to favorites"})),
    ))
}

pub async fn remove_favorite_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Path(listing_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    remove_favorite(&database.pool, user_id, listing_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
