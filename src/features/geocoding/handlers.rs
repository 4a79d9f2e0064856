use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    features::geocoding::{client::reverse_geocode, neighborhoods::search_neighborhoods},
    services::geo::valid_coordinates,
    utilities::{app_state::AppState, errors::AppError},
};

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
pub struct NeighborhoodQuery {
    pub q: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}

pub async fn neighborhoods_handler(
    Query(query): Query<NeighborhoodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let results = search_neighborhoods(query.q.as_deref().unwrap_or_default());

    Ok(Json(serde_json::json!({"data": results})))
}

pub async fn reverse_geocode_handler(
    State(state): State<AppState>,
    Query(query): Query<ReverseQuery>,
) -> Result<impl IntoResponse, AppError> {
    if !valid_coordinates(query.lat, query.lng) {
        return Err(AppError::InvalidCoordinatesError);
    }

    let result = reverse_geocode(
        &state.http_client,
        &state.config.nominatim_endpoint,
        query.lat,
        query.lng,
    )
    .await?
    .ok_or_else(|| AppError::NotFoundError("No address found for coordinates".to_string()))?;

    Ok(Json(result))
}
