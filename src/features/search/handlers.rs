use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::{
    features::{
        listings::schemas::ListingSummaryOut,
        search::{
            markers::{Marker, MarkerRow, resolve_row_coordinates},
            repository::{
                fallback_bbox_search, fallback_radius_search, is_degraded_procedure_error,
                search_markers_rpc, search_radius_rpc, text_search,
            },
            schemas::{
                MarkerQuery, RadiusFilters, RadiusQuery, SearchFilters, SearchResponse,
                TextSearchQuery,
            },
        },
    },
    services::database::Database,
    utilities::{
        errors::AppError,
        text::{clean_listing_title, format_price_mru},
    },
};

const UNTITLED_PLACEHOLDER: &str = "Sans titre";

pub async fn search_markers_handler(
    State(database): State<Database>,
    Query(raw): Query<MarkerQuery>,
) -> Result<Response, AppError> {
    let filters =
        SearchFilters::parse(&raw).map_err(|details| AppError::InvalidFilters { details })?;

    match search_markers_rpc(&database.pool, &filters).await {
        Ok(rows) => {
            let markers = markers_from_rows(rows);
            Ok(
                Json(SearchResponse::new(markers, filters.limit, filters.offset))
                    .into_response(),
            )
        }
        Err(err) if is_degraded_procedure_error(&err) => {
            warn!("search_listings unavailable ({err}), switching to fallback search");
            let markers = fallback_bbox_search(&database.pool, &filters).await?;
            Ok(
                Json(SearchResponse::new(markers, filters.limit, filters.offset))
                    .into_response(),
            )
        }
        Err(err) => {
            error!("Marker search error: {err}");
            Ok(server_error_envelope())
        }
    }
}

pub async fn search_radius_handler(
    State(database): State<Database>,
    Query(raw): Query<RadiusQuery>,
) -> Result<Response, AppError> {
    let filters =
        RadiusFilters::parse(&raw).map_err(|details| AppError::InvalidFilters { details })?;

    match search_radius_rpc(&database.pool, &filters).await {
        Ok(rows) => {
            let markers = markers_from_rows(rows);
            Ok(
                Json(SearchResponse::new(markers, filters.limit, filters.offset))
                    .into_response(),
            )
        }
        Err(err) if is_degraded_procedure_error(&err) => {
            warn!("search_listings_by_radius unavailable ({err}), switching to fallback search");
            let markers = fallback_radius_search(&database.pool, &filters).await?;
            Ok(
                Json(SearchResponse::new(markers, filters.limit, filters.offset))
                    .into_response(),
            )
        }
        Err(err) => {
            error!("Radius search error: {err}");
            Ok(server_error_envelope())
        }
    }
}

pub async fn search_listings_handler(
    State(database): State<Database>,
    Query(query): Query<TextSearchQuery>,
) -> Result<Response, AppError> {
    let (limit, offset) = query.page();

    let Some(q) = query.q.as_deref().map(str::trim).filter(|q| q.chars().count() >= 2) else {
        return Ok(
            Json(SearchResponse::<ListingSummaryOut>::empty(limit, offset)).into_response(),
        );
    };

    let rows = text_search(&database.pool, q, limit, offset).await?;

    let summaries: Vec<ListingSummaryOut> = rows
        .into_iter()
        .map(|listing| ListingSummaryOut {
            id: listing.id,
            title: clean_listing_title(Some(&listing.title), UNTITLED_PLACEHOLDER),
            description: listing.description,
            price: listing.price,
            price_label: format_price_mru(listing.price),
            op_type: listing.op_type,
            lat: listing.lat,
            lng: listing.lng,
            created_at: listing.created_at,
        })
        .collect();

    Ok(Json(SearchResponse::new(summaries, limit, offset)).into_response())
}

/// The procedure bounds rows to the search area and supplies coordinates;
/// a row that still lacks both a pair and a polygon is unmappable and
/// dropped.
fn markers_from_rows(rows: Vec<MarkerRow>) -> Vec<Marker> {
    rows.into_iter()
        .filter_map(|row| {
            let polygon = row.sub_polygon.map(|p| p.0);
            let Some(coordinates) =
                resolve_row_coordinates(row.lat, row.lng, polygon.as_deref())
            else {
                warn!("Dropping unmappable search row {}", row.id);
                return None;
            };

            Some(Marker::new(
                row.id,
                coordinates,
                false,
                row.price,
                row.op_type,
                polygon,
                row.polygon_color,
            ))
        })
        .collect()
}

fn server_error_envelope() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"data": [], "error": "Failed to search listings"})),
    )
        .into_response()
}
