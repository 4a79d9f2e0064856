pub mod features;
pub mod services;
pub mod utilities;

use axum::{
    Json, Router, middleware,
    routing::{delete, get, patch},
};

use crate::{
    features::{
        alerts::handlers::{
            create_alert_handler, delete_alert_handler, get_alerts_handler, update_alert_handler,
        },
        favorites::handlers::{
            add_favorite_handler, get_favorites_handler, remove_favorite_handler,
        },
        geocoding::handlers::{neighborhoods_handler, reverse_geocode_handler},
        listings::handlers::{
            create_listing_handler, delete_listing_handler, get_listing_handler,
            get_own_listings_handler, update_listing_handler,
        },
        search::handlers::{
            search_listings_handler, search_markers_handler, search_radius_handler,
        },
    },
    utilities::{app_state::AppState, rate_limit},
};

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/search/markers", get(search_markers_handler))
        .route("/api/search/radius", get(search_radius_handler))
        .route("/api/search/listings", get(search_listings_handler))
        .route(
            "/api/listings",
            get(get_own_listings_handler).post(create_listing_handler),
        )
        .route(
            "/api/listings/{id}",
            get(get_listing_handler)
                .patch(update_listing_handler)
                .delete(delete_listing_handler),
        )
        .route(
            "/api/favorites",
            get(get_favorites_handler).post(add_favorite_handler),
        )
        .route("/api/favorites/{listing_id}", delete(remove_favorite_handler))
        .route(
            "/api/alerts",
            get(get_alerts_handler).post(create_alert_handler),
        )
        .route(
            "/api/alerts/{id}",
            patch(update_alert_handler).delete(delete_alert_handler),
        )
        .route("/api/geocoding/neighborhoods", get(neighborhoods_handler))
        .route("/api/geocoding/reverse", get(reverse_geocode_handler))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit::enforce,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(api_routes)
        .with_state(state)
}
