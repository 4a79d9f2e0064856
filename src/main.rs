use axum::http::{HeaderName, HeaderValue, Method, header};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use seloger::{
    build_router,
    features::geocoding::client::NOMINATIM_USER_AGENT,
    services::{database::Database, redis::Redis},
    utilities::{app_state::AppState, config::Config, rate_limit::RateLimiter},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::init().await?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.tracing_level.to_string())),
        )
        .init();

    let database = Database::connect(&config).await?;

    let rate_limiter = match &config.redis_url {
        Some(redis_url) => RateLimiter::redis(Redis::connect(redis_url).await?),
        None => RateLimiter::in_memory(),
    };
    rate_limiter.spawn_purge_task();

    let http_client = reqwest::Client::builder()
        .user_agent(NOMINATIM_USER_AGENT)
        .build()?;

    let cors = CorsLayer::new()
        .allow_origin(config.frontend_endpoint.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-user-id"),
        ]);

    let server_address = config.server_address.clone();

    let state = AppState {
        database,
        config,
        rate_limiter,
        http_client,
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    info!("Listening on {server_address}");

    axum::serve(listener, app).await?;

    Ok(())
}
