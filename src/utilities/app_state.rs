use axum::extract::FromRef;
use reqwest::Client;

use crate::{
    services::database::Database,
    utilities::{config::Config, rate_limit::RateLimiter},
};

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Config,
    pub rate_limiter: RateLimiter,
    pub http_client: Client,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.database.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for RateLimiter {
    fn from_ref(state: &AppState) -> Self {
        state.rate_limiter.clone()
    }
}

impl FromRef<AppState> for Client {
    fn from_ref(state: &AppState) -> Self {
        state.http_client.clone()
    }
}
