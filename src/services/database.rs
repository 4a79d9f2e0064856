use std::{str::FromStr, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::utilities::{config::Config, errors::AppError};

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let options = PgConnectOptions::from_str(&config.database_url)
            .map_err(|_| AppError::DatabaseParsingError)?
            .ssl_mode(config.pg_ssl_mode);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|_| AppError::DatabaseConnectionError)?;

        Ok(Self { pool })
    }
}
