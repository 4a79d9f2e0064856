use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    features::alerts::{
        repository::{create_alert, delete_alert, get_alerts, update_alert},
        schemas::{CreateAlert, UpdateAlert},
    },
    services::database::Database,
    utilities::{errors::AppError, identity::UserId},
};

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
pub struct AlertListQuery {
    pub active: Option<String>,
}

pub async fn get_alerts_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Query(query): Query<AlertListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let active_only = query.active.as_deref() == Some("true");
    let alerts = get_alerts(&database.pool, user_id, active_only).await?;

    Ok(Json(serde_json::json!({"data": alerts})))
}

pub async fn create_alert_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Json(input): Json<CreateAlert>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;

    let alert = create_alert(&database.pool, user_id, &input).await?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"data": alert}))))
}

pub async fn update_alert_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Path(alert_id): Path<Uuid>,
    Json(update): Json<UpdateAlert>,
) -> Result<impl IntoResponse, AppError> {
    update.validate()?;

    let alert = update_alert(&database.pool, alert_id, user_id, &update).await?;

    Ok(Json(serde_json::json!({"data": alert})))
}

pub async fn delete_alert_handler(
    UserId(user_id): UserId,
    State(database): State<Database>,
    Path(alert_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    delete_alert(&database.pool, alert_id, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
