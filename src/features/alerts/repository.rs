use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::{
    features::alerts::{
        models::SearchAlert,
        schemas::{CreateAlert, UpdateAlert},
    },
    utilities::errors::AppError,
};

const ALERT_COLUMNS: &str = "id, user_id, name, min_price, max_price, min_rooms, max_rooms, \
     min_surface, max_surface, op_type, neighborhood, center_lat, center_lng, radius_km, \
     email_notifications, active, created_at, updated_at";

pub async fn create_alert(
    pool: &PgPool,
    user_id: Uuid,
    input: &CreateAlert,
) -> Result<SearchAlert, AppError> {
    let query = format!(
        r#"
        INSERT INTO search_alerts
            (id, user_id, name, min_price, max_price, min_rooms, max_rooms, min_surface,
             max_surface, op_type, neighborhood, center_lat, center_lng, radius_km,
             email_notifications, active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING {ALERT_COLUMNS}
        "#
    );

    let alert = sqlx::query_as::<_, SearchAlert>(&query)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&input.name)
        .bind(input.min_price)
        .bind(input.max_price)
        .bind(input.min_rooms)
        .bind(input.max_rooms)
        .bind(input.min_surface)
        .bind(input.max_surface)
        .bind(input.op_type)
        .bind(&input.neighborhood)
        .bind(input.center_lat)
        .bind(input.center_lng)
        .bind(input.radius_km)
        .bind(input.email_notifications)
        .bind(input.active)
        .fetch_one(pool)
        .await?;

    Ok(alert)
}

pub async fn get_alerts(
    pool: &PgPool,
    user_id: Uuid,
    active_only: bool,
) -> Result<Vec<SearchAlert>, AppError> {
    let mut qb = QueryBuilder::new(format!("SELECT {ALERT_COLUMNS} FROM search_alerts"));
    qb.push(" WHERE user_id = ").push_bind(user_id);
    if active_only {
        qb.push(" AND active = true");
    }
    qb.push(" ORDER BY created_at DESC");

    let alerts = qb.build_query_as::<SearchAlert>().fetch_all(pool).await?;

    Ok(alerts)
}

pub async fn update_alert(
    pool: &PgPool,
    alert_id: Uuid,
    user_id: Uuid,
    update: &UpdateAlert,
) -> Result<SearchAlert, AppError> {
    let mut qb = QueryBuilder::new("UPDATE search_alerts SET updated_at = now()");

    if let Some(name) = &update.name {
        qb.push(", name = ").push_bind(name);
    }
    if let Some(email_notifications) = update.email_notifications {
        qb.push(", email_notifications = ").push_bind(email_notifications);
    }
    if let Some(active) = update.active {
        qb.push(", active = ").push_bind(active);
    }

    qb.push(" WHERE id = ").push_bind(alert_id);
    qb.push(" AND user_id = ").push_bind(user_id);
    qb.push(" RETURNING ").push(ALERT_COLUMNS);

    qb.build_query_as::<SearchAlert>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Alert not found".to_string()))
}

pub async fn delete_alert(pool: &PgPool, alert_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    let query_result = sqlx::query("DELETE FROM search_alerts WHERE id = $1 AND user_id = $2")
        .bind(alert_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    match query_result.rows_affected() {
        0 => Err(AppError::DatabaseDeleteError {
            resource: "Alert".to_string(),
            id: alert_id.to_string(),
        }),
        _ => Ok(()),
    }
}
