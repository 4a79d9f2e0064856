use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::listings::models::OpType;

/// A saved search. The notifier matches new published listings against
/// these rows and mails the owner when `email_notifications` is on.
#[derive(FromRow, Serialize, Clone, Debug)]
pub struct SearchAlert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rooms: Option<i32>,
    pub max_rooms: Option<i32>,
    pub min_surface: Option<f64>,
    pub max_surface: Option<f64>,
    pub op_type: Option<OpType>,
    pub neighborhood: Option<String>,
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub radius_km: f64,
    pub email_notifications: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
