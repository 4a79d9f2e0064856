use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::features::listings::models::OpType;

fn default_radius_km() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Serialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_center_pair))]
pub struct CreateAlert {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[validate(range(min = 0))]
    pub min_rooms: Option<i32>,
    #[validate(range(min = 0))]
    pub max_rooms: Option<i32>,
    #[validate(range(exclusive_min = 0.0))]
    pub min_surface: Option<f64>,
    #[validate(range(exclusive_min = 0.0))]
    pub max_surface: Option<f64>,
    pub op_type: Option<OpType>,
    pub neighborhood: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub center_lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub center_lng: Option<f64>,
    #[serde(default = "default_radius_km")]
    #[validate(range(exclusive_min = 0.0, max = 50.0))]
    pub radius_km: f64,
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn validate_center_pair(alert: &CreateAlert) -> Result<(), ValidationError> {
    if alert.center_lat.is_some() != alert.center_lng.is_some() {
        return Err(ValidationError::new("center_pair")
            .with_message("Both centerLat and centerLng must be provided together".into()));
    }
    Ok(())
}

#[derive(Deserialize, Serialize, Validate, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlert {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub email_notifications: Option<bool>,
    pub active: Option<bool>,
}
