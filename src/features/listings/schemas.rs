use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::listings::models::{Listing, ListingStatus, OpType};

// -- =====================
// -- IN
// -- =====================

#[derive(Deserialize, Serialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateListing {
    #[validate(length(min = 5, max = 100))]
    pub title: String,
    #[serde(default)]
    pub op_type: OpType,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub rooms: Option<i32>,
    #[validate(range(exclusive_min = 0.0))]
    pub surface: Option<f64>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

#[derive(Deserialize, Serialize, Validate, Default, Debug)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_latlng_pair))]
pub struct UpdateListing {
    #[validate(length(min = 5, max = 100))]
    pub title: Option<String>,
    pub op_type: Option<OpType>,
    #[validate(range(exclusive_min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub rooms: Option<i32>,
    #[validate(range(exclusive_min = 0.0))]
    pub surface: Option<f64>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub status: Option<ListingStatus>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
}

impl UpdateListing {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.op_type.is_none()
            && self.price.is_none()
            && self.rooms.is_none()
            && self.surface.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.lat.is_none()
            && self.lng.is_none()
    }
}

fn validate_latlng_pair(update: &UpdateListing) -> Result<(), ValidationError> {
    if update.lat.is_some() != update.lng.is_some() {
        return Err(ValidationError::new("latlng_pair")
            .with_message("Both lat and lng must be provided together".into()));
    }
    Ok(())
}

// -- =====================
// -- OUT
// -- =====================

#[derive(Serialize, Debug)]
pub struct ListingOut {
    #[serde(flatten)]
    pub listing: Listing,
    pub photos: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct ListingSummaryOut {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub price_label: String,
    pub op_type: OpType,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateListing {
        CreateListing {
            title: "Villa a Tevragh Zeina".to_string(),
            op_type: OpType::Rent,
            price: 85000.0,
            rooms: Some(4),
            surface: Some(220.0),
            description: None,
            lat: 18.086,
            lng: -15.975,
        }
    }

    #[test]
    fn accepts_a_valid_listing() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn rejects_short_title_and_free_price() {
        let mut input = valid_create();
        input.title = "Dar".to_string();
        input.price = 0.0;

        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let mut input = valid_create();
        input.lat = 95.0;
        assert!(input.validate().is_err());

        let mut input = valid_create();
        input.lng = -181.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_zero_surface() {
        let mut input = valid_create();
        input.surface = Some(0.0);
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_requires_lat_and_lng_together() {
        let update = UpdateListing {
            lat: Some(18.07),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateListing {
            lat: Some(18.07),
            lng: Some(-15.95),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }
}
