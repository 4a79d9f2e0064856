use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type, types::Json};
use uuid::Uuid;

#[derive(Type, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "op_type", rename_all = "lowercase")]
pub enum OpType {
    #[default]
    Rent,
    Sell,
}

impl OpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Sell => "sell",
        }
    }
}

impl std::str::FromStr for OpType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rent" => Ok(Self::Rent),
            "sell" => Ok(Self::Sell),
            _ => Err(()),
        }
    }
}

#[derive(Type, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "listing_status", rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(()),
        }
    }
}

/// A listing row. `sub_polygon` is an ordered ring of `[lng, lat]` pairs as
/// written by the import pipeline; the PostGIS `location` column stays in
/// the database and is only read back through its lat/lng projections.
#[derive(FromRow, Serialize, Deserialize, Clone, Debug)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub op_type: OpType,
    pub rooms: Option<i32>,
    pub surface: Option<f64>,
    pub status: ListingStatus,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub sub_polygon: Option<Json<Vec<[f64; 2]>>>,
    pub polygon_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
