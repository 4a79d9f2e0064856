use serde::Serialize;
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

use crate::{
    features::listings::models::OpType,
    services::geo::{Coordinates, close_ring, polygon_centroid, valid_coordinates},
};

pub const RENT_MARKER_COLOR: &str = "#2563eb";
pub const SELL_MARKER_COLOR: &str = "#16a34a";
pub const NEUTRAL_MARKER_COLOR: &str = "#6b7280";

pub fn marker_color(op_type: Option<OpType>) -> &'static str {
    match op_type {
        Some(OpType::Rent) => RENT_MARKER_COLOR,
        Some(OpType::Sell) => SELL_MARKER_COLOR,
        None => NEUTRAL_MARKER_COLOR,
    }
}

/// Row shape returned by the geospatial search procedures.
#[derive(FromRow, Debug)]
pub struct MarkerRow {
    pub id: Uuid,
    pub price: Option<f64>,
    pub op_type: Option<OpType>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub sub_polygon: Option<Json<Vec<[f64; 2]>>>,
    pub polygon_color: Option<String>,
}

/// Map marker view model. Derived per search, never persisted.
/// `approximate` is true when the coordinate fell through every resolution
/// step to the fixed Nouakchott default.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub price: f64,
    pub op_type: Option<OpType>,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<[f64; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon_color: Option<String>,
    pub approximate: bool,
}

impl Marker {
    pub fn new(
        id: Uuid,
        coordinates: Coordinates,
        approximate: bool,
        price: Option<f64>,
        op_type: Option<OpType>,
        polygon: Option<Vec<[f64; 2]>>,
        polygon_color: Option<String>,
    ) -> Self {
        Self {
            id,
            lat: coordinates.lat,
            lng: coordinates.lng,
            price: price.unwrap_or(0.0),
            op_type,
            color: marker_color(op_type),
            polygon: polygon.map(close_ring),
            polygon_color,
            approximate,
        }
    }
}

/// Coordinate resolution from row data alone: an explicit lat/lng pair wins,
/// then the polygon centroid. Database-side resolution (the
/// `get_listing_coordinates` procedure) and the fixed default are the
/// repository's concern.
pub fn resolve_row_coordinates(
    lat: Option<f64>,
    lng: Option<f64>,
    polygon: Option<&[[f64; 2]]>,
) -> Option<Coordinates> {
    if let (Some(lat), Some(lng)) = (lat, lng)
        && valid_coordinates(lat, lng)
    {
        return Some(Coordinates { lat, lng });
    }

    polygon.and_then(polygon_centroid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_follow_operation_type() {
        assert_eq!(marker_color(Some(OpType::Rent)), RENT_MARKER_COLOR);
        assert_eq!(marker_color(Some(OpType::Sell)), SELL_MARKER_COLOR);
        assert_eq!(marker_color(None), NEUTRAL_MARKER_COLOR);
    }

    #[test]
    fn marker_closes_open_polygon_rings() {
        let marker = Marker::new(
            Uuid::new_v4(),
            Coordinates {
                lat: 18.08,
                lng: -15.97,
            },
            false,
            Some(85000.0),
            Some(OpType::Rent),
            Some(vec![[-15.98, 18.07], [-15.96, 18.07], [-15.97, 18.09]]),
            None,
        );

        let polygon = marker.polygon.unwrap();
        assert_eq!(polygon.len(), 4);
        assert_eq!(polygon[0], polygon[3]);
    }

    #[test]
    fn explicit_coordinates_win_over_centroid() {
        let polygon = vec![[-10.0, 10.0], [-10.0, 11.0], [-11.0, 10.5]];
        let coords =
            resolve_row_coordinates(Some(18.08), Some(-15.97), Some(polygon.as_slice())).unwrap();

        assert_eq!(
            coords,
            Coordinates {
                lat: 18.08,
                lng: -15.97
            }
        );
    }

    #[test]
    fn invalid_pair_falls_back_to_centroid() {
        let polygon = vec![[-15.98, 18.07], [-15.96, 18.07], [-15.97, 18.09]];
        let coords =
            resolve_row_coordinates(Some(95.0), Some(-15.97), Some(polygon.as_slice())).unwrap();

        assert!((coords.lng - (-15.97)).abs() < 1e-9);
        assert!((coords.lat - 18.076666666666668).abs() < 1e-9);
    }

    #[test]
    fn nothing_resolves_without_pair_or_polygon() {
        assert!(resolve_row_coordinates(None, Some(-15.97), None).is_none());
        assert!(resolve_row_coordinates(None, None, Some([[-15.98, 18.07]].as_slice())).is_none());
    }
}
