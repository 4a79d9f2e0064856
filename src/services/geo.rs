use crate::utilities::errors::AppError;

/// Default marker coordinate when nothing else resolves: Nouakchott's center.
pub const NOUAKCHOTT_CENTER: Coordinates = Coordinates {
    lat: 18.0735,
    lng: -15.9582,
};

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Rectangular lng/lat region scoping a map search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: Coordinates) -> bool {
        point.lng >= self.min_lng
            && point.lng <= self.max_lng
            && point.lat >= self.min_lat
            && point.lat <= self.max_lat
    }
}

pub fn valid_coordinates(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng)
}

/// EWKT point literal for the `location` column. Built from validated
/// numeric values only, never from raw request text.
pub fn postgis_point(lat: f64, lng: f64) -> Result<String, AppError> {
    if !valid_coordinates(lat, lng) {
        return Err(AppError::InvalidCoordinatesError);
    }

    Ok(format!("SRID=4326;POINT({} {})", lng, lat))
}

/// Great-circle distance between two coordinates in kilometers (Haversine).
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Arithmetic-mean centroid of a polygon ring of `[lng, lat]` vertices.
/// Vertices with non-finite or out-of-range components are skipped; fewer
/// than 3 usable vertices yields no centroid.
pub fn polygon_centroid(ring: &[[f64; 2]]) -> Option<Coordinates> {
    let valid: Vec<&[f64; 2]> = ring
        .iter()
        .filter(|p| valid_coordinates(p[1], p[0]))
        .collect();

    if valid.len() < 3 {
        return None;
    }

    let count = valid.len() as f64;
    let lng = valid.iter().map(|p| p[0]).sum::<f64>() / count;
    let lat = valid.iter().map(|p| p[1]).sum::<f64>() / count;

    Some(Coordinates { lat, lng })
}

/// Close an open polygon ring by duplicating its first vertex at the end.
/// Already-closed rings come back unchanged.
pub fn close_ring(mut ring: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last()) {
        if first != *last {
            ring.push(first);
        }
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgis_point_formats_lng_before_lat() {
        let point = postgis_point(18.0735, -15.9582).unwrap();
        assert_eq!(point, "SRID=4326;POINT(-15.9582 18.0735)");
    }

    #[test]
    fn postgis_point_rejects_out_of_range() {
        assert!(postgis_point(95.0, 0.0).is_err());
        assert!(postgis_point(0.0, 181.0).is_err());
        assert!(postgis_point(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn bbox_contains_and_excludes() {
        let bbox = BoundingBox {
            min_lng: -16.0,
            min_lat: 18.0,
            max_lng: -15.0,
            max_lat: 19.0,
        };

        assert!(bbox.contains(Coordinates {
            lat: 18.5,
            lng: -15.5
        }));
        assert!(!bbox.contains(Coordinates {
            lat: 18.5,
            lng: -14.0
        }));
    }

    #[test]
    fn centroid_is_arithmetic_mean() {
        let ring = vec![[-16.0, 18.0], [-15.0, 18.0], [-15.5, 19.5]];
        let centroid = polygon_centroid(&ring).unwrap();

        assert!((centroid.lng - (-15.5)).abs() < 1e-9);
        assert!((centroid.lat - 18.5).abs() < 1e-9);
    }

    #[test]
    fn centroid_skips_invalid_vertices() {
        let ring = vec![
            [-16.0, 18.0],
            [f64::NAN, 18.0],
            [-15.0, 95.0],
            [-15.0, 18.0],
            [-15.5, 19.5],
        ];
        let centroid = polygon_centroid(&ring).unwrap();

        assert!((centroid.lng - (-15.5)).abs() < 1e-9);
        assert!((centroid.lat - 18.5).abs() < 1e-9);
    }

    #[test]
    fn centroid_needs_three_usable_vertices() {
        assert!(polygon_centroid(&[[-16.0, 18.0], [-15.0, 18.5]]).is_none());
        assert!(polygon_centroid(&[[-16.0, 18.0], [-15.0, 95.0], [-15.5, 19.0]]).is_none());
        assert!(polygon_centroid(&[]).is_none());
    }

    #[test]
    fn haversine_nouakchott_to_nouadhibou() {
        let nouadhibou = Coordinates {
            lat: 20.9310,
            lng: -17.0347,
        };
        let distance = haversine_km(NOUAKCHOTT_CENTER, nouadhibou);

        assert!((330.0..345.0).contains(&distance), "got {distance}");
    }

    #[test]
    fn close_ring_duplicates_first_vertex_once() {
        let open = vec![[-16.0, 18.0], [-15.0, 18.0], [-15.5, 19.0]];
        let closed = close_ring(open.clone());
        assert_eq!(closed.len(), 4);
        assert_eq!(closed[0], closed[3]);

        assert_eq!(close_ring(closed.clone()), closed);
    }
}
