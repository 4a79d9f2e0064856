use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    features::listings::models::{Listing, OpType},
    services::geo::{BoundingBox, Coordinates},
    utilities::errors::FieldError,
};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_RADIUS_KM: f64 = 5.0;
pub const MAX_RADIUS_KM: f64 = 50.0;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    PriceAsc,
    PriceDesc,
    DateAsc,
    #[default]
    DateDesc,
    SurfaceAsc,
    SurfaceDesc,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::DateAsc => "date_asc",
            Self::DateDesc => "date_desc",
            Self::SurfaceAsc => "surface_asc",
            Self::SurfaceDesc => "surface_desc",
        }
    }
}

impl std::str::FromStr for Sort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "date_asc" => Ok(Self::DateAsc),
            "date_desc" => Ok(Self::DateDesc),
            "surface_asc" => Ok(Self::SurfaceAsc),
            "surface_desc" => Ok(Self::SurfaceDesc),
            _ => Err(()),
        }
    }
}

/// Raw query-string shape for `/api/search/markers`. Everything arrives as
/// text; `SearchFilters::parse` coerces and bounds it.
#[derive(Deserialize, Default, Debug)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkerQuery {
    pub bbox: Option<String>,
    pub q: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rooms: Option<String>,
    pub max_rooms: Option<String>,
    pub min_surface: Option<String>,
    pub max_surface: Option<String>,
    pub op_type: Option<String>,
    pub sort_by: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Raw query-string shape for `/api/search/radius`.
#[derive(Deserialize, Default, Debug)]
#[serde(default, rename_all = "camelCase")]
pub struct RadiusQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
    pub q: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rooms: Option<String>,
    pub max_rooms: Option<String>,
    pub min_surface: Option<String>,
    pub max_surface: Option<String>,
    pub op_type: Option<String>,
    pub sort_by: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Attribute filters shared by the bbox and radius searches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeFilter {
    pub q: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
    pub min_surface: Option<f64>,
    pub max_surface: Option<f64>,
    pub op_type: Option<OpType>,
}

impl AttributeFilter {
    /// Application-side predicate for the fallback path. A listing with no
    /// value for a bounded field fails that bound.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(q) = &self.q {
            let needle = q.to_lowercase();
            let in_title = listing.title.to_lowercase().contains(&needle);
            let in_description = listing
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }

        if let Some(min) = self.min_price
            && listing.price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && listing.price > max
        {
            return false;
        }

        if let Some(min) = self.min_rooms
            && !listing.rooms.is_some_and(|rooms| f64::from(rooms) >= min)
        {
            return false;
        }
        if let Some(max) = self.max_rooms
            && !listing.rooms.is_some_and(|rooms| f64::from(rooms) <= max)
        {
            return false;
        }

        if let Some(min) = self.min_surface
            && !listing.surface.is_some_and(|surface| surface >= min)
        {
            return false;
        }
        if let Some(max) = self.max_surface
            && !listing.surface.is_some_and(|surface| surface <= max)
        {
            return false;
        }

        if let Some(op_type) = self.op_type
            && listing.op_type != op_type
        {
            return false;
        }

        true
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchFilters {
    pub bbox: BoundingBox,
    pub attributes: AttributeFilter,
    pub sort_by: Sort,
    pub limit: i64,
    pub offset: i64,
}

impl SearchFilters {
    /// Coerce and bound the raw query. Collects every offending field so a
    /// rejected filter reports all of its problems at once and is never
    /// partially applied.
    pub fn parse(raw: &MarkerQuery) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let bbox = parse_bbox(raw.bbox.as_deref(), &mut errors);
        let attributes = parse_attributes(
            raw.q.as_deref(),
            [
                ("minPrice", raw.min_price.as_deref()),
                ("maxPrice", raw.max_price.as_deref()),
                ("minRooms", raw.min_rooms.as_deref()),
                ("maxRooms", raw.max_rooms.as_deref()),
                ("minSurface", raw.min_surface.as_deref()),
                ("maxSurface", raw.max_surface.as_deref()),
            ],
            raw.op_type.as_deref(),
            &mut errors,
        );
        let sort_by = parse_sort(raw.sort_by.as_deref(), &mut errors);
        let (limit, offset) = parse_page(raw.limit.as_deref(), raw.offset.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            bbox: bbox.expect("bbox parse errors already reported"),
            attributes,
            sort_by,
            limit,
            offset,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadiusFilters {
    pub center: Coordinates,
    pub radius_km: f64,
    pub attributes: AttributeFilter,
    pub sort_by: Sort,
    pub limit: i64,
    pub offset: i64,
}

impl RadiusFilters {
    pub fn parse(raw: &RadiusQuery) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let lat = parse_required_number("lat", raw.lat.as_deref(), &mut errors);
        if let Some(lat) = lat
            && !(-90.0..=90.0).contains(&lat)
        {
            errors.push(FieldError::new("lat", "latitude must be in [-90, 90]"));
        }

        let lng = parse_required_number("lng", raw.lng.as_deref(), &mut errors);
        if let Some(lng) = lng
            && !(-180.0..=180.0).contains(&lng)
        {
            errors.push(FieldError::new("lng", "longitude must be in [-180, 180]"));
        }

        let radius_km = match raw.radius.as_deref() {
            None => Some(DEFAULT_RADIUS_KM),
            Some(value) => {
                let radius = parse_required_number("radius", Some(value), &mut errors);
                if let Some(radius) = radius {
                    if radius <= 0.0 {
                        errors.push(FieldError::new("radius", "radius must be positive"));
                        None
                    } else if radius > MAX_RADIUS_KM {
                        errors.push(FieldError::new("radius", "radius cannot exceed 50 km"));
                        None
                    } else {
                        Some(radius)
                    }
                } else {
                    None
                }
            }
        };

        let attributes = parse_attributes(
            raw.q.as_deref(),
            [
                ("minPrice", raw.min_price.as_deref()),
                ("maxPrice", raw.max_price.as_deref()),
                ("minRooms", raw.min_rooms.as_deref()),
                ("maxRooms", raw.max_rooms.as_deref()),
                ("minSurface", raw.min_surface.as_deref()),
                ("maxSurface", raw.max_surface.as_deref()),
            ],
            raw.op_type.as_deref(),
            &mut errors,
        );
        let sort_by = parse_sort(raw.sort_by.as_deref(), &mut errors);
        let (limit, offset) = parse_page(raw.limit.as_deref(), raw.offset.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            center: Coordinates {
                lat: lat.expect("lat parse errors already reported"),
                lng: lng.expect("lng parse errors already reported"),
            },
            radius_km: radius_km.expect("radius parse errors already reported"),
            attributes,
            sort_by,
            limit,
            offset,
        })
    }
}

fn parse_bbox(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<BoundingBox> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        errors.push(FieldError::new(
            "bbox",
            "bbox is required as minLng,minLat,maxLng,maxLat",
        ));
        return None;
    };

    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        errors.push(FieldError::new(
            "bbox",
            "bbox must have exactly four comma-separated numbers",
        ));
        return None;
    }

    let mut values = [0.0f64; 4];
    for (i, part) in parts.iter().enumerate() {
        match part.parse::<f64>() {
            Ok(value) if value.is_finite() => values[i] = value,
            _ => {
                errors.push(FieldError::new(
                    "bbox",
                    format!("bbox component {} is not a number", i + 1),
                ));
                return None;
            }
        }
    }

    let [min_lng, min_lat, max_lng, max_lat] = values;

    let mut ok = true;
    if !(-180.0..=180.0).contains(&min_lng) || !(-180.0..=180.0).contains(&max_lng) {
        errors.push(FieldError::new(
            "bbox",
            "bbox longitudes must be in [-180, 180]",
        ));
        ok = false;
    }
    if !(-90.0..=90.0).contains(&min_lat) || !(-90.0..=90.0).contains(&max_lat) {
        errors.push(FieldError::new(
            "bbox",
            "bbox latitudes must be in [-90, 90]",
        ));
        ok = false;
    }

    ok.then_some(BoundingBox {
        min_lng,
        min_lat,
        max_lng,
        max_lat,
    })
}

fn parse_attributes(
    q: Option<&str>,
    ranges: [(&'static str, Option<&str>); 6],
    op_type: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> AttributeFilter {
    let [min_price, max_price, min_rooms, max_rooms, min_surface, max_surface] =
        ranges.map(|(field, value)| parse_optional_number(field, value, errors));

    let op_type = match op_type.map(str::trim).filter(|v| !v.is_empty()) {
        None => None,
        Some(value) => match value.parse::<OpType>() {
            Ok(op_type) => Some(op_type),
            Err(()) => {
                errors.push(FieldError::new("opType", "opType must be rent or sell"));
                None
            }
        },
    };

    AttributeFilter {
        q: q.map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        min_price,
        max_price,
        min_rooms,
        max_rooms,
        min_surface,
        max_surface,
        op_type,
    }
}

fn parse_sort(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Sort {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Sort::default(),
        Some(value) => match value.parse::<Sort>() {
            Ok(sort) => sort,
            Err(()) => {
                errors.push(FieldError::new(
                    "sortBy",
                    "sortBy must be one of price_asc, price_desc, date_asc, date_desc, surface_asc, surface_desc",
                ));
                Sort::default()
            }
        },
    }
}

fn parse_page(
    limit: Option<&str>,
    offset: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> (i64, i64) {
    let limit = match limit.map(str::trim).filter(|v| !v.is_empty()) {
        None => DEFAULT_LIMIT,
        Some(value) => match value.parse::<i64>() {
            Ok(limit) if (1..=MAX_LIMIT).contains(&limit) => limit,
            Ok(_) => {
                errors.push(FieldError::new("limit", "limit must be in [1, 100]"));
                DEFAULT_LIMIT
            }
            Err(_) => {
                errors.push(FieldError::new("limit", "limit must be an integer"));
                DEFAULT_LIMIT
            }
        },
    };

    let offset = match offset.map(str::trim).filter(|v| !v.is_empty()) {
        None => 0,
        Some(value) => match value.parse::<i64>() {
            Ok(offset) if offset >= 0 => offset,
            Ok(_) => {
                errors.push(FieldError::new("offset", "offset must be non-negative"));
                0
            }
            Err(_) => {
                errors.push(FieldError::new("offset", "offset must be an integer"));
                0
            }
        },
    };

    (limit, offset)
}

fn parse_optional_number(
    field: &'static str,
    value: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Some(number),
        _ => {
            errors.push(FieldError::new(field, format!("{field} is not a number")));
            None
        }
    }
}

fn parse_required_number(
    field: &'static str,
    value: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => {
            errors.push(FieldError::new(field, format!("{field} is required")));
            None
        }
        Some(value) => match value.parse::<f64>() {
            Ok(number) if number.is_finite() => Some(number),
            _ => {
                errors.push(FieldError::new(field, format!("{field} is not a number")));
                None
            }
        },
    }
}

/// Query-string shape for `/api/search/listings`. The optional numeric
/// params ride through `DisplayFromStr`; out-of-band values are clamped
/// like the other list endpoints.
#[serde_as]
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
pub struct TextSearchQuery {
    pub q: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub limit: Option<i64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub offset: Option<i64>,
}

impl TextSearchQuery {
    pub fn page(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(10).clamp(1, 50);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[derive(Serialize, Debug)]
pub struct PageMeta {
    pub limit: i64,
    pub offset: i64,
    pub count: usize,
}

#[derive(Serialize, Debug)]
pub struct SearchResponse<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

impl<T> SearchResponse<T> {
    pub fn new(data: Vec<T>, limit: i64, offset: i64) -> Self {
        let count = data.len();
        Self {
            data,
            pagination: PageMeta {
                limit,
                offset,
                count,
            },
        }
    }

    pub fn empty(limit: i64, offset: i64) -> Self {
        Self::new(Vec::new(), limit, offset)
    }
}
