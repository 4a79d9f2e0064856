use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    features::{
        listings::models::Listing,
        search::{
            markers::{Marker, MarkerRow, resolve_row_coordinates},
            schemas::{RadiusFilters, SearchFilters, Sort},
        },
    },
    services::geo::{Coordinates, NOUAKCHOTT_CENTER, haversine_km, valid_coordinates},
    utilities::errors::AppError,
};

// PostgreSQL error codes that mark the search procedure as unusable in this
// environment: an ambiguous overload, a missing procedure, or a procedure
// whose row type lost a column. Only these switch to the fallback path.
const AMBIGUOUS_FUNCTION: &str = "42725";
const UNDEFINED_FUNCTION: &str = "42883";
const UNDEFINED_COLUMN: &str = "42703";

/// Upper bound on rows the degraded path will pull before filtering in
/// application code.
const FALLBACK_SCAN_LIMIT: i64 = 1000;

pub fn is_degraded_procedure_error(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error()
            .and_then(|db_err| db_err.code())
            .as_deref(),
        Some(AMBIGUOUS_FUNCTION | UNDEFINED_FUNCTION | UNDEFINED_COLUMN)
    )
}

/// Primary path: one `search_listings` call with every filter pushed down.
/// Rows come back bounded, filtered and sorted; no post-processing beyond
/// marker derivation.
pub async fn search_markers_rpc(
    pool: &PgPool,
    filters: &SearchFilters,
) -> Result<Vec<MarkerRow>, sqlx::Error> {
    sqlx::query_as::<_, MarkerRow>(
        r#"
        SELECT id, price, op_type, lat, lng, sub_polygon, polygon_color
        FROM search_listings(
            min_lng => $1,
            min_lat => $2,
            max_lng => $3,
            max_lat => $4,
            min_price => $5,
            max_price => $6,
            min_rooms => $7,
            max_rooms => $8,
            min_surface => $9,
            max_surface => $10,
            op_filter => $11,
            text_query => $12,
            sort_key => $13,
            page_limit => $14,
            page_offset => $15
        )
        "#,
    )
    .bind(filters.bbox.min_lng)
    .bind(filters.bbox.min_lat)
    .bind(filters.bbox.max_lng)
    .bind(filters.bbox.max_lat)
    .bind(filters.attributes.min_price)
    .bind(filters.attributes.max_price)
    .bind(filters.attributes.min_rooms)
    .bind(filters.attributes.max_rooms)
    .bind(filters.attributes.min_surface)
    .bind(filters.attributes.max_surface)
    .bind(filters.attributes.op_type.map(|op| op.as_str()))
    .bind(filters.attributes.q.as_deref())
    .bind(filters.sort_by.as_str())
    .bind(filters.limit)
    .bind(filters.offset)
    .fetch_all(pool)
    .await
}

pub async fn search_radius_rpc(
    pool: &PgPool,
    filters: &RadiusFilters,
) -> Result<Vec<MarkerRow>, sqlx::Error> {
    sqlx::query_as::<_, MarkerRow>(
        r#"
        SELECT id, price, op_type, lat, lng, sub_polygon, polygon_color
        FROM search_listings_by_radius(
            center_lat => $1,
            center_lng => $2,
            radius_km => $3,
            min_price => $4,
            max_price => $5,
            min_rooms => $6,
            max_rooms => $7,
            min_surface => $8,
            max_surface => $9,
            op_filter => $10,
            text_query => $11,
            sort_key => $12,
            page_limit => $13,
            page_offset => $14
        )
        "#,
    )
    .bind(filters.center.lat)
    .bind(filters.center.lng)
    .bind(filters.radius_km)
    .bind(filters.attributes.min_price)
    .bind(filters.attributes.max_price)
    .bind(filters.attributes.min_rooms)
    .bind(filters.attributes.max_rooms)
    .bind(filters.attributes.min_surface)
    .bind(filters.attributes.max_surface)
    .bind(filters.attributes.op_type.map(|op| op.as_str()))
    .bind(filters.attributes.q.as_deref())
    .bind(filters.sort_by.as_str())
    .bind(filters.limit)
    .bind(filters.offset)
    .fetch_all(pool)
    .await
}

/// Degraded path for the bbox search: plain published rows, attribute and
/// text filters re-applied in application code, coordinates resolved per
/// row, bbox applied last since the plain query cannot push it down.
pub async fn fallback_bbox_search(
    pool: &PgPool,
    filters: &SearchFilters,
) -> Result<Vec<Marker>, AppError> {
    let mut rows = fetch_published(pool).await?;
    rows.retain(|listing| filters.attributes.matches(listing));
    sort_listings(&mut rows, filters.sort_by);

    let mut markers = Vec::new();
    for listing in rows {
        let (coordinates, approximate) = resolve_listing_coordinates(pool, &listing).await;
        if !filters.bbox.contains(coordinates) {
            continue;
        }
        markers.push(marker_from_listing(listing, coordinates, approximate));
    }

    Ok(paginate(markers, filters.limit, filters.offset))
}

/// Degraded path for the radius search; the distance filter runs on the
/// Haversine distance to the resolved coordinate.
pub async fn fallback_radius_search(
    pool: &PgPool,
    filters: &RadiusFilters,
) -> Result<Vec<Marker>, AppError> {
    let mut rows = fetch_published(pool).await?;
    rows.retain(|listing| filters.attributes.matches(listing));
    sort_listings(&mut rows, filters.sort_by);

    let mut markers = Vec::new();
    for listing in rows {
        let (coordinates, approximate) = resolve_listing_coordinates(pool, &listing).await;
        if haversine_km(filters.center, coordinates) > filters.radius_km {
            continue;
        }
        markers.push(marker_from_listing(listing, coordinates, approximate));
    }

    Ok(paginate(markers, filters.limit, filters.offset))
}

async fn fetch_published(pool: &PgPool) -> Result<Vec<Listing>, AppError> {
    let rows = sqlx::query_as::<_, Listing>(
        r#"
        SELECT id, owner_id, title, description, price, op_type, rooms, surface,
               status, lat, lng, sub_polygon, polygon_color, created_at, updated_at
        FROM listings
        WHERE status = 'published'
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(FALLBACK_SCAN_LIMIT)
    .fetch_all(pool)
    .await?;

    if rows.len() as i64 == FALLBACK_SCAN_LIMIT {
        warn!(
            "Fallback search hit its {FALLBACK_SCAN_LIMIT}-row scan cap; older listings are not considered"
        );
    }

    Ok(rows)
}

pub fn sort_listings(rows: &mut [Listing], sort: Sort) {
    match sort {
        Sort::PriceAsc => rows.sort_by(|a, b| a.price.total_cmp(&b.price)),
        Sort::PriceDesc => rows.sort_by(|a, b| b.price.total_cmp(&a.price)),
        Sort::DateAsc => rows.sort_by_key(|row| row.created_at),
        Sort::DateDesc => rows.sort_by_key(|row| std::cmp::Reverse(row.created_at)),
        // Listings without a surface sort after every valued one.
        Sort::SurfaceAsc => rows.sort_by(|a, b| match (a.surface, b.surface) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }),
        Sort::SurfaceDesc => rows.sort_by(|a, b| match (a.surface, b.surface) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }),
    }
}

/// Best-effort degradation chain: row lat/lng → polygon centroid →
/// `get_listing_coordinates` procedure → fixed Nouakchott center. The final
/// step marks the marker approximate rather than silently mislocating it.
async fn resolve_listing_coordinates(pool: &PgPool, listing: &Listing) -> (Coordinates, bool) {
    if let Some(coordinates) = resolve_row_coordinates(
        listing.lat,
        listing.lng,
        listing.sub_polygon.as_ref().map(|p| p.0.as_slice()),
    ) {
        return (coordinates, false);
    }

    if let Some(coordinates) = coordinates_rpc(pool, &listing.id).await {
        return (coordinates, false);
    }

    debug!(
        "No coordinates resolved for listing {}, defaulting to Nouakchott center",
        listing.id
    );
    (NOUAKCHOTT_CENTER, true)
}

async fn coordinates_rpc(pool: &PgPool, listing_id: &Uuid) -> Option<Coordinates> {
    let result = sqlx::query_as::<_, (Option<f64>, Option<f64>)>(
        "SELECT lat, lng FROM get_listing_coordinates($1)",
    )
    .bind(listing_id)
    .fetch_optional(pool)
    .await;

    match result {
        Ok(Some((Some(lat), Some(lng)))) if valid_coordinates(lat, lng) => {
            Some(Coordinates { lat, lng })
        }
        Ok(_) => None,
        Err(err) => {
            debug!("get_listing_coordinates failed for {listing_id}: {err}");
            None
        }
    }
}

fn marker_from_listing(listing: Listing, coordinates: Coordinates, approximate: bool) -> Marker {
    Marker::new(
        listing.id,
        coordinates,
        approximate,
        Some(listing.price),
        Some(listing.op_type),
        listing.sub_polygon.map(|polygon| polygon.0),
        listing.polygon_color,
    )
}

fn paginate(markers: Vec<Marker>, limit: i64, offset: i64) -> Vec<Marker> {
    markers
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

/// Title/description substring search over published listings. The pattern
/// is escaped so user text cannot smuggle wildcards into ILIKE.
pub async fn text_search(
    pool: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Listing>, AppError> {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = format!("%{escaped}%");

    let rows = sqlx::query_as::<_, Listing>(
        r#"
        SELECT id, owner_id, title, description, price, op_type, rooms, surface,
               status, lat, lng, sub_polygon, polygon_color, created_at, updated_at
        FROM listings
        WHERE status = 'published'
          AND (title ILIKE $1 OR description ILIKE $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        listings::models::{ListingStatus, OpType},
        search::schemas::AttributeFilter,
    };
    use chrono::{Duration, Utc};

    fn listing(price: f64, surface: Option<f64>, age_minutes: i64) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Maison a Sebkha".to_string(),
            description: Some("Grande maison avec jardin".to_string()),
            price,
            op_type: OpType::Rent,
            rooms: Some(3),
            surface,
            status: ListingStatus::Published,
            lat: Some(18.04),
            lng: Some(-15.985),
            sub_polygon: None,
            polygon_color: None,
            created_at: Utc::now() - Duration::minutes(age_minutes),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn price_asc_yields_non_decreasing_sequence() {
        let mut rows = vec![
            listing(90000.0, None, 0),
            listing(45000.0, None, 1),
            listing(70000.0, None, 2),
            listing(45000.0, None, 3),
        ];
        sort_listings(&mut rows, Sort::PriceAsc);

        let prices: Vec<f64> = rows.iter().map(|l| l.price).collect();
        assert!(prices.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn surface_sorts_put_unset_last() {
        let mut rows = vec![
            listing(1.0, Some(80.0), 0),
            listing(2.0, None, 1),
            listing(3.0, Some(200.0), 2),
        ];

        sort_listings(&mut rows, Sort::SurfaceDesc);
        assert_eq!(rows[0].surface, Some(200.0));
        assert_eq!(rows[2].surface, None);

        sort_listings(&mut rows, Sort::SurfaceAsc);
        assert_eq!(rows[0].surface, Some(80.0));
        assert_eq!(rows[2].surface, None);
    }

    #[test]
    fn attribute_filter_applies_ranges_and_text() {
        let filter = AttributeFilter {
            q: Some("jardin".to_string()),
            min_price: Some(50000.0),
            max_price: Some(100000.0),
            ..Default::default()
        };

        assert!(filter.matches(&listing(70000.0, None, 0)));
        assert!(!filter.matches(&listing(40000.0, None, 0)));

        let mut no_match = listing(70000.0, None, 0);
        no_match.title = "Terrain nu".to_string();
        no_match.description = None;
        assert!(!filter.matches(&no_match));
    }

    #[test]
    fn missing_values_fail_bounded_fields() {
        let filter = AttributeFilter {
            min_surface: Some(50.0),
            ..Default::default()
        };

        assert!(filter.matches(&listing(1.0, Some(80.0), 0)));
        assert!(!filter.matches(&listing(1.0, None, 0)));
    }

    #[test]
    fn pagination_windows_the_sorted_sequence() {
        let markers: Vec<Marker> = (0..5)
            .map(|i| {
                Marker::new(
                    Uuid::new_v4(),
                    Coordinates {
                        lat: 18.0,
                        lng: -15.9,
                    },
                    false,
                    Some(i as f64),
                    None,
                    None,
                    None,
                )
            })
            .collect();

        let page = paginate(markers, 2, 1);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].price, 1.0);
        assert_eq!(page[1].price, 2.0);
    }
}
