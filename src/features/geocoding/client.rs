use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::utilities::errors::AppError;

pub const NOMINATIM_USER_AGENT: &str = "seloger-mauritania/1.0";

#[derive(Deserialize, Serialize, Clone, Default, Debug)]
pub struct ReverseGeocodeAddress {
    pub road: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ReverseGeocodeResult {
    pub display_name: String,
    #[serde(default)]
    pub address: ReverseGeocodeAddress,
}

#[derive(Deserialize, Debug)]
struct NominatimReverseResponse {
    display_name: Option<String>,
    #[serde(default)]
    address: ReverseGeocodeAddress,
}

/// Reverse geocoding through Nominatim. Failures degrade to `None` and are
/// logged; the caller decides how to present an unresolved address.
pub async fn reverse_geocode(
    client: &Client,
    endpoint: &str,
    lat: f64,
    lng: f64,
) -> Result<Option<ReverseGeocodeResult>, AppError> {
    let lat_param = lat.to_string();
    let lng_param = lng.to_string();
    let url = Url::parse_with_params(
        &format!("{}/reverse", endpoint.trim_end_matches('/')),
        [
            ("format", "json"),
            ("lat", lat_param.as_str()),
            ("lon", lng_param.as_str()),
            ("zoom", "18"),
            ("addressdetails", "1"),
        ],
    )?;

    let response = match client
        .get(url)
        .header(reqwest::header::USER_AGENT, NOMINATIM_USER_AGENT)
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            warn!("Reverse geocoding request failed: {err}");
            return Ok(None);
        }
    };

    if !response.status().is_success() {
        warn!("Reverse geocoding returned {}", response.status());
        return Ok(None);
    }

    let body: NominatimReverseResponse = match response.json().await {
        Ok(body) => body,
        Err(err) => {
            warn!("Reverse geocoding returned an unreadable body: {err}");
            return Ok(None);
        }
    };

    Ok(Some(ReverseGeocodeResult {
        display_name: body
            .display_name
            .unwrap_or_else(|| format!("{}, {}", lat, lng)),
        address: body.address,
    }))
}
