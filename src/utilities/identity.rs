use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};
use uuid::Uuid;

use crate::utilities::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Rate-limit identifier for a request. Authenticated users are keyed by
/// their gateway-supplied id; everyone else by forwarded client ip.
pub fn client_identifier(headers: &HeaderMap) -> String {
    if let Some(user_id) = headers.get(USER_ID_HEADER).and_then(|v| v.to_str().ok()) {
        if !user_id.trim().is_empty() {
            return format!("user:{}", user_id.trim());
        }
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    format!("ip:{}", forwarded.or(real_ip).unwrap_or("unknown"))
}

/// Owner identity for write endpoints. The fronting gateway authenticates
/// the session and forwards the subject as `X-User-Id`; requests without it
/// are rejected with 401.
pub struct UserId(pub Uuid);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::UnauthorizedError)?;

        let user_id = Uuid::parse_str(raw).map_err(|_| AppError::UnauthorizedError)?;

        Ok(UserId(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn prefers_user_id_over_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("abc"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));

        assert_eq!(client_identifier(&headers), "user:abc");
    }

    #[test]
    fn takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 10.0.0.1"),
        );

        assert_eq!(client_identifier(&headers), "ip:1.2.3.4");
    }

    #[test]
    fn falls_back_to_real_ip_then_unknown() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("5.6.7.8"));
        assert_eq!(client_identifier(&headers), "ip:5.6.7.8");

        assert_eq!(client_identifier(&HeaderMap::new()), "ip:unknown");
    }
}
