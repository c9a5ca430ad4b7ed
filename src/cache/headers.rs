//! HTTP cache headers for successful read responses.

use axum::{
    http::{
        header::{CACHE_CONTROL, EXPIRES},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Formats an RFC 1123 date as used by the `Expires` header.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Returns the `Expires` value for a response built at `now` that stays
/// fresh for `ttl_secs`.
pub fn expires_at(now: DateTime<Utc>, ttl_secs: u64) -> String {
    let ttl = Duration::seconds(ttl_secs.min(i32::MAX as u64) as i64);
    http_date(now.checked_add_signed(ttl).unwrap_or(now))
}

/// Adds `Cache-Control` and `Expires` to a 200 response. Any other status is
/// left untouched.
pub fn apply_cache_headers(response: &mut Response, ttl_secs: u64) {
    if response.status() != StatusCode::OK {
        return;
    }

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={ttl_secs}")) {
        headers.insert(CACHE_CONTROL, value);
    }
    if let Ok(value) = HeaderValue::from_str(&expires_at(Utc::now(), ttl_secs)) {
        headers.insert(EXPIRES, value);
    }
}

/// JSON body served with cache headers for `ttl` seconds.
#[derive(Debug, Clone)]
pub struct CachedJson {
    pub body: Value,
    pub ttl: u64,
}

impl CachedJson {
    pub fn new(body: Value, ttl: u64) -> Self {
        Self { body, ttl }
    }
}

impl IntoResponse for CachedJson {
    fn into_response(self) -> Response {
        let mut response = Json(self.body).into_response();
        apply_cache_headers(&mut response, self.ttl);
        response
    }
}
