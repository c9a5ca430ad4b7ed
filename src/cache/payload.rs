//! Cacheable payloads.
//!
//! Only non-empty structured results are worth keeping: an empty page or a
//! failed lookup must be recomputed next time rather than pinned for a TTL.

use serde::Serialize;
use serde_json::Value;

/// A value the response cache may store.
pub trait Cacheable: Clone + Send + Sync + 'static {
    /// Whether this value should be stored after a miss.
    fn is_cacheable(&self) -> bool;
}

impl Cacheable for Value {
    /// Non-empty JSON objects and arrays. Scalars, `null` and empty
    /// containers are never stored.
    fn is_cacheable(&self) -> bool {
        match self {
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => false,
        }
    }
}

/// Response-shaped payload: an HTTP status plus a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedResponse {
    pub status: u16,
    pub body: Value,
}

impl CachedResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn with_status(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

impl Cacheable for CachedResponse {
    fn is_cacheable(&self) -> bool {
        self.status == 200 && self.body.is_cacheable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_shapes() {
        assert!(json!({"vehicles": []}).is_cacheable());
        assert!(json!([1, 2]).is_cacheable());

        assert!(!json!({}).is_cacheable());
        assert!(!json!([]).is_cacheable());
        assert!(!json!(null).is_cacheable());
        assert!(!json!(0).is_cacheable());
        assert!(!json!("text").is_cacheable());
        assert!(!json!(true).is_cacheable());
    }

    #[test]
    fn test_cached_response_requires_ok_status() {
        assert!(CachedResponse::ok(json!({"vehicle": {"id": "1"}})).is_cacheable());
        assert!(!CachedResponse::with_status(404, json!({"error": "not found"})).is_cacheable());
        assert!(!CachedResponse::ok(json!({})).is_cacheable());
    }
}
