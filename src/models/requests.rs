//! Request DTOs for the catalog API
//!
//! Query strings are read leniently: a malformed number is treated as absent
//! rather than rejecting the request.

use serde::Deserialize;

use crate::auth::Credentials;
use crate::catalog::{AdminStatus, PageRequest, SortField, SortOrder, SortSpec, VehicleFilters};

/// Request body for POST /api/auth/login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Returns every field violation, empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let email = self.email.trim();
        let email_len = email.chars().count();
        if !(5..=120).contains(&email_len) || !email.contains('@') {
            errors.push("email must be a valid address of 5 to 120 characters".to_string());
        }
        if !(6..=100).contains(&self.password.chars().count()) {
            errors.push("password must be between 6 and 100 characters".to_string());
        }
        errors
    }

    pub fn into_credentials(self) -> Credentials {
        Credentials {
            email: self.email,
            password: self.password,
        }
    }
}

/// Non-empty trimmed text, or None.
fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn number<T: std::str::FromStr>(value: &Option<String>) -> Option<T> {
    text(value).and_then(|v| v.parse().ok())
}

/// Query string of GET /api/vehicles
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleListQuery {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year_min: Option<String>,
    pub year_max: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub fuel: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl VehicleListQuery {
    pub fn filters(&self) -> VehicleFilters {
        VehicleFilters {
            brand: text(&self.brand),
            model: text(&self.model),
            year_min: number(&self.year_min),
            year_max: number(&self.year_max),
            price_min: number(&self.price_min),
            price_max: number(&self.price_max),
            fuel: text(&self.fuel),
            category: text(&self.category),
            search: text(&self.search),
        }
    }

    /// Unknown sort fields fall back to newest first.
    pub fn sort(&self) -> SortSpec {
        let field = text(&self.sort_by)
            .and_then(|f| f.parse::<SortField>().ok())
            .unwrap_or_default();
        let order = text(&self.sort_order)
            .map(|o| SortOrder::parse_lenient(&o))
            .unwrap_or_default();
        SortSpec::new(field, order)
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::public(number(&self.page), number(&self.per_page))
    }
}

/// Query string of GET /api/vehicles/search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    /// The trimmed search term, None when blank.
    pub fn term(&self) -> Option<String> {
        text(&self.q)
    }
}

/// Query string of GET /api/admin/vehicles
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminListQuery {
    pub status: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl AdminListQuery {
    pub fn status(&self) -> AdminStatus {
        text(&self.status)
            .map(|s| AdminStatus::parse_lenient(&s))
            .unwrap_or_default()
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::admin(number(&self.page), number(&self.per_page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_query(qs: &str) -> VehicleListQuery {
        serde_json::from_value(serde_json::Value::Object(
            url::form_urlencoded::parse(qs.as_bytes())
                .map(|(k, v)| (k.into_owned(), serde_json::Value::String(v.into_owned())))
                .collect(),
        ))
        .unwrap()
    }

    #[test]
    fn test_login_validation() {
        let ok = LoginRequest {
            email: "admin@example.com".into(),
            password: "secret123".into(),
        };
        assert!(ok.validate().is_empty());

        let bad = LoginRequest {
            email: "nope".into(),
            password: "123".into(),
        };
        assert_eq!(bad.validate().len(), 2);
    }

    #[test]
    fn test_list_query_defaults() {
        let query = list_query("");
        assert_eq!(query.filters(), VehicleFilters::default());
        assert_eq!(query.sort(), SortSpec::default());
        assert_eq!(query.page(), PageRequest { page: 1, per_page: 12 });
    }

    #[test]
    fn test_list_query_parsing() {
        let query = list_query(
            "brand=Fiat&year_min=2010&price_max=abc&per_page=500&page=2&sort_by=price&sort_order=asc&fuel=",
        );
        let filters = query.filters();

        assert_eq!(filters.brand.as_deref(), Some("Fiat"));
        assert_eq!(filters.year_min, Some(2010));
        assert_eq!(filters.price_max, None);
        assert_eq!(filters.fuel, None);
        assert_eq!(query.page(), PageRequest { page: 2, per_page: 50 });
        assert_eq!(query.sort(), SortSpec::new(SortField::Price, SortOrder::Asc));
    }

    #[test]
    fn test_unknown_sort_field_falls_back() {
        let query = list_query("sort_by=password&sort_order=asc");
        assert_eq!(query.sort(), SortSpec::new(SortField::CreatedAt, SortOrder::Asc));
    }

    #[test]
    fn test_search_term() {
        assert_eq!(SearchQuery { q: Some("  civic ".into()) }.term().as_deref(), Some("civic"));
        assert_eq!(SearchQuery { q: Some("   ".into()) }.term(), None);
        assert_eq!(SearchQuery::default().term(), None);
    }

    #[test]
    fn test_admin_query() {
        let query = AdminListQuery {
            status: Some("inactive".into()),
            page: None,
            per_page: Some("1000".into()),
        };
        assert_eq!(query.status(), AdminStatus::Inactive);
        assert_eq!(query.page().per_page, 100);
    }
}
