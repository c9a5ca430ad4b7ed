//! Values held in the response cache for the public read routes.

use serde_json::{json, Value};

use crate::cache::Cacheable;
use crate::catalog::{CategoryCount, Page, Vehicle};

/// A computed public read, kept in typed form until it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogPayload {
    Page(Page<Vehicle>),
    Vehicle(Box<Vehicle>),
    Search { term: String, vehicles: Vec<Vehicle> },
    Categories(Vec<CategoryCount>),
}

impl CatalogPayload {
    /// Renders the response envelope, advertising `ttl` in `cache_info`.
    pub fn into_body(self, ttl: u64) -> Value {
        let cache_info = json!({ "cached": true, "cache_timeout": ttl });
        match self {
            CatalogPayload::Page(page) => json!({
                "vehicles": page.items,
                "pagination": page.pagination,
                "cache_info": cache_info,
            }),
            CatalogPayload::Vehicle(vehicle) => json!({
                "vehicle": vehicle,
                "cache_info": cache_info,
            }),
            CatalogPayload::Search { term, vehicles } => json!({
                "vehicles": vehicles,
                "search_term": term,
                "cache_info": cache_info,
            }),
            CatalogPayload::Categories(categories) => json!({
                "categories": categories,
                "cache_info": cache_info,
            }),
        }
    }
}

impl Cacheable for CatalogPayload {
    /// Empty pages, searches and category lists are served but not kept.
    fn is_cacheable(&self) -> bool {
        match self {
            CatalogPayload::Page(page) => !page.is_empty(),
            CatalogPayload::Vehicle(_) => true,
            CatalogPayload::Search { vehicles, .. } => !vehicles.is_empty(),
            CatalogPayload::Categories(categories) => !categories.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PageRequest, VehicleDraft};
    use chrono::Utc;

    fn vehicle() -> Vehicle {
        Vehicle::from_draft(1, VehicleDraft::new("Fiat", "Uno", 2015), Utc::now())
    }

    #[test]
    fn test_cacheability() {
        let empty_page = Page::slice(Vec::new(), PageRequest::default());
        assert!(!CatalogPayload::Page(empty_page).is_cacheable());
        assert!(CatalogPayload::Page(Page::slice(vec![vehicle()], PageRequest::default()))
            .is_cacheable());
        assert!(CatalogPayload::Vehicle(Box::new(vehicle())).is_cacheable());
        assert!(!CatalogPayload::Search {
            term: "x".into(),
            vehicles: vec![]
        }
        .is_cacheable());
        assert!(!CatalogPayload::Categories(vec![]).is_cacheable());
    }

    #[test]
    fn test_page_envelope() {
        let body = CatalogPayload::Page(Page::slice(vec![vehicle()], PageRequest::default()))
            .into_body(3600);

        assert_eq!(body["vehicles"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["pagination"]["per_page"], 12);
        assert_eq!(body["cache_info"], json!({"cached": true, "cache_timeout": 3600}));
    }

    #[test]
    fn test_search_envelope() {
        let body = CatalogPayload::Search {
            term: "uno".into(),
            vehicles: vec![vehicle()],
        }
        .into_body(1800);

        assert_eq!(body["search_term"], "uno");
        assert_eq!(body["vehicles"][0]["model"], "Uno");
        assert_eq!(body["cache_info"]["cache_timeout"], 1800);
    }
}
