//! Filtering, ordering and pagination of vehicle listings.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use crate::catalog::model::Vehicle;

// == Page Limits ==
pub const DEFAULT_PER_PAGE: u32 = 12;
pub const MAX_PER_PAGE: u32 = 50;
pub const ADMIN_DEFAULT_PER_PAGE: u32 = 20;
pub const ADMIN_MAX_PER_PAGE: u32 = 100;
pub const SEARCH_LIMIT: usize = 20;

// == Filters ==
/// Public listing filters. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilters {
    /// Case-insensitive substring of the brand
    pub brand: Option<String>,
    /// Case-insensitive substring of the model
    pub model: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Exact fuel
    pub fuel: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Substring of brand, model or description
    pub search: Option<String>,
}

impl VehicleFilters {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        fn contains(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        if let Some(brand) = &self.brand {
            if !contains(&vehicle.brand, brand) {
                return false;
            }
        }
        if let Some(model) = &self.model {
            if !contains(&vehicle.model, model) {
                return false;
            }
        }
        if self.year_min.is_some_and(|min| vehicle.year < min)
            || self.year_max.is_some_and(|max| vehicle.year > max)
        {
            return false;
        }
        // Vehicles without a price never satisfy a price bound
        if let Some(min) = self.price_min {
            if !vehicle.price.is_some_and(|p| p >= min) {
                return false;
            }
        }
        if let Some(max) = self.price_max {
            if !vehicle.price.is_some_and(|p| p <= max) {
                return false;
            }
        }
        if self.fuel.is_some() && vehicle.fuel != self.fuel {
            return false;
        }
        if self.category.is_some() && vehicle.category != self.category {
            return false;
        }
        if let Some(term) = &self.search {
            let in_description = vehicle
                .description
                .as_deref()
                .is_some_and(|d| contains(d, term));
            if !(contains(&vehicle.brand, term) || contains(&vehicle.model, term) || in_description)
            {
                return false;
            }
        }
        true
    }
}

// == Sorting ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Id,
    Brand,
    Model,
    Year,
    Price,
    Mileage,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SortField::CreatedAt),
            "updated_at" => Ok(SortField::UpdatedAt),
            "id" => Ok(SortField::Id),
            "brand" => Ok(SortField::Brand),
            "model" => Ok(SortField::Model),
            "year" => Ok(SortField::Year),
            "price" => Ok(SortField::Price),
            "mileage" => Ok(SortField::Mileage),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// "asc" sorts ascending; anything else sorts descending.
    pub fn parse_lenient(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Compares two vehicles. Ties fall back to id so paging is stable.
    pub fn compare(&self, a: &Vehicle, b: &Vehicle) -> Ordering {
        let primary = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Id => Ordering::Equal,
            SortField::Brand => a.brand.cmp(&b.brand),
            SortField::Model => a.model.cmp(&b.model),
            SortField::Year => a.year.cmp(&b.year),
            SortField::Price => a
                .price
                .partial_cmp(&b.price)
                .unwrap_or(Ordering::Equal),
            SortField::Mileage => a.mileage.cmp(&b.mileage),
        };
        let ordering = primary.then_with(|| a.id.cmp(&b.id));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    pub fn sort(&self, vehicles: &mut [Vehicle]) {
        vehicles.sort_by(|a, b| self.compare(a, b));
    }
}

// == Admin Status Filter ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminStatus {
    #[default]
    All,
    Active,
    Inactive,
}

impl AdminStatus {
    /// Unknown values list everything.
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "active" => AdminStatus::Active,
            "inactive" => AdminStatus::Inactive,
            _ => AdminStatus::All,
        }
    }

    pub fn admits(&self, vehicle: &Vehicle) -> bool {
        match self {
            AdminStatus::All => true,
            AdminStatus::Active => vehicle.is_active,
            AdminStatus::Inactive => !vehicle.is_active,
        }
    }
}

// == Pagination ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Clamps `page` to at least 1 and `per_page` to `1..=max`.
    pub fn clamped(page: Option<i64>, per_page: Option<i64>, default: u32, max: u32) -> Self {
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
        let per_page = per_page
            .unwrap_or(i64::from(default))
            .clamp(1, i64::from(max)) as u32;
        Self { page, per_page }
    }

    /// Public listing limits (12 per page, at most 50).
    pub fn public(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self::clamped(page, per_page, DEFAULT_PER_PAGE, MAX_PER_PAGE)
    }

    /// Admin listing limits (20 per page, at most 100).
    pub fn admin(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self::clamped(page, per_page, ADMIN_DEFAULT_PER_PAGE, ADMIN_MAX_PER_PAGE)
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.per_page as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::public(None, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Cuts the requested page out of the full ordered result.
    ///
    /// Pages past the end are empty rather than an error.
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let per_page = u64::from(request.per_page);
        let pages = total.div_ceil(per_page);
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.per_page as usize)
            .collect();

        Self {
            items,
            pagination: Pagination {
                page: request.page,
                per_page: request.per_page,
                total,
                pages,
                has_next: u64::from(request.page) < pages,
                has_prev: request.page > 1,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::VehicleDraft;
    use chrono::{Duration, Utc};

    fn vehicle(id: u64, brand: &str, price: Option<f64>) -> Vehicle {
        let draft = VehicleDraft {
            price,
            fuel: Some("Flex".into()),
            category: Some("Hatch".into()),
            description: Some("único dono".into()),
            ..VehicleDraft::new(brand, "Modelo", 2010 + id as i32)
        };
        let created = Utc::now() + Duration::seconds(id as i64);
        Vehicle::from_draft(id, draft, created)
    }

    #[test]
    fn test_filters() {
        let v = vehicle(1, "Volkswagen", Some(50_000.0));

        assert!(VehicleFilters::default().matches(&v));
        assert!(VehicleFilters { brand: Some("volks".into()), ..Default::default() }.matches(&v));
        assert!(!VehicleFilters { brand: Some("fiat".into()), ..Default::default() }.matches(&v));
        assert!(VehicleFilters { year_min: Some(2011), year_max: Some(2011), ..Default::default() }
            .matches(&v));
        assert!(!VehicleFilters { price_max: Some(10_000.0), ..Default::default() }.matches(&v));
        assert!(VehicleFilters { search: Some("ÚNICO".into()), ..Default::default() }.matches(&v));
        assert!(!VehicleFilters { fuel: Some("Diesel".into()), ..Default::default() }.matches(&v));
    }

    #[test]
    fn test_price_bound_excludes_unpriced() {
        let v = vehicle(1, "Fiat", None);
        assert!(!VehicleFilters { price_min: Some(0.0), ..Default::default() }.matches(&v));
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let mut vehicles = vec![vehicle(1, "A", None), vehicle(3, "C", None), vehicle(2, "B", None)];
        SortSpec::default().sort(&mut vehicles);
        let ids: Vec<u64> = vehicles.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_by_price_ascending() {
        let mut vehicles = vec![
            vehicle(1, "A", Some(30.0)),
            vehicle(2, "B", Some(10.0)),
            vehicle(3, "C", Some(20.0)),
        ];
        SortSpec::new(SortField::Price, SortOrder::Asc).sort(&mut vehicles);
        let ids: Vec<u64> = vehicles.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_parsing() {
        assert_eq!("year".parse(), Ok(SortField::Year));
        assert!("password".parse::<SortField>().is_err());
        assert_eq!(SortOrder::parse_lenient("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse_lenient("sideways"), SortOrder::Desc);
        assert_eq!(AdminStatus::parse_lenient("inactive"), AdminStatus::Inactive);
        assert_eq!(AdminStatus::parse_lenient("bogus"), AdminStatus::All);
    }

    #[test]
    fn test_page_request_clamping() {
        assert_eq!(PageRequest::public(None, None), PageRequest { page: 1, per_page: 12 });
        assert_eq!(PageRequest::public(Some(0), Some(500)), PageRequest { page: 1, per_page: 50 });
        assert_eq!(PageRequest::admin(Some(3), None), PageRequest { page: 3, per_page: 20 });
        assert_eq!(PageRequest::admin(None, Some(-4)).per_page, 1);
    }

    #[test]
    fn test_page_slice() {
        let page = Page::slice((1..=25).collect::<Vec<u32>>(), PageRequest { page: 3, per_page: 10 });
        assert_eq!(page.items, (21..=25).collect::<Vec<_>>());
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.pages, 3);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);

        let past_end = Page::slice(vec![1, 2], PageRequest { page: 9, per_page: 10 });
        assert!(past_end.is_empty());

        let none = Page::slice(Vec::<u32>::new(), PageRequest::default());
        assert_eq!(none.pagination.pages, 0);
        assert!(!none.pagination.has_next);
    }
}
