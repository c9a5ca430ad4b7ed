//! Vehicle records and the write payload used to create or replace them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Vocabularies ==
pub const FUELS: &[&str] = &["Gasolina", "Etanol", "Flex", "Diesel", "Elétrico", "Híbrido"];
pub const TRANSMISSIONS: &[&str] = &["Manual", "Automático", "CVT", "Automatizada"];
pub const CATEGORIES: &[&str] = &["Hatch", "Sedan", "SUV", "Picape", "Conversível", "Wagon", "Coupé"];

/// Category name reported for vehicles without one.
pub const UNCATEGORIZED: &str = "Não informado";

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2030;
pub const MAX_PRICE: f64 = 10_000_000.0;
pub const MAX_MILEAGE: i64 = 1_000_000;

// == Vehicle ==
/// A catalog listing as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Option<f64>,
    pub price_on_request: bool,
    pub description: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    pub color: Option<String>,
    pub mileage: i64,
    pub category: Option<String>,
    pub whatsapp_link: Option<String>,
    pub images: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Builds a new active vehicle from a validated draft.
    pub fn from_draft(id: u64, draft: VehicleDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            brand: draft.brand,
            model: draft.model,
            year: draft.year,
            price: draft.price,
            price_on_request: draft.price_on_request.unwrap_or(false),
            description: draft.description,
            fuel: draft.fuel,
            transmission: draft.transmission,
            color: draft.color,
            mileage: draft.mileage.unwrap_or(0),
            category: draft.category,
            whatsapp_link: draft.whatsapp_link,
            images: draft.images.unwrap_or_default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the editable fields with those of `draft`.
    ///
    /// `price_on_request` and `images` keep their current values when the
    /// draft leaves them out. Activity and creation time never change here.
    pub fn apply(&mut self, draft: VehicleDraft, now: DateTime<Utc>) {
        self.brand = draft.brand;
        self.model = draft.model;
        self.year = draft.year;
        self.price = draft.price;
        if let Some(on_request) = draft.price_on_request {
            self.price_on_request = on_request;
        }
        self.description = draft.description;
        self.fuel = draft.fuel;
        self.transmission = draft.transmission;
        self.color = draft.color;
        self.mileage = draft.mileage.unwrap_or(0);
        self.category = draft.category;
        self.whatsapp_link = draft.whatsapp_link;
        if let Some(images) = draft.images {
            self.images = images;
        }
        self.updated_at = now;
    }

    /// Case-insensitive substring match over the searchable text fields.
    pub fn matches_term(&self, needle_lower: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(needle_lower);
        contains(&self.brand)
            || contains(&self.model)
            || self.description.as_deref().is_some_and(contains)
            || self.color.as_deref().is_some_and(contains)
            || self.category.as_deref().is_some_and(contains)
            || self.fuel.as_deref().is_some_and(contains)
    }
}

// == Vehicle Draft ==
/// Body of a create or full-replace request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleDraft {
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub price_on_request: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fuel: Option<String>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub mileage: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub whatsapp_link: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

impl VehicleDraft {
    pub fn new(brand: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            year,
            ..Self::default()
        }
    }

    /// Checks every field and returns all violations at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        check_length(&mut errors, "brand", &self.brand, 2, 100);
        check_length(&mut errors, "model", &self.model, 2, 100);

        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            errors.push(format!("year must be between {MIN_YEAR} and {MAX_YEAR}"));
        }
        if let Some(price) = self.price {
            if !price.is_finite() || !(0.0..=MAX_PRICE).contains(&price) {
                errors.push(format!("price must be between 0 and {MAX_PRICE}"));
            }
        }
        if let Some(description) = &self.description {
            check_length(&mut errors, "description", description, 0, 2000);
        }
        check_one_of(&mut errors, "fuel", self.fuel.as_deref(), FUELS);
        check_one_of(&mut errors, "transmission", self.transmission.as_deref(), TRANSMISSIONS);
        if let Some(color) = &self.color {
            check_length(&mut errors, "color", color, 0, 50);
        }
        if let Some(mileage) = self.mileage {
            if !(0..=MAX_MILEAGE).contains(&mileage) {
                errors.push(format!("mileage must be between 0 and {MAX_MILEAGE}"));
            }
        }
        check_one_of(&mut errors, "category", self.category.as_deref(), CATEGORIES);
        if let Some(link) = &self.whatsapp_link {
            check_length(&mut errors, "whatsapp_link", link, 0, 500);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_length(errors: &mut Vec<String>, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(format!("{field} must be between {min} and {max} characters"));
    }
}

fn check_one_of(errors: &mut Vec<String>, field: &str, value: Option<&str>, allowed: &[&str]) {
    if let Some(value) = value {
        if !allowed.contains(&value) {
            errors.push(format!("{field} must be one of: {}", allowed.join(", ")));
        }
    }
}

// == Category Count ==
/// Number of active vehicles sharing one category (or brand, or fuel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

impl CategoryCount {
    /// Counts `names` into name-ordered buckets, `None` landing in
    /// [`UNCATEGORIZED`].
    pub fn tally<'a, I>(names: I) -> Vec<CategoryCount>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for name in names {
            *counts.entry(name.unwrap_or(UNCATEGORIZED)).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(name, count)| CategoryCount {
                name: name.to_string(),
                count,
            })
            .collect()
    }
}

// == Dashboard Stats ==
/// Live catalog totals for the admin dashboard. Groupings cover active
/// vehicles only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_vehicles: u64,
    pub total_inactive: u64,
    pub categories: Vec<CategoryCount>,
    pub brands: Vec<CategoryCount>,
    pub fuels: Vec<CategoryCount>,
}

impl DashboardStats {
    pub fn from_vehicles<'a, I>(vehicles: I) -> Self
    where
        I: IntoIterator<Item = &'a Vehicle>,
    {
        let (active, inactive): (Vec<&Vehicle>, Vec<&Vehicle>) =
            vehicles.into_iter().partition(|v| v.is_active);
        Self {
            total_vehicles: active.len() as u64,
            total_inactive: inactive.len() as u64,
            categories: CategoryCount::tally(active.iter().map(|v| v.category.as_deref())),
            brands: CategoryCount::tally(active.iter().map(|v| Some(v.brand.as_str()))),
            fuels: CategoryCount::tally(active.iter().map(|v| v.fuel.as_deref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> VehicleDraft {
        VehicleDraft {
            fuel: Some("Flex".into()),
            transmission: Some("Manual".into()),
            category: Some("Hatch".into()),
            price: Some(45_000.0),
            ..VehicleDraft::new("Fiat", "Uno", 2015)
        }
    }

    #[test]
    fn test_valid_draft() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let bad = VehicleDraft {
            fuel: Some("Carvão".into()),
            mileage: Some(-1),
            price: Some(20_000_000.0),
            ..VehicleDraft::new("F", "", 1850)
        };

        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.iter().any(|e| e.starts_with("brand")));
        assert!(errors.iter().any(|e| e.starts_with("fuel")));
    }

    #[test]
    fn test_accented_vocabulary_and_char_lengths() {
        let ok = VehicleDraft {
            fuel: Some("Elétrico".into()),
            category: Some("Conversível".into()),
            transmission: Some("Automático".into()),
            ..VehicleDraft::new("Çé", "Ñó", 2024)
        };
        assert_eq!(ok.validate(), Ok(()));
    }

    #[test]
    fn test_apply_keeps_omitted_images_and_flag() {
        let now = Utc::now();
        let mut vehicle = Vehicle::from_draft(
            1,
            VehicleDraft {
                images: Some(vec!["a.jpg".into()]),
                price_on_request: Some(true),
                ..draft()
            },
            now,
        );

        vehicle.apply(VehicleDraft::new("Fiat", "Palio", 2016), now);

        assert_eq!(vehicle.model, "Palio");
        assert_eq!(vehicle.images, vec!["a.jpg".to_string()]);
        assert!(vehicle.price_on_request);
        assert_eq!(vehicle.fuel, None);
        assert!(vehicle.is_active);
    }

    #[test]
    fn test_matches_term() {
        let vehicle = Vehicle::from_draft(1, draft(), Utc::now());
        assert!(vehicle.matches_term("uno"));
        assert!(vehicle.matches_term("hatch"));
        assert!(vehicle.matches_term("flex"));
        assert!(!vehicle.matches_term("civic"));
    }

    #[test]
    fn test_dashboard_stats_group_active_only() {
        let now = Utc::now();
        let mut retired = Vehicle::from_draft(3, VehicleDraft::new("Ford", "Ka", 2012), now);
        retired.is_active = false;
        let vehicles = vec![
            Vehicle::from_draft(1, draft(), now),
            Vehicle::from_draft(
                2,
                VehicleDraft {
                    fuel: None,
                    category: None,
                    ..draft()
                },
                now,
            ),
            retired,
        ];

        let stats = DashboardStats::from_vehicles(&vehicles);

        assert_eq!(stats.total_vehicles, 2);
        assert_eq!(stats.total_inactive, 1);
        assert_eq!(
            stats.brands,
            vec![CategoryCount { name: "Fiat".into(), count: 2 }]
        );
        assert_eq!(
            stats.categories,
            vec![
                CategoryCount { name: "Hatch".into(), count: 1 },
                CategoryCount { name: UNCATEGORIZED.into(), count: 1 },
            ]
        );
        assert_eq!(stats.fuels.len(), 2);
    }
}
