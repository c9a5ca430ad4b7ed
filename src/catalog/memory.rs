//! In-process catalog backed by an ordered map.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::catalog::model::{CategoryCount, DashboardStats, Vehicle, VehicleDraft};
use crate::catalog::query::{AdminStatus, Page, PageRequest, SortSpec, VehicleFilters};
use crate::catalog::store::{CatalogError, CatalogStore};

#[derive(Debug)]
pub struct InMemoryCatalog {
    vehicles: RwLock<BTreeMap<u64, Vehicle>>,
    next_id: AtomicU64,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            vehicles: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Builds a catalog pre-filled with `drafts`, ids assigned from 1.
    pub fn from_drafts(drafts: Vec<VehicleDraft>) -> Result<Self, CatalogError> {
        let now = Utc::now();
        let mut vehicles = BTreeMap::new();
        for (index, draft) in drafts.into_iter().enumerate() {
            draft.validate().map_err(CatalogError::Validation)?;
            let id = index as u64 + 1;
            vehicles.insert(id, Vehicle::from_draft(id, draft, now));
        }
        let next_id = vehicles.len() as u64 + 1;
        Ok(Self {
            vehicles: RwLock::new(vehicles),
            next_id: AtomicU64::new(next_id),
        })
    }

    pub async fn len(&self) -> usize {
        self.vehicles.read().await.len()
    }

    async fn find<P>(&self, term: &str, limit: usize, admit: P) -> Vec<Vehicle>
    where
        P: Fn(&Vehicle) -> bool,
    {
        let needle = term.to_lowercase();
        self.vehicles
            .read()
            .await
            .values()
            .filter(|v| admit(v) && v.matches_term(&needle))
            .take(limit)
            .cloned()
            .collect()
    }

    async fn modify<F>(&self, id: u64, change: F) -> Result<Vehicle, CatalogError>
    where
        F: FnOnce(&mut Vehicle) + Send,
    {
        let mut vehicles = self.vehicles.write().await;
        let vehicle = vehicles.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        change(vehicle);
        Ok(vehicle.clone())
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list(
        &self,
        filters: &VehicleFilters,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<Page<Vehicle>, CatalogError> {
        let vehicles = self.vehicles.read().await;
        let mut matching: Vec<Vehicle> = vehicles
            .values()
            .filter(|v| v.is_active && filters.matches(v))
            .cloned()
            .collect();
        drop(vehicles);

        sort.sort(&mut matching);
        Ok(Page::slice(matching, page))
    }

    async fn get(&self, id: u64) -> Result<Vehicle, CatalogError> {
        self.vehicles
            .read()
            .await
            .get(&id)
            .filter(|v| v.is_active)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<Vehicle>, CatalogError> {
        Ok(self.find(term, limit, |v| v.is_active).await)
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, CatalogError> {
        let vehicles = self.vehicles.read().await;
        Ok(CategoryCount::tally(
            vehicles
                .values()
                .filter(|v| v.is_active)
                .map(|v| v.category.as_deref()),
        ))
    }

    async fn admin_list(
        &self,
        status: AdminStatus,
        page: PageRequest,
    ) -> Result<Page<Vehicle>, CatalogError> {
        let mut matching: Vec<Vehicle> = self
            .vehicles
            .read()
            .await
            .values()
            .filter(|v| status.admits(v))
            .cloned()
            .collect();
        SortSpec::default().sort(&mut matching);
        Ok(Page::slice(matching, page))
    }

    async fn admin_search(&self, term: &str, limit: usize) -> Result<Vec<Vehicle>, CatalogError> {
        Ok(self.find(term, limit, |_| true).await)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, CatalogError> {
        Ok(DashboardStats::from_vehicles(self.vehicles.read().await.values()))
    }

    async fn create(&self, draft: VehicleDraft) -> Result<Vehicle, CatalogError> {
        draft.validate().map_err(CatalogError::Validation)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let vehicle = Vehicle::from_draft(id, draft, Utc::now());
        self.vehicles.write().await.insert(id, vehicle.clone());
        debug!(id, "vehicle created");
        Ok(vehicle)
    }

    async fn update(&self, id: u64, draft: VehicleDraft) -> Result<Vehicle, CatalogError> {
        draft.validate().map_err(CatalogError::Validation)?;
        let now = Utc::now();
        self.modify(id, move |vehicle| vehicle.apply(draft, now)).await
    }

    async fn soft_delete(&self, id: u64) -> Result<Vehicle, CatalogError> {
        let now = Utc::now();
        self.modify(id, move |vehicle| {
            vehicle.is_active = false;
            vehicle.updated_at = now;
        })
        .await
    }

    async fn restore(&self, id: u64) -> Result<Vehicle, CatalogError> {
        let now = Utc::now();
        self.modify(id, move |vehicle| {
            vehicle.is_active = true;
            vehicle.updated_at = now;
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(brand: &str, model: &str, category: &str) -> VehicleDraft {
        VehicleDraft {
            category: Some(category.into()),
            fuel: Some("Flex".into()),
            price: Some(50_000.0),
            ..VehicleDraft::new(brand, model, 2020)
        }
    }

    fn seeded() -> InMemoryCatalog {
        InMemoryCatalog::from_drafts(vec![
            draft("Fiat", "Uno", "Hatch"),
            draft("Honda", "Civic", "Sedan"),
            draft("Toyota", "Corolla", "Sedan"),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let catalog = seeded();
        let created = catalog.create(draft("Jeep", "Renegade", "SUV")).await.unwrap();

        assert_eq!(created.id, 4);
        assert!(created.is_active);
        assert_eq!(catalog.get(4).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft() {
        let catalog = InMemoryCatalog::new();
        let result = catalog.create(VehicleDraft::new("X", "Y", 1800)).await;

        assert!(matches!(result, Err(CatalogError::Validation(errors)) if errors.len() == 3));
        assert_eq!(catalog.len().await, 0);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_public_reads() {
        let catalog = seeded();
        catalog.soft_delete(2).await.unwrap();

        assert_eq!(catalog.get(2).await, Err(CatalogError::NotFound(2)));
        let page = catalog
            .list(&VehicleFilters::default(), SortSpec::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert!(catalog.search("civic", 20).await.unwrap().is_empty());

        let inactive = catalog
            .admin_list(AdminStatus::Inactive, PageRequest::admin(None, None))
            .await
            .unwrap();
        assert_eq!(inactive.items.len(), 1);

        catalog.restore(2).await.unwrap();
        assert!(catalog.get(2).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let catalog = seeded();
        let updated = catalog.update(1, draft("Fiat", "Mobi", "Hatch")).await.unwrap();

        assert_eq!(updated.model, "Mobi");
        assert_eq!(catalog.get(1).await.unwrap().model, "Mobi");
        assert_eq!(
            catalog.update(99, draft("Fiat", "Mobi", "Hatch")).await,
            Err(CatalogError::NotFound(99))
        );
    }

    #[tokio::test]
    async fn test_category_counts() {
        let catalog = seeded();
        let counts = catalog.category_counts().await.unwrap();

        assert_eq!(
            counts,
            vec![
                CategoryCount { name: "Hatch".into(), count: 1 },
                CategoryCount { name: "Sedan".into(), count: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let catalog = seeded();
        assert_eq!(catalog.search("sedan", 1).await.unwrap().len(), 1);
        assert_eq!(catalog.search("FLEX", 20).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_admin_search_includes_inactive() {
        let catalog = seeded();
        catalog.soft_delete(2).await.unwrap();

        assert!(catalog.search("civic", 20).await.unwrap().is_empty());
        let found = catalog.admin_search("civic", 20).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(!found[0].is_active);
        assert_eq!(catalog.admin_search("flex", 2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let catalog = seeded();
        catalog.soft_delete(1).await.unwrap();

        let stats = catalog.dashboard_stats().await.unwrap();

        assert_eq!(stats.total_vehicles, 2);
        assert_eq!(stats.total_inactive, 1);
        assert_eq!(stats.categories, vec![CategoryCount { name: "Sedan".into(), count: 2 }]);
        assert_eq!(stats.brands.len(), 2);
        assert_eq!(stats.fuels, vec![CategoryCount { name: "Flex".into(), count: 2 }]);
    }
}
