//! In-memory car store for tests and database-less runs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::Car;
use crate::database::record::CarUpdate;
use crate::database::search::matches_any;
use crate::database::store::{CarStore, NewCar, StoreResult};

/// Records kept in insertion order behind a single lock.
#[derive(Debug, Default)]
pub struct MemoryCarStore {
    cars: RwLock<Vec<Car>>,
}

impl MemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl CarStore for MemoryCarStore {
    async fn insert(&self, car: NewCar) -> StoreResult<Car> {
        let now = Utc::now();
        let car = Car {
            id: Uuid::new_v4(),
            title: car.title,
            description: car.description,
            images: car.images,
            tags: car.tags,
            owner: car.owner,
            created_at: now,
            updated_at: now,
        };
        self.cars.write().await.push(car.clone());
        Ok(car)
    }

    async fn find_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Car>> {
        let cars = self.cars.read().await;
        Ok(cars.iter().filter(|car| car.owner == owner).cloned().collect())
    }

    async fn find_one(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Car>> {
        let cars = self.cars.read().await;
        Ok(cars
            .iter()
            .find(|car| car.id == id && car.owner == owner)
            .cloned())
    }

    async fn find_one_and_update(
        &self,
        owner: Uuid,
        id: Uuid,
        update: &CarUpdate,
    ) -> StoreResult<Option<Car>> {
        let mut cars = self.cars.write().await;
        let Some(car) = cars.iter_mut().find(|car| car.id == id && car.owner == owner) else {
            return Ok(None);
        };
        update.apply_to(car);
        car.updated_at = Utc::now();
        Ok(Some(car.clone()))
    }

    async fn find_one_and_delete(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Car>> {
        let mut cars = self.cars.write().await;
        let position = cars
            .iter()
            .position(|car| car.id == id && car.owner == owner);
        Ok(position.map(|index| cars.remove(index)))
    }

    async fn search(&self, owner: Uuid, terms: &[String]) -> StoreResult<Vec<Car>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let cars = self.cars.read().await;
        Ok(cars
            .iter()
            .filter(|car| car.owner == owner && matches_any(car.searchable_text(), terms))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Tags;
    use crate::database::record::CarChange;

    fn new_car(owner: Uuid, title: &str) -> NewCar {
        NewCar {
            owner,
            title: title.to_string(),
            description: "desc".to_string(),
            images: vec![],
            tags: Tags::default(),
        }
    }

    #[tokio::test]
    async fn scoped_lookups_ignore_other_owners() {
        let store = MemoryCarStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let car = store.insert(new_car(alice, "Civic")).await.unwrap();

        assert!(store.find_one(bob, car.id).await.unwrap().is_none());
        assert!(store.find_one_and_delete(bob, car.id).await.unwrap().is_none());
        assert!(store.find_one(alice, car.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_bumps_updated_at_only() {
        let store = MemoryCarStore::new();
        let owner = Uuid::new_v4();
        let car = store.insert(new_car(owner, "Civic")).await.unwrap();

        let update = CarUpdate::new().change(CarChange::title("Accord").unwrap());
        let updated = store
            .find_one_and_update(owner, car.id, &update)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Accord");
        assert_eq!(updated.created_at, car.created_at);
        assert!(updated.updated_at >= car.updated_at);
    }

    #[tokio::test]
    async fn empty_terms_match_nothing() {
        let store = MemoryCarStore::new();
        let owner = Uuid::new_v4();
        store.insert(new_car(owner, "Civic")).await.unwrap();

        assert!(store.search(owner, &[]).await.unwrap().is_empty());
    }
}
