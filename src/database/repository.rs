use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::models::Car;
use crate::database::record::{CarDraft, CarUpdate};
use crate::database::search::search_terms;
use crate::database::store::{CarStore, NewCar, StoreError};

/// Errors surfaced by [`CarRepository`]
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Absent and owned-by-someone-else are deliberately the same error.
    #[error("Car not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Parse a car id from a path segment. Malformed ids read as not found.
pub fn parse_car_id(raw: &str) -> RepositoryResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| RepositoryError::NotFound)
}

/// Owner-scoped access to car records.
///
/// Each method takes the caller's owner id and passes it into the store
/// filter; the repository never loads a record and checks ownership afterwards.
#[derive(Clone)]
pub struct CarRepository {
    store: Arc<dyn CarStore>,
}

impl CarRepository {
    pub fn new(store: Arc<dyn CarStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        owner: Uuid,
        draft: CarDraft,
        images: Vec<String>,
    ) -> RepositoryResult<Car> {
        let car = self.store.insert(NewCar::new(owner, draft, images)).await?;
        info!("Created car {} for owner {}", car.id, owner);
        Ok(car)
    }

    pub async fn list_by_owner(&self, owner: Uuid) -> RepositoryResult<Vec<Car>> {
        Ok(self.store.find_by_owner(owner).await?)
    }

    pub async fn get_by_id(&self, owner: Uuid, id: Uuid) -> RepositoryResult<Car> {
        self.store
            .find_one(owner, id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Apply an allow-listed update. A no-op update just returns the record.
    pub async fn update(&self, owner: Uuid, id: Uuid, update: CarUpdate) -> RepositoryResult<Car> {
        if update.is_empty() {
            return self.get_by_id(owner, id).await;
        }
        let car = self
            .store
            .find_one_and_update(owner, id, &update)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        debug!("Updated car {} ({} field changes)", car.id, update.changes().len());
        Ok(car)
    }

    /// Permanently remove a record, returning the removed snapshot.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> RepositoryResult<Car> {
        let car = self
            .store
            .find_one_and_delete(owner, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        info!("Deleted car {} for owner {}", car.id, owner);
        Ok(car)
    }

    pub async fn search(&self, owner: Uuid, query: &str) -> RepositoryResult<Vec<Car>> {
        let terms = search_terms(query);
        debug!("Searching cars of {} for {:?}", owner, terms);
        Ok(self.store.search(owner, &terms).await?)
    }

    pub async fn health_check(&self) -> RepositoryResult<()> {
        Ok(self.store.health_check().await?)
    }
}
