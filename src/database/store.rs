//! Resource store abstraction for car records.
//!
//! Every lookup, update and delete takes the owner id as part of its filter,
//! so implementations never hand back a record belonging to someone else.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Car, Tags};
use crate::database::record::{CarDraft, CarUpdate};

/// Errors from the underlying store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("database query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A fully-formed record ready for insertion. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCar {
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub tags: Tags,
}

impl NewCar {
    pub fn new(owner: Uuid, draft: CarDraft, images: Vec<String>) -> Self {
        Self {
            owner,
            title: draft.title().to_string(),
            description: draft.description().to_string(),
            images,
            tags: draft.tags().clone(),
        }
    }
}

/// Owner-filtered persistence operations.
///
/// Implementations must be thread-safe and rely only on single-record
/// atomicity: `find_one_and_update` and `find_one_and_delete` each touch one
/// record in one step.
#[async_trait]
pub trait CarStore: Send + Sync + 'static {
    /// Inserts a record and returns it with id and timestamps filled in.
    async fn insert(&self, car: NewCar) -> StoreResult<Car>;

    /// All records of one owner.
    async fn find_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Car>>;

    /// The record with this id, if it belongs to `owner`.
    async fn find_one(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Car>>;

    /// Applies `update` to the owner's record and returns the new state.
    async fn find_one_and_update(
        &self,
        owner: Uuid,
        id: Uuid,
        update: &CarUpdate,
    ) -> StoreResult<Option<Car>>;

    /// Removes the owner's record and returns what was removed.
    async fn find_one_and_delete(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Car>>;

    /// Records of `owner` whose searchable text matches any of `terms`.
    ///
    /// `terms` are already normalised by [`crate::database::search::search_terms`].
    async fn search(&self, owner: Uuid, terms: &[String]) -> StoreResult<Vec<Car>>;

    /// Cheap connectivity check.
    async fn health_check(&self) -> StoreResult<()>;
}
