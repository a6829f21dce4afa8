pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod record;
pub mod repository;
pub mod search;
pub mod store;

pub use manager::DatabaseManager;
pub use memory::MemoryCarStore;
pub use postgres::PgCarStore;
pub use record::{CarChange, CarDraft, CarUpdate, ValidationError};
pub use repository::{parse_car_id, CarRepository, RepositoryError};
pub use store::{CarStore, NewCar, StoreError};
