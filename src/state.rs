use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{CarRepository, CarStore};
use crate::upload::ImageStorage;

/// Shared handler state. The store handle is injected here, never held globally.
#[derive(Clone)]
pub struct AppState {
    pub cars: CarRepository,
    pub images: ImageStorage,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn CarStore>, config: AppConfig) -> Self {
        Self {
            cars: CarRepository::new(store),
            images: ImageStorage::new(config.upload.clone()),
            config: Arc::new(config),
        }
    }
}
