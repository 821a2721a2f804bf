use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::health::HealthTracker;
use crate::inventory::InventoryManager;

pub type Shared<T> = Arc<Mutex<T>>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

/// État unique injecté dans le routeur Axum
#[derive(Clone)]
pub struct AppState {
    pub cfg: Shared<ServiceConfig>,
    pub inventory: InventoryManager,
    pub health_tracker: HealthTracker,
}
