//! Shared application state.

use harvest_manager::{Database, ManagerConfig};

pub struct AppState {
    pub db: Database,
    pub config: ManagerConfig,
}

impl AppState {
    pub fn new(db: Database, config: ManagerConfig) -> Self {
        Self { db, config }
    }
}
