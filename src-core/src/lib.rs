//! tickdo backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: SQLite tables behind the local datastore
//! - remote: Datastore seam and the hosted PostgREST client
//! - store: In-memory state with best-effort write-through
//! - views: Pure filtering, grouping and parsing
//! - commands: Handlers used by the CLI

use std::sync::Arc;

pub mod commands;
pub mod config;
pub mod domain;
pub mod remote;
pub mod repository;
pub mod store;
pub mod views;

use config::AppConfig;
use remote::{Datastore, RestDatastore};
use repository::{init_db, DbState, LocalDatastore};
use store::{Confirm, TaskStore};

/// Application state shared across commands
pub struct AppState {
    pub store: TaskStore,
    pub config: AppConfig,
    /// The local database, kept open even while the hosted backend is active
    pub local: DbState,
}

/// Pick the datastore the configuration asks for
pub fn select_datastore(config: &AppConfig, local: &DbState) -> Result<Arc<dyn Datastore>, String> {
    match &config.remote {
        Some(remote) => {
            log::info!("Using hosted backend at {}", remote.url);
            let rest = RestDatastore::new(remote).map_err(|e| e.to_string())?;
            Ok(Arc::new(rest))
        }
        None => Ok(Arc::new(LocalDatastore::new(local))),
    }
}

/// Open the database, choose the datastore and load the snapshot.
///
/// A hosted backend that cannot be loaded leaves the store uninitialized
/// so `sync` commands can still report on it or switch back to local.
pub async fn init_app(config: AppConfig, confirm: Arc<dyn Confirm>) -> Result<AppState, String> {
    let local = init_db(&config.db_path).await.map_err(|e| {
        let _ = rolling_logger::error(&format!("DB init failed: {}", e));
        e
    })?;
    let _ = rolling_logger::info("DB init success");

    let datastore = select_datastore(&config, &local)?;
    let store = TaskStore::new(datastore, confirm);
    if let Err(e) = store.fetch_all().await {
        if !config.is_remote() {
            return Err(e.to_string());
        }
        let _ = rolling_logger::error(&format!("Hosted backend load failed: {}", e));
    }

    Ok(AppState { store, config, local })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AlwaysConfirm;

    #[tokio::test]
    async fn test_init_app_uses_local_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_data_dir(dir.path());

        let state = init_app(config.clone(), Arc::new(AlwaysConfirm)).await.unwrap();
        assert!(state.store.is_initialized().await);
        assert_eq!(state.store.datastore().await.name(), "local");
        assert!(config.db_path.exists());
    }
}
