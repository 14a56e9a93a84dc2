//! Cloud Sync Commands
//!
//! Moving the store between the local database and the hosted backend.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{clear_sync_config, get_sync_config, save_sync_config, RemoteConfig};
use crate::remote::{Datastore, RestDatastore};
use crate::repository::LocalDatastore;
use crate::AppState;

/// Outcome of copying local records to the hosted backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub copied: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub datastore: &'static str,
    pub url: Option<String>,
    pub failed_writes: usize,
}

/// Connect to a hosted backend, copying every local record to it first
pub async fn configure_cloud_sync(
    state: &AppState,
    url: String,
    anon_key: String,
    access_token: Option<String>,
) -> Result<MigrationReport, String> {
    let config = RemoteConfig {
        url: url.trim().to_string(),
        anon_key: anon_key.trim().to_string(),
        access_token: access_token.filter(|t| !t.trim().is_empty()),
    };

    log::info!("[1/4] Validating connection to {}", config.url);
    let remote = RestDatastore::new(&config).map_err(|e| e.to_string())?;
    remote
        .validate_connection()
        .await
        .map_err(|e| format!("Connection check failed: {}", e))?;

    log::info!("[2/4] Copying local data");
    let snapshot = LocalDatastore::new(&state.local)
        .load()
        .await
        .map_err(|e| format!("Reading local data failed: {}", e))?;
    let mut report = MigrationReport::default();
    for record in snapshot.records() {
        match remote.upsert(&record).await {
            Ok(()) => report.copied += 1,
            Err(e) => {
                log::warn!("Copying {} {} failed: {}", record.table(), record.id(), e);
                report.failed += 1;
            }
        }
    }
    log::info!("Copied {} records", report.copied);
    if report.failed > 0 {
        let _ = rolling_logger::warn(&format!("{} records could not be copied to {}", report.failed, config.url));
    }

    log::info!("[3/4] Saving sync configuration");
    save_sync_config(&state.config.db_path, &config)?;

    log::info!("[4/4] Switching the store to the hosted backend");
    state.store.set_datastore(Arc::new(remote)).await;
    state.store.fetch_all().await.map_err(|e| e.to_string())?;

    let _ = rolling_logger::info(&format!("Cloud sync configured for {}", config.url));
    Ok(report)
}

/// Saved backend settings, if any
pub async fn get_cloud_sync_config(state: &AppState) -> Result<Option<RemoteConfig>, String> {
    Ok(get_sync_config(&state.config.db_path))
}

pub async fn get_sync_status(state: &AppState) -> Result<SyncStatus, String> {
    let datastore = state.store.datastore().await;
    let url = match datastore.name() {
        "local" => None,
        _ => get_sync_config(&state.config.db_path)
            .or_else(|| state.config.remote.clone())
            .map(|c| c.url),
    };
    Ok(SyncStatus {
        datastore: datastore.name(),
        url,
        failed_writes: state.store.failed_writes(),
    })
}

/// Forget the backend and go back to the local database
pub async fn disconnect_cloud_sync(state: &AppState) -> Result<(), String> {
    clear_sync_config(&state.config.db_path)?;
    state.store.set_datastore(Arc::new(LocalDatastore::new(&state.local))).await;
    state.store.fetch_all().await.map_err(|e| e.to_string())?;
    log::info!("Cloud sync disconnected");
    Ok(())
}
