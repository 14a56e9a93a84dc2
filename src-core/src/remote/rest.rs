//! Hosted backend client
//!
//! Talks to a PostgREST table API (`{url}/rest/v1/{table}`) such as the one
//! Supabase exposes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::RemoteConfig;
use crate::domain::{DomainError, DomainResult, Record, Snapshot, Table};
use super::Datastore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Ids per `DELETE ?id=in.(…)` request
const DELETE_BATCH: usize = 100;

pub struct RestDatastore {
    client: Client,
    base_url: String,
    anon_key: String,
    bearer: String,
}

impl RestDatastore {
    pub fn new(config: &RemoteConfig) -> DomainResult<Self> {
        if config.url.trim().is_empty() || config.anon_key.trim().is_empty() {
            return Err(DomainError::InvalidInput("backend url and anon key are required".to_string()));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            bearer: config.access_token.clone().unwrap_or_else(|| config.anon_key.clone()),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: Table) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.bearer)
    }

    async fn send(&self, what: &str, request: RequestBuilder) -> DomainResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Internal(format!("{} failed: {}", what, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DomainError::Internal(format!("{} failed: {} {}", what, status, body)))
    }

    /// Fetch all rows of a table; rows that do not parse are logged and skipped
    async fn fetch<T: DeserializeOwned>(&self, table: Table) -> DomainResult<Vec<T>> {
        let what = format!("GET {}", table);
        let response = self
            .send(&what, self.request(Method::GET, table).query(&[("select", "*")]))
            .await?;
        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| DomainError::Internal(format!("{}: invalid body: {}", what, e)))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value(row) {
                Ok(record) => out.push(record),
                Err(e) => log::warn!("Skipping malformed {} row: {}", table, e),
            }
        }
        Ok(out)
    }

    /// Cheap authenticated read used before migrating data
    pub async fn validate_connection(&self) -> DomainResult<()> {
        self.send(
            "validate connection",
            self.request(Method::GET, Table::Tags).query(&[("select", "id"), ("limit", "1")]),
        )
        .await?;
        Ok(())
    }
}

/// PostgREST filter for a set of ids
fn id_filter(ids: &[String]) -> String {
    match ids {
        [single] => format!("eq.{}", single),
        many => format!("in.({})", many.join(",")),
    }
}

#[async_trait]
impl Datastore for RestDatastore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn load(&self) -> DomainResult<Snapshot> {
        let (tasks, lists, tags, filters, notes, trash) = futures::try_join!(
            self.fetch(Table::Tasks),
            self.fetch(Table::Lists),
            self.fetch(Table::Tags),
            self.fetch(Table::Filters),
            self.fetch(Table::Notes),
            self.fetch(Table::Trash),
        )?;
        Ok(Snapshot { tasks, lists, tags, filters, notes, trash })
    }

    async fn upsert(&self, record: &Record) -> DomainResult<()> {
        let table = record.table();
        let body = record
            .to_json()
            .map_err(|e| DomainError::Internal(format!("Failed to encode {} row: {}", table, e)))?;

        self.send(
            &format!("upsert {}", table),
            self.request(Method::POST, table)
                .header("Prefer", "resolution=merge-duplicates")
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, table: Table, ids: &[String]) -> DomainResult<()> {
        // Keep each filter short enough for proxy URL limits
        for batch in ids.chunks(DELETE_BATCH) {
            self.send(
                &format!("delete {}", table),
                self.request(Method::DELETE, table).query(&[("id", id_filter(batch))]),
            )
            .await?;
        }
        Ok(())
    }

    async fn delete_by_list(&self, table: Table, list_id: &str) -> DomainResult<()> {
        self.send(
            &format!("delete {} of list", table),
            self.request(Method::DELETE, table).query(&[("listId", format!("eq.{}", list_id))]),
        )
        .await?;
        Ok(())
    }
}
