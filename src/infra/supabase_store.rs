use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::debug;

use crate::app::ports::RecordStorePort;
use crate::config::StoreSettings;
use crate::error::{ImportError, Result};
use crate::types::NormalizedRecord;

/// Writes records to a Supabase table through its PostgREST endpoint
/// (`{url}/rest/v1/{table}`).
pub struct SupabaseStore {
    client: reqwest::Client,
    url: String,
    key: String,
    table: String,
}

impl SupabaseStore {
    pub fn new(settings: &StoreSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            url: settings.url.trim_end_matches('/').to_string(),
            key: settings.key.clone(),
            table: settings.table.clone(),
        })
    }

    fn table_endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    fn request(&self, method: reqwest::Method, endpoint: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, endpoint)
            .header("apikey", &self.key)
            .header(AUTHORIZATION, format!("Bearer {}", self.key))
            .header(ACCEPT, "application/json")
    }
}

#[async_trait]
impl RecordStorePort for SupabaseStore {
    fn store_name(&self) -> &str {
        "supabase"
    }

    async fn check_connection(&self) -> Result<()> {
        let endpoint = self.table_endpoint(&self.table);
        let resp = self
            .request(reqwest::Method::GET, &endpoint)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| {
                ImportError::Precondition(format!("Supabase is unreachable at {}: {}", self.url, e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ImportError::Precondition(format!(
                "Supabase connection check failed for table '{}': {}",
                self.table,
                error_message(status, &body)
            )));
        }
        debug!("Supabase connection check passed for {}", endpoint);
        Ok(())
    }

    async fn insert(
        &self,
        table: &str,
        record: &NormalizedRecord,
    ) -> Result<Vec<serde_json::Value>> {
        let endpoint = self.table_endpoint(table);
        let resp = self
            .request(reqwest::Method::POST, &endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ImportError::Publish(error_message(status, &body)));
        }
        // a body cut short after a 2xx is a transport error, not an empty confirmation
        let body = resp.text().await?;
        parse_inserted_rows(&body)
    }
}

/// Rows echoed back by `Prefer: return=representation`. An empty body is read
/// as "no rows confirmed".
fn parse_inserted_rows(body: &str) -> Result<Vec<serde_json::Value>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<serde_json::Value>(body)? {
        serde_json::Value::Array(rows) => Ok(rows),
        serde_json::Value::Null => Ok(Vec::new()),
        other => Ok(vec![other]),
    }
}

/// Prefer PostgREST's `message` (plus `details`) over the raw body
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str());
    let details = parsed
        .as_ref()
        .and_then(|v| v.get("details"))
        .and_then(|d| d.as_str());

    match (message, details) {
        (Some(m), Some(d)) => format!("{} - {} ({})", status, m, d),
        (Some(m), None) => format!("{} - {}", status, m),
        _ if body.trim().is_empty() => status.to_string(),
        _ => format!("{} - {}", status, body.trim()),
    }
}
