use crate::app::ports::RecordStorePort;
use crate::error::{ImportError, Result};
use crate::types::NormalizedRecord;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory record store for dry runs and tests.
///
/// Behaves like a table with a primary key on `id`: inserting an existing id
/// is rejected. Ids can also be configured to fail outright or to be accepted
/// without a confirmation payload.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<HashMap<String, Vec<NormalizedRecord>>>>,
    rejected_ids: HashSet<String>,
    unconfirmed_ids: HashSet<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail inserts of these ids with a publish error
    pub fn rejecting<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rejected_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Accept inserts of these ids but return no rows
    pub fn unconfirmed<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unconfirmed_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Snapshot of everything written to `table`, in insert order
    pub fn records(&self, table: &str) -> Vec<NormalizedRecord> {
        self.tables
            .lock()
            .map(|tables| tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordStorePort for InMemoryStore {
    fn store_name(&self) -> &str {
        "in-memory"
    }

    async fn check_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(
        &self,
        table: &str,
        record: &NormalizedRecord,
    ) -> Result<Vec<serde_json::Value>> {
        if self.rejected_ids.contains(&record.id) {
            return Err(ImportError::Publish(format!(
                "new row for relation \"{}\" violates check constraint (id {})",
                table, record.id
            )));
        }

        let mut tables = self
            .tables
            .lock()
            .map_err(|_| ImportError::Publish("in-memory store lock poisoned".into()))?;
        let rows = tables.entry(table.to_string()).or_default();
        if rows.iter().any(|r| r.id == record.id) {
            return Err(ImportError::Publish(format!(
                "duplicate key value violates unique constraint \"{}_pkey\"",
                table
            )));
        }
        rows.push(record.clone());
        debug!("Stored record {} in {}", record.id, table);

        if self.unconfirmed_ids.contains(&record.id) {
            return Ok(Vec::new());
        }
        Ok(vec![serde_json::to_value(record)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::process_row;
    use crate::types::RawRow;

    fn record(id: &str) -> NormalizedRecord {
        let row =
            RawRow::from_cells(0, [("TAID", id), ("Name", "Aldrin"), ("Toxicity Value", "10")]);
        process_row(&row).unwrap()
    }

    #[tokio::test]
    async fn test_insert_echoes_record() {
        let store = InMemoryStore::new();
        let rows = store.insert("t", &record("T1")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "T1");
        assert_eq!(store.records("t").len(), 1);
        assert!(store.records("other").is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = InMemoryStore::new();
        store.insert("t", &record("T1")).await.unwrap();
        let err = store.insert("t", &record("T1")).await.unwrap_err();
        assert!(err.to_string().contains("duplicate key"));
    }

    #[tokio::test]
    async fn test_configured_failures() {
        let store = InMemoryStore::new().rejecting(["BAD"]).unconfirmed(["SILENT"]);
        assert!(store.insert("t", &record("BAD")).await.is_err());
        assert!(store.insert("t", &record("SILENT")).await.unwrap().is_empty());
        assert_eq!(store.records("t").len(), 1);
    }
}
