use async_trait::async_trait;

use crate::error::Result;
use crate::types::NormalizedRecord;

/// External keyed record store that normalized records are written to
#[async_trait]
pub trait RecordStorePort: Send + Sync {
    /// Human-readable name for logs
    fn store_name(&self) -> &str;

    /// Probe the store once before any row is processed
    async fn check_connection(&self) -> Result<()>;

    /// Insert one record into `table`. Returns the rows the store echoed back;
    /// an empty vector means the call succeeded without confirming the write.
    async fn insert(
        &self,
        table: &str,
        record: &NormalizedRecord,
    ) -> Result<Vec<serde_json::Value>>;
}
