use std::sync::Arc;

use tracing::{debug, instrument};

use crate::app::ports::RecordStorePort;
use crate::types::{FailedRecord, NormalizedRecord, PublishOutcome};

pub const NO_DATA_RETURNED: &str = "No data returned";

/// Sends normalized records to a store, one write per record
pub struct Publisher {
    store: Arc<dyn RecordStorePort>,
    table: String,
}

impl Publisher {
    pub fn new(store: Arc<dyn RecordStorePort>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Attempt a single insert. A call that succeeds without echoing any rows
    /// is reported as a failure, since the write cannot be confirmed.
    #[instrument(skip(self, record), fields(id = %record.id))]
    pub async fn publish(&self, record: &NormalizedRecord) -> PublishOutcome {
        match self.store.insert(&self.table, record).await {
            Ok(rows) if !rows.is_empty() => {
                debug!("{} confirmed {} row(s)", self.store.store_name(), rows.len());
                PublishOutcome::Success { confirmation: rows }
            }
            Ok(_) => {
                PublishOutcome::Failure(FailedRecord::new(record.identity(), NO_DATA_RETURNED))
            }
            Err(e) => PublishOutcome::Failure(FailedRecord::new(record.identity(), e.to_string())),
        }
    }
}
