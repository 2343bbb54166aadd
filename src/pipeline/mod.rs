// Import pipeline: ingestion, processing, publishing and run accounting

pub mod accountant;
pub mod ingestion;
pub mod processing;
pub mod publish;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::app::ports::RecordStorePort;
use crate::constants::PROGRESS_EVERY;
use crate::error::{ImportError, Result};
use crate::observability;
use crate::types::{FailedRecord, PublishOutcome, RawRow, RowIdentity};

pub use accountant::{RunAccountant, RunSummary};
pub use publish::Publisher;

/// Run `process` over every unit in order, awaiting each before starting the next.
///
/// A unit that errors is turned into an ordinary output by `on_error`, so one
/// failing unit never stops the sequence. Every output reaches `sink`.
pub async fn process_each<T, O, E, I, F, Fut, H, S>(
    units: I,
    mut process: F,
    mut on_error: H,
    mut sink: S,
) where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = std::result::Result<O, E>>,
    H: FnMut(E) -> O,
    S: FnMut(O),
{
    for unit in units {
        let output = match process(unit).await {
            Ok(output) => output,
            Err(e) => on_error(e),
        };
        sink(output);
    }
}

/// An error raised while importing one row, tagged with what could be recovered of its identity
#[derive(Debug)]
pub struct RowFailure {
    pub index: usize,
    pub identity: RowIdentity,
    pub error: ImportError,
}

impl From<RowFailure> for FailedRecord {
    fn from(failure: RowFailure) -> Self {
        FailedRecord::new(failure.identity, failure.error.to_string())
    }
}

/// Drives rows through normalize → build → publish → account
pub struct Pipeline {
    store: Arc<dyn RecordStorePort>,
    publisher: Publisher,
}

impl Pipeline {
    pub fn new(store: Arc<dyn RecordStorePort>, table: impl Into<String>) -> Self {
        let publisher = Publisher::new(store.clone(), table);
        Self { store, publisher }
    }

    /// Confirm the store is reachable before any row is processed
    pub async fn preflight(&self) -> Result<()> {
        info!("🔗 Connecting to {}...", self.store.store_name());
        self.store.check_connection().await?;
        info!("✅ {} connection ok", self.store.store_name());
        Ok(())
    }

    /// Import every row in order. Never fails as a whole: each row ends up
    /// counted as either imported or failed.
    #[instrument(
        skip_all,
        fields(table = %self.publisher.table(), store = %self.store.store_name())
    )]
    pub async fn run(&self, rows: Vec<Result<RawRow>>) -> RunSummary {
        let total = rows.len();
        info!("🔄 Importing {} rows...", total);
        println!("🔄 Importing {} rows...", total);

        let mut accountant = RunAccountant::new(self.publisher.table());

        process_each(
            rows.into_iter().enumerate(),
            |(index, row): (usize, Result<RawRow>)| self.import_row(index, row),
            |failure: RowFailure| {
                warn!("⚠️  Import failed (row {}): {}", failure.index, failure.error);
                PublishOutcome::Failure(failure.into())
            },
            |outcome: PublishOutcome| {
                let success = outcome.is_success();
                if let PublishOutcome::Failure(ref failed) = outcome {
                    debug!("Row {} ({}) failed: {}", failed.id, failed.name, failed.error);
                }
                observability::record_outcome(success);
                accountant.record(outcome);

                if success && accountant.succeeded() % PROGRESS_EVERY == 0 {
                    info!("Imported {}/{}", accountant.succeeded(), total);
                    println!("   Imported: {}/{}", accountant.succeeded(), total);
                }
            },
        )
        .await;

        let summary = accountant.finalize();
        info!(
            run_id = %summary.run_id,
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Import finished"
        );
        summary
    }

    async fn import_row(
        &self,
        index: usize,
        row: Result<RawRow>,
    ) -> std::result::Result<PublishOutcome, RowFailure> {
        let row = row.map_err(|error| RowFailure {
            index,
            identity: RowIdentity::unknown(),
            error,
        })?;
        let record = processing::process_row(&row).map_err(|error| RowFailure {
            index,
            identity: row.identity(),
            error,
        })?;
        Ok(self.publisher.publish(&record).await)
    }
}
