// Run metrics: per-row outcome counters and the Prometheus recorder that holds them

use std::path::Path;
use std::sync::{Once, OnceLock};

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

use crate::error::Result;

pub const RECORDS_TOTAL: &str = "tox_import_records_total";

static INIT: Once = Once::new();
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the process-wide Prometheus recorder.
///
/// Idempotent. Without it the counters below are recorded into the no-op
/// recorder and never seen.
pub fn init_metrics() {
    INIT.call_once(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("Prometheus handle was already stored");
            }
            info!("Prometheus recorder installed");
        }
        Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
    });
}

/// Count one finished row under `outcome="imported"` or `outcome="failed"`
pub fn record_outcome(success: bool) {
    let outcome = if success { "imported" } else { "failed" };
    counter!(RECORDS_TOTAL, "outcome" => outcome).increment(1);
}

/// Prometheus text exposition of everything recorded so far, if a recorder is installed
pub fn render() -> Option<String> {
    HANDLE.get().map(PrometheusHandle::render)
}

/// Write the current snapshot to `path` for a scraper or textfile collector to pick up.
/// Returns false when no recorder is installed.
pub fn write_snapshot(path: &Path) -> Result<bool> {
    match render() {
        Some(text) => {
            std::fs::write(path, text)?;
            info!("📈 Metrics written to {}", path.display());
            Ok(true)
        }
        None => Ok(false),
    }
}
