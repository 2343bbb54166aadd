use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use uuid::Uuid;

use crate::constants::FAILURE_DISPLAY_LIMIT;
use crate::types::{FailedRecord, PublishOutcome};

/// Accumulates per-record outcomes for one run
#[derive(Debug)]
pub struct RunAccountant {
    run_id: Uuid,
    table: String,
    started_at: DateTime<Utc>,
    succeeded: usize,
    failures: Vec<FailedRecord>,
}

/// Final accounting of a run. `succeeded + failed == attempted` always holds.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub table: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Every failure in input order; only the report display is truncated
    pub failures: Vec<FailedRecord>,
}

impl RunAccountant {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            table: table.into(),
            started_at: Utc::now(),
            succeeded: 0,
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: PublishOutcome) {
        match outcome {
            PublishOutcome::Success { .. } => self.succeeded += 1,
            PublishOutcome::Failure(failed) => self.failures.push(failed),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    pub fn finalize(self) -> RunSummary {
        let failed = self.failures.len();
        RunSummary {
            run_id: self.run_id,
            table: self.table,
            started_at: self.started_at,
            finished_at: Utc::now(),
            attempted: self.succeeded + failed,
            succeeded: self.succeeded,
            failed,
            failures: self.failures,
        }
    }
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Failures listed individually in the report
    pub fn displayed_failures(&self) -> &[FailedRecord] {
        let shown = self.failures.len().min(FAILURE_DISPLAY_LIMIT);
        &self.failures[..shown]
    }

    /// Failures summarized as a count beyond the display cap
    pub fn hidden_failures(&self) -> usize {
        self.failures.len().saturating_sub(FAILURE_DISPLAY_LIMIT)
    }

    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    pub fn render_report(&self) -> String {
        let rule = "=".repeat(50);
        let mut out = String::new();
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "📊 Import summary for table '{}':", self.table);
        let _ = writeln!(out, "   Total rows: {}", self.attempted);
        let _ = writeln!(out, "   ✅ Imported: {}", self.succeeded);
        let _ = writeln!(out, "   ❌ Failed: {}", self.failed);
        let _ = writeln!(out, "   Duration: {:.2}s", self.duration_secs());
        let _ = writeln!(out, "{}", rule);

        if !self.failures.is_empty() {
            let _ = writeln!(out, "\n⚠️  Failed records:");
            for failed in self.displayed_failures() {
                let _ = writeln!(out, "   - {} ({}): {}", failed.id, failed.name, failed.error);
            }
            let hidden = self.hidden_failures();
            if hidden > 0 {
                let _ = writeln!(out, "   ... and {} more failed records", hidden);
            }
        }
        out
    }
}
