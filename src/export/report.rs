// src/export/report.rs
//! The outcome of one export run.

use super::listing::{DatabaseHandle, ListingGap};
use crate::error::PageFailure;
use crate::types::PageId;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    pub page_id: PageId,
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPage {
    pub page_id: PageId,
    pub failure: PageFailure,
}

/// How a run that did not abort went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every listed page was written and the listing was complete.
    Complete,
    /// Something was left out: skipped pages, a listing gap, or cancellation.
    CompletedWithSkips,
}

/// Aggregated results of `Exporter::export`.
///
/// `written` and `skipped` follow the listing order, not completion order.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub database: DatabaseHandle,
    pub listed: usize,
    pub written: Vec<WrittenPage>,
    pub skipped: Vec<SkippedPage>,
    pub gap: Option<ListingGap>,
    /// Pages never started because the run was cancelled.
    pub cancelled: Vec<PageId>,
    pub duration: Duration,
}

impl ExportReport {
    pub fn outcome(&self) -> RunOutcome {
        if self.skipped.is_empty() && self.gap.is_none() && self.cancelled.is_empty() {
            RunOutcome::Complete
        } else {
            RunOutcome::CompletedWithSkips
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.written.iter().map(|page| page.bytes).sum()
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Exported {}/{} pages of '{}' ({} bytes) in {:.1}s",
            self.written.len(),
            self.listed,
            self.database.title,
            self.bytes_written(),
            self.duration.as_secs_f64()
        )?;
        for skipped in &self.skipped {
            writeln!(
                f,
                "  skipped {} [{}]: {}",
                skipped.page_id,
                skipped.failure.kind(),
                skipped.failure
            )?;
        }
        if let Some(gap) = &self.gap {
            writeln!(f, "  incomplete listing: {}", gap)?;
        }
        if !self.cancelled.is_empty() {
            writeln!(f, "  cancelled before start: {} pages", self.cancelled.len())?;
        }
        Ok(())
    }
}
