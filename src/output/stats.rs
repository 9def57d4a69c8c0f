//! Crawl statistics
//!
//! Counts what a run did so callers get a machine-readable account of failed
//! pages and skipped items next to the dataset.

use crate::state::PageOutcome;
use chrono::{DateTime, Utc};

/// Summary statistics for one category run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Root category label
    pub category: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Subcategories discovered (after deduplication)
    pub subcategories: u64,

    /// Subcategories whose pagination ran to completion
    pub subcategories_completed: u64,

    /// Listing pages with at least one listing
    pub pages_listed: u64,

    /// Listing pages that loaded but listed nothing
    pub pages_empty: u64,

    /// Listing pages that could not be loaded within the retry budget
    pub pages_failed: u64,

    /// Detail pages turned into records
    pub items_extracted: u64,

    /// Detail pages skipped after exhausting the retry budget
    pub items_skipped: u64,
}

impl CrawlSummary {
    /// Creates an empty summary stamped with the current time
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            subcategories: 0,
            subcategories_completed: 0,
            pages_listed: 0,
            pages_empty: 0,
            pages_failed: 0,
            items_extracted: 0,
            items_skipped: 0,
        }
    }

    /// Counts one listing page
    pub fn record_page(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Failed => self.pages_failed += 1,
            PageOutcome::Empty => self.pages_empty += 1,
            PageOutcome::Listed(_) => self.pages_listed += 1,
        }
    }

    /// Counts one detail page
    pub fn record_item(&mut self, extracted: bool) {
        if extracted {
            self.items_extracted += 1;
        } else {
            self.items_skipped += 1;
        }
    }

    /// Marks the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total_pages(&self) -> u64 {
        self.pages_listed + self.pages_empty + self.pages_failed
    }

    /// Run duration, if the run has finished
    pub fn duration_seconds(&self) -> Option<u64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds().max(0) as u64)
    }

    /// Share of attempted detail pages that produced a record, in percent
    pub fn success_rate(&self) -> f64 {
        let attempted = self.items_extracted + self.items_skipped;
        if attempted == 0 {
            return 0.0;
        }
        (self.items_extracted as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(summary: &CrawlSummary) {
    println!("=== Harvest Statistics: {} ===\n", summary.category);

    println!("Run:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = summary.duration_seconds() {
        println!(
            "  Duration: {} seconds ({:.2} minutes)",
            duration,
            duration as f64 / 60.0
        );
    }
    println!();

    println!("Subcategories:");
    println!("  Discovered: {}", summary.subcategories);
    println!("  Completed: {}", summary.subcategories_completed);
    println!();

    println!("Listing Pages ({}):", summary.total_pages());
    println!("  With listings: {}", summary.pages_listed);
    println!("  Empty: {}", summary.pages_empty);
    println!("  Failed: {}", summary.pages_failed);
    println!();

    println!("Items:");
    println!("  Extracted: {}", summary.items_extracted);
    println!("  Skipped: {}", summary.items_skipped);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} detail pages extracted)",
        summary.success_rate(),
        summary.items_extracted,
        summary.items_extracted + summary.items_skipped
    );
}
