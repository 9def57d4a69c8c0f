//! Crawler coordinator - category-level orchestration
//!
//! This module contains the top-level crawl for one root category:
//! - Discovering and deduplicating subcategories
//! - Running the pagination driver for each subcategory in turn
//! - Accumulating records and statistics for the whole run

use crate::config::Config;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::pagination::PaginationDriver;
use crate::crawler::parser::ExtractionRules;
use crate::output::CrawlSummary;
use crate::record::{BusinessRecord, Subcategory};
use crate::url::category_url;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Records and statistics produced by one category run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Records in subcategory, page, then listing order
    pub records: Vec<BusinessRecord>,

    pub summary: CrawlSummary,
}

/// Main crawler coordinator structure
///
/// Owns handles to the fetching collaborator and the extraction rules; both
/// are constructed by the caller and outlive the coordinator.
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Arc<dyn PageFetcher>,
    rules: Arc<dyn ExtractionRules>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    /// * `fetcher` - The fetching collaborator used for every request
    /// * `rules` - The extraction rules for the target directory
    pub fn new(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        rules: Arc<dyn ExtractionRules>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            rules,
        }
    }

    /// Resolves the subcategories of a root category
    ///
    /// Makes a single fetch of the category page (no retries). A failed fetch
    /// is logged and yields an empty list. Subcategories are deduplicated by
    /// URL, keeping the first occurrence.
    pub async fn discover_subcategories(&self, category: &str) -> Vec<Subcategory> {
        let url = match category_url(&self.config.site.base_url, category) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Cannot build category URL for '{}': {}", category, e);
                return Vec::new();
            }
        };

        tracing::info!("Getting subcategories from {}", url);

        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Error fetching category page: {}", e);
                return Vec::new();
            }
        };

        let found = match Url::parse(&url) {
            Ok(base) => self.rules.subcategories(&body, &base),
            Err(e) => {
                tracing::error!("Cannot resolve links on {}: {}", url, e);
                Vec::new()
            }
        };

        let subcategories = dedup_by_url(found);
        tracing::info!("Found {} subcategories", subcategories.len());
        subcategories
    }

    /// Crawls a root category and returns every extracted record
    pub async fn run(&self, category: &str) -> Vec<BusinessRecord> {
        self.run_report(category).await.records
    }

    /// Crawls a root category, returning records and run statistics
    ///
    /// Subcategories are crawled sequentially in discovery order. No page or
    /// item failure aborts the run.
    pub async fn run_report(&self, category: &str) -> CrawlReport {
        let mut summary = CrawlSummary::new(category);
        let mut records = Vec::new();

        let subcategories = self.discover_subcategories(category).await;
        summary.subcategories = subcategories.len() as u64;

        if subcategories.is_empty() {
            tracing::info!("No subcategories found for '{}'", category);
            summary.finish();
            return CrawlReport { records, summary };
        }

        tracing::info!(
            "Starting crawl of {} subcategories of '{}'",
            subcategories.len(),
            category
        );

        let driver = PaginationDriver::new(
            self.fetcher.as_ref(),
            self.rules.as_ref(),
            self.config.listing.retry_policy(),
            self.config.detail.retry_policy(),
            self.config.listing.empty_streak_threshold,
        );

        for (index, subcategory) in subcategories.iter().enumerate() {
            tracing::info!(
                "[{}/{}] Subcategory: {}",
                index + 1,
                subcategories.len(),
                subcategory.name
            );

            let before = records.len();
            driver
                .crawl_subcategory(subcategory, &mut records, &mut summary)
                .await;
            summary.subcategories_completed += 1;

            tracing::info!(
                "[{}/{}] {}: {} records ({} total)",
                index + 1,
                subcategories.len(),
                subcategory.name,
                records.len() - before,
                records.len()
            );
        }

        summary.finish();
        CrawlReport { records, summary }
    }
}

/// Removes repeated subcategory URLs, keeping the first occurrence
pub fn dedup_by_url(subcategories: Vec<Subcategory>) -> Vec<Subcategory> {
    let mut seen = HashSet::new();
    subcategories
        .into_iter()
        .filter(|subcategory| seen.insert(subcategory.url.clone()))
        .collect()
}
