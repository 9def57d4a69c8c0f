//! Crawler module for directory harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` trait
//! - Bounded retries with polite delays
//! - HTML extraction rules
//! - Per-subcategory pagination
//! - Overall category coordination

mod coordinator;
mod detail;
mod fetcher;
mod pagination;
mod parser;
mod retry;
#[cfg(test)]
mod testing;

pub use coordinator::{dedup_by_url, Coordinator, CrawlReport};
pub use detail::DetailExtractor;
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use pagination::PaginationDriver;
pub use parser::{DirectoryRules, ExtractionRules};
pub use retry::{polite_delay, AttemptError, RetryController, RetryError};

use crate::config::{validate_category, Config};
use crate::output::{write_dataset, CrawlSummary};
use crate::url::category_url;
use crate::GatherError;
use std::path::Path;
use std::sync::Arc;

/// Runs a complete harvest of one category
///
/// This is the main entry point for a run. It will:
/// 1. Check the category and build the HTTP fetcher
/// 2. Discover the category's subcategories
/// 3. Crawl every subcategory's listing and detail pages
/// 4. Write the dataset to `output` (skipped when no subcategory was found)
/// 5. Shut the fetcher down, releasing its connection pool
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `category` - Root category label
/// * `output` - Destination of the CSV dataset (overwritten)
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Harvest finished and the dataset was written
/// * `Err(GatherError)` - The category is blank or yields no valid URL, the
///   client could not be built, or the dataset could not be written
pub async fn harvest(
    config: Config,
    category: &str,
    output: &Path,
) -> Result<CrawlSummary, GatherError> {
    validate_category(category)?;
    let category_page = category_url(&config.site.base_url, category)?;
    tracing::debug!("Category page: {}", category_page);

    let fetcher = Arc::new(HttpFetcher::new(&config.http)?);
    let coordinator = Coordinator::new(config, fetcher.clone(), Arc::new(DirectoryRules));

    let report = coordinator.run_report(category).await;
    drop(coordinator);
    fetcher.shutdown().await;

    if report.summary.subcategories == 0 {
        tracing::warn!("No subcategories found, nothing written");
        return Ok(report.summary);
    }

    let written = write_dataset(&report.records, output)?;
    tracing::info!("Saved {} rows to {}", written, output.display());

    Ok(report.summary)
}
