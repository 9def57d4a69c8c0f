//! Per-subcategory pagination
//!
//! Drives one subcategory through its listing pages:
//! 1. Build the page URL (page 1 is the subcategory URL, later pages add `?page=n`)
//! 2. Fetch it under the listing retry policy
//! 3. Extract the detail-page references
//! 4. Extract a record from every reference
//! 5. Let `CrawlState::advance` decide between the next page and done
//!
//! Only step 2 and step 4 suspend; the decision itself is pure.

use crate::config::RetryPolicy;
use crate::crawler::detail::DetailExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::ExtractionRules;
use crate::crawler::retry::RetryController;
use crate::output::CrawlSummary;
use crate::record::{BusinessRecord, Subcategory};
use crate::state::{CrawlState, PageOutcome, Step};
use crate::url::page_url;
use url::Url;

/// Walks the paginated listing of one subcategory at a time
pub struct PaginationDriver<'a> {
    listing: RetryController<'a>,
    details: DetailExtractor<'a>,
    rules: &'a dyn ExtractionRules,
    empty_streak_threshold: u32,
}

impl<'a> PaginationDriver<'a> {
    /// Creates a driver
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Fetching collaborator shared with the detail extractor
    /// * `rules` - Listing and detail extraction rules
    /// * `listing_policy` - Retry policy for listing pages
    /// * `detail_policy` - Retry policy for detail pages
    /// * `empty_streak_threshold` - Consecutive empty/failed pages ending a subcategory
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        rules: &'a dyn ExtractionRules,
        listing_policy: RetryPolicy,
        detail_policy: RetryPolicy,
        empty_streak_threshold: u32,
    ) -> Self {
        Self {
            listing: RetryController::new(fetcher, listing_policy, "listing"),
            details: DetailExtractor::new(fetcher, rules, detail_policy),
            rules,
            empty_streak_threshold,
        }
    }

    /// Crawls every page of `subcategory`, appending records in page order
    ///
    /// # Returns
    ///
    /// The state in which the subcategory finished: the last page handled and
    /// the streak that ended it.
    pub async fn crawl_subcategory(
        &self,
        subcategory: &Subcategory,
        records: &mut Vec<BusinessRecord>,
        summary: &mut CrawlSummary,
    ) -> CrawlState {
        let mut state = CrawlState::new();

        loop {
            let outcome = self
                .crawl_page(subcategory, state.page_number, records, summary)
                .await;

            match state.advance(outcome, self.empty_streak_threshold) {
                Step::Next(next) => state = next,
                Step::Done(last) => {
                    tracing::info!(
                        "{}: finished at page {} after {} consecutive empty or failed pages",
                        subcategory.name,
                        last.page_number,
                        last.consecutive_empty_or_failed
                    );
                    return last;
                }
            }
        }
    }

    /// Handles one listing page and reports what it produced
    async fn crawl_page(
        &self,
        subcategory: &Subcategory,
        page_number: u32,
        records: &mut Vec<BusinessRecord>,
        summary: &mut CrawlSummary,
    ) -> PageOutcome {
        let target = match page_url(&subcategory.url, page_number) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!("[Page {}] Cannot build page URL: {}", page_number, e);
                summary.record_page(PageOutcome::Failed);
                return PageOutcome::Failed;
            }
        };

        let body = match self.listing.fetch(&target).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("[Page {}] FAILED to load, skipping: {}", page_number, e);
                summary.record_page(PageOutcome::Failed);
                return PageOutcome::Failed;
            }
        };

        let references = match Url::parse(&target) {
            Ok(base) => self.rules.listings(&body, &base),
            Err(e) => {
                tracing::warn!("[Page {}] Cannot resolve links on {}: {}", page_number, target, e);
                Vec::new()
            }
        };

        let outcome = PageOutcome::from_listing_count(references.len());
        summary.record_page(outcome);

        if references.is_empty() {
            tracing::info!("[Page {}] 0 items found", page_number);
            return outcome;
        }

        tracing::info!("[Page {}] Listing {} items", page_number, references.len());

        for reference in &references {
            match self.details.extract(subcategory, reference).await {
                Some(record) => {
                    summary.record_item(true);
                    records.push(record);
                }
                None => summary.record_item(false),
            }
        }

        outcome
    }
}
