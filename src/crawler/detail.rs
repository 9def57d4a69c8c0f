//! Detail page extraction
//!
//! Fetches one business detail page under the detail retry policy and turns
//! it into a `BusinessRecord`. A page without the mandatory name counts as a
//! failed attempt; once the budget is spent the item is skipped.

use crate::config::RetryPolicy;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::ExtractionRules;
use crate::crawler::retry::{AttemptError, RetryController};
use crate::record::{BusinessRecord, Subcategory};
use url::Url;

/// Produces records from detail pages
pub struct DetailExtractor<'a> {
    retry: RetryController<'a>,
    rules: &'a dyn ExtractionRules,
}

impl<'a> DetailExtractor<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        rules: &'a dyn ExtractionRules,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            retry: RetryController::new(fetcher, policy, "detail"),
            rules,
        }
    }

    /// Extracts the record behind `url`, or None if the item has to be skipped
    pub async fn extract(&self, subcategory: &Subcategory, url: &str) -> Option<BusinessRecord> {
        let page_url = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Skipping item with invalid URL {}: {}", url, e);
                return None;
            }
        };

        let rules = self.rules;
        let result = self
            .retry
            .fetch_with(url, |body| {
                rules
                    .detail(&body, &page_url)
                    .ok_or_else(|| AttemptError::Extraction("missing business name".to_string()))
            })
            .await;

        match result {
            Ok(fields) => {
                let record = BusinessRecord::from_fields(&subcategory.name, fields, url);
                tracing::debug!("Extracted '{}' from {}", record.name, url);
                Some(record)
            }
            Err(e) => {
                tracing::warn!("Skipping item {}: {}", url, e);
                None
            }
        }
    }
}
