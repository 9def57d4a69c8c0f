//! State module for tracking crawl progress
//!
//! This module provides the per-subcategory pagination state and the
//! transition function that decides when a subcategory is exhausted.
//!
//! # Components
//!
//! - `CrawlState`: Current page number and empty/failed streak of one subcategory
//! - `PageOutcome`: What fetching and extracting a listing page produced
//! - `Step`: The pagination decision taken after each page

mod crawl_state;

// Re-export main types
pub use crawl_state::{CrawlState, PageOutcome, Step, DEFAULT_EMPTY_STREAK_THRESHOLD};
