//! Output module for harvest results
//!
//! This module handles:
//! - Writing the CSV dataset
//! - Recording and printing crawl statistics

mod csv_sink;
pub mod stats;

pub use csv_sink::{write_dataset, write_records, UTF8_BOM};
pub use stats::{print_statistics, CrawlSummary};
