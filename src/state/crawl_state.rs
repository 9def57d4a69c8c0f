//! Pagination state for a single subcategory
//!
//! The state is a plain value: every listing page produces a `PageOutcome`,
//! and `CrawlState::advance` turns the current state and that outcome into the
//! next `Step`. Keeping the decision free of I/O lets the fetch call be the
//! only suspension point of the pagination loop.

use std::fmt;

/// Consecutive empty or failed pages after which a subcategory is finished
pub const DEFAULT_EMPTY_STREAK_THRESHOLD: u32 = 3;

/// Result of fetching and extracting one listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// The page could not be fetched within the retry budget
    Failed,

    /// The page loaded but contained no listing references
    Empty,

    /// The page yielded this many listing references (always >= 1)
    Listed(usize),
}

impl PageOutcome {
    /// Classifies an extracted listing count
    pub fn from_listing_count(count: usize) -> Self {
        if count == 0 {
            Self::Empty
        } else {
            Self::Listed(count)
        }
    }

    /// Returns true if this outcome extends the empty streak
    pub fn is_empty_or_failed(&self) -> bool {
        matches!(self, Self::Failed | Self::Empty)
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed => write!(f, "failed"),
            Self::Empty => write!(f, "empty"),
            Self::Listed(count) => write!(f, "{} listings", count),
        }
    }
}

/// Pagination decision taken after a page has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Fetch the next page with this state
    Next(CrawlState),

    /// The streak reached the threshold; the subcategory is finished
    Done(CrawlState),
}

impl Step {
    /// Returns the state carried by either variant
    pub fn state(&self) -> CrawlState {
        match self {
            Self::Next(state) | Self::Done(state) => *state,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Page cursor and empty/failed streak of one subcategory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlState {
    /// 1-based page number of the page about to be (or just) handled
    pub page_number: u32,

    /// Consecutive pages that failed to load or listed nothing
    pub consecutive_empty_or_failed: u32,
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlState {
    /// Initial state: page 1, no streak
    pub fn new() -> Self {
        Self {
            page_number: 1,
            consecutive_empty_or_failed: 0,
        }
    }

    /// Applies the outcome of the current page
    ///
    /// A failed or empty page extends the streak and finishes the subcategory
    /// once the streak reaches `threshold`; a page with listings resets it.
    /// In every non-final case the page number moves forward by one. A
    /// threshold of 0 is treated as 1.
    pub fn advance(self, outcome: PageOutcome, threshold: u32) -> Step {
        let threshold = threshold.max(1);

        match outcome {
            PageOutcome::Failed | PageOutcome::Empty => {
                let streak = self.consecutive_empty_or_failed.saturating_add(1);
                let state = Self {
                    page_number: self.page_number,
                    consecutive_empty_or_failed: streak,
                };
                if streak >= threshold {
                    Step::Done(state)
                } else {
                    Step::Next(state.next_page())
                }
            }
            PageOutcome::Listed(_) => Step::Next(
                Self {
                    page_number: self.page_number,
                    consecutive_empty_or_failed: 0,
                }
                .next_page(),
            ),
        }
    }

    fn next_page(self) -> Self {
        Self {
            page_number: self.page_number.saturating_add(1),
            ..self
        }
    }
}
