//! # Pagination
//!
//! Slices an ordered sequence into fixed-size pages of
//! `QUESTIONS_PER_PAGE` items.
//!
//! - Pages are indexed from 1.
//! - Page numbers below 1 are clamped to 1.
//! - A page past the end is empty, never an error.
//! - Input order is preserved; callers supply id-ascending sequences.

use crate::primitives::{DEFAULT_PAGE, QUESTIONS_PER_PAGE};
use serde::{Deserialize, Serialize};

// =============================================================================
// PAGE NUMBER
// =============================================================================

/// A 1-based page index. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNumber(u32);

impl Default for PageNumber {
    fn default() -> Self {
        Self(DEFAULT_PAGE)
    }
}

impl PageNumber {
    /// Build a page number, clamping anything below 1 up to 1.
    #[must_use]
    pub fn new(raw: i64) -> Self {
        let clamped = raw.clamp(1, i64::from(u32::MAX));
        Self(clamped as u32)
    }

    /// Parse a raw query-string value.
    ///
    /// Absent or non-integer input yields the default page.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    /// The page number as an integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Half-open `[start, end)` positions covered by this page.
    #[must_use]
    pub fn bounds(self) -> (usize, usize) {
        let start = (self.0 as usize - 1).saturating_mul(QUESTIONS_PER_PAGE);
        (start, start.saturating_add(QUESTIONS_PER_PAGE))
    }
}

impl std::fmt::Display for PageNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// PAGINATE
// =============================================================================

/// Return the slice of `ordered` that falls on `page`.
///
/// Out-of-range bounds produce an empty slice.
#[must_use]
pub fn paginate<T>(ordered: &[T], page: PageNumber) -> &[T] {
    let (start, end) = page.bounds();
    if start >= ordered.len() {
        return &[];
    }
    &ordered[start..end.min(ordered.len())]
}

// =============================================================================
// TESTS
// =============================================================================
