//! # Listing
//!
//! Shared formatting path for every question listing.
//!
//! Each endpoint states explicitly whether its listing is paginated.
//! The general listing pages its results; search and category listings
//! return the whole selection.

use crate::pagination::{PageNumber, paginate};
use crate::Question;

/// How a listing should be shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// Cut the selection down to `page`.
    pub paginate: bool,
    /// Page to serve when `paginate` is set. Ignored otherwise.
    pub page: PageNumber,
}

impl ListingOptions {
    /// Paginated listing of `page`.
    #[must_use]
    pub fn paged(page: PageNumber) -> Self {
        Self {
            paginate: true,
            page,
        }
    }

    /// Whole-selection listing.
    #[must_use]
    pub fn unpaged() -> Self {
        Self {
            paginate: false,
            page: PageNumber::default(),
        }
    }
}

/// A formatted selection of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// The questions to show, ascending by id.
    pub questions: Vec<Question>,
    /// Size of the full selection before pagination.
    pub total_questions: usize,
    /// Page served, when paginated.
    pub page: Option<PageNumber>,
}

impl Listing {
    /// True when there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Format an id-ordered selection according to `options`.
#[must_use]
pub fn format_listing(selection: Vec<Question>, options: ListingOptions) -> Listing {
    let total_questions = selection.len();
    if options.paginate {
        Listing {
            questions: paginate(&selection, options.page).to_vec(),
            total_questions,
            page: Some(options.page),
        }
    } else {
        Listing {
            questions: selection,
            total_questions,
            page: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CategoryId, NewQuestion, QuestionId};

    fn selection(n: u64) -> Vec<Question> {
        (1..=n)
            .map(|id| NewQuestion::new("q", "a", CategoryId(1), 1).with_id(QuestionId(id)))
            .collect()
    }

    #[test]
    fn paged_listing_keeps_full_total() {
        let listing = format_listing(selection(15), ListingOptions::paged(PageNumber::new(2)));
        assert_eq!(listing.questions.len(), 5);
        assert_eq!(listing.total_questions, 15);
        assert_eq!(listing.page, Some(PageNumber::new(2)));
        assert_eq!(listing.questions[0].id, QuestionId(11));
    }

    #[test]
    fn unpaged_listing_returns_everything() {
        let listing = format_listing(selection(25), ListingOptions::unpaged());
        assert_eq!(listing.questions.len(), 25);
        assert_eq!(listing.total_questions, 25);
        assert_eq!(listing.page, None);
    }

    #[test]
    fn page_past_end_is_empty_listing() {
        let listing = format_listing(selection(5), ListingOptions::paged(PageNumber::new(4)));
        assert!(listing.is_empty());
        assert_eq!(listing.total_questions, 5);
    }
}
