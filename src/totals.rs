use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::record::PageRecord;

/// Article/comment tallies. Addition is commutative, so any page order
/// gives the same result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub total_articles: usize,
    pub total_comments: usize,
}

impl From<&PageRecord> for Totals {
    fn from(record: &PageRecord) -> Self {
        Totals {
            total_articles: record.article_count(),
            total_comments: record.comment_count(),
        }
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, other: Totals) -> Totals {
        Totals {
            total_articles: self.total_articles + other.total_articles,
            total_comments: self.total_comments + other.total_comments,
        }
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Totals {
        iter.fold(Totals::default(), Add::add)
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Articles: {}", self.total_articles)?;
        writeln!(f, "Total Comments: {}", self.total_comments)
    }
}

/// Run-wide accumulator shared by all workers.
#[derive(Debug, Default)]
pub struct RunTotals {
    articles: AtomicUsize,
    comments: AtomicUsize,
}

impl RunTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, page: &PageRecord) {
        self.articles.fetch_add(page.article_count(), Ordering::Relaxed);
        self.comments.fetch_add(page.comment_count(), Ordering::Relaxed);
    }

    /// Consumes the accumulator, so it can only be read once every worker
    /// holding a reference is done.
    pub fn into_totals(self) -> Totals {
        Totals {
            total_articles: self.articles.into_inner(),
            total_comments: self.comments.into_inner(),
        }
    }
}
