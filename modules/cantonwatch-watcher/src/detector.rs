use cantonwatch_common::ArticleSnapshot;

use crate::keywords::is_relevant;

/// Outcome of the change-detection tests for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// New, keyword-matching article: report it and advance the stored date.
    FreshUpdate,
    /// Nothing new: send the liveness heartbeat, leave state untouched.
    Heartbeat,
}

/// Relevance and novelty tests combined: the title must contain a configured
/// keyword AND the fetched date must differ (string inequality) from the
/// stored one. Pure function of its inputs.
pub fn is_fresh(title: &str, stored_date: &str, fetched_date: &str, keywords: &[&str]) -> bool {
    is_relevant(title, keywords) && fetched_date != stored_date
}

pub fn decide(article: &ArticleSnapshot, stored_date: &str, keywords: &[&str]) -> Decision {
    if is_fresh(&article.title, stored_date, &article.date, keywords) {
        Decision::FreshUpdate
    } else {
        Decision::Heartbeat
    }
}
