//! Record Query Engine: search, status filter, sort and pagination over
//! the analysis history, plus the stateful controller the history screen
//! drives.

pub mod query;
pub mod view;

pub use query::*;
pub use view::*;

use crate::models::AnalysisRecord;

/// Number of rows in the dashboard's recent-activity table.
pub const RECENT_ACTIVITY_LIMIT: usize = 4;

/// The `limit` most recent records, narrowed by the header search.
///
/// Records are expected in stored order (newest first); no re-sorting.
/// Only the recent window is searched, so older matches never appear.
pub fn recent_activity(
    records: &[AnalysisRecord],
    search_term: &str,
    limit: usize,
) -> Vec<AnalysisRecord> {
    let term = normalize_term(search_term);
    records
        .iter()
        .take(limit)
        .filter(|r| matches_search(r, &term))
        .cloned()
        .collect()
}
