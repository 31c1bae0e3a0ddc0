use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{AnalysisRecord, SortField, SortOrder, StatusFilter};

/// Rows per history page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One page of the filtered, sorted history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub records: Vec<AnalysisRecord>,
    /// Records matching search and status, across all pages.
    pub total_count: usize,
    pub total_pages: usize,
    /// 1-based page that was served (after clamping page 0).
    pub page: usize,
    pub page_size: usize,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ═══════════════════════════════════════════
// Pipeline stages
// ═══════════════════════════════════════════

/// Lower-cased, trimmed search term. Empty means "match everything".
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Case-insensitive substring match on id, patient id or any drug.
///
/// `term` must already be normalized.
pub fn matches_search(record: &AnalysisRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    record.id.to_lowercase().contains(term)
        || record.patient_id.to_lowercase().contains(term)
        || record.drugs.iter().any(|d| d.to_lowercase().contains(term))
}

/// Apply search and status filters, preserving input order.
pub fn filter_records<'a>(
    records: &'a [AnalysisRecord],
    search_term: &str,
    status: StatusFilter,
) -> Vec<&'a AnalysisRecord> {
    let term = normalize_term(search_term);
    records
        .iter()
        .filter(|r| matches_search(r, &term))
        .filter(|r| status.matches(r.status))
        .collect()
}

fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare_by(a: &AnalysisRecord, b: &AnalysisRecord, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Id => compare_case_insensitive(&a.id, &b.id),
        SortField::PatientId => compare_case_insensitive(&a.patient_id, &b.patient_id),
        SortField::Status => compare_case_insensitive(a.status.as_str(), b.status.as_str()),
    }
}

/// Stable sort: records with equal keys keep their input order in both
/// directions.
pub fn sort_records(records: &mut [&AnalysisRecord], field: SortField, order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = compare_by(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// `ceil(count / page_size)`; zero records means zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(effective_page_size(page_size))
}

fn effective_page_size(page_size: usize) -> usize {
    if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    }
}

// ═══════════════════════════════════════════
// Full query
// ═══════════════════════════════════════════

/// Filter, sort and paginate in one pure pass.
///
/// `page` is 1-based; 0 is treated as 1. Pages past the end come back
/// empty with the real totals.
pub fn query(
    records: &[AnalysisRecord],
    search_term: &str,
    status: StatusFilter,
    sort_field: SortField,
    sort_order: SortOrder,
    page: usize,
    page_size: usize,
) -> Page {
    let page_size = effective_page_size(page_size);
    let page = page.max(1);

    let mut filtered = filter_records(records, search_term, status);
    sort_records(&mut filtered, sort_field, sort_order);

    let total_count = filtered.len();
    let start = (page - 1).saturating_mul(page_size);
    let rows = filtered
        .into_iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    Page {
        records: rows,
        total_count,
        total_pages: total_pages(total_count, page_size),
        page,
        page_size,
    }
}
