use std::str::FromStr;

use crate::models::{AnalysisRecord, SortField, SortOrder, StatusFilter};
use crate::storage::{state, KeyValueStore, StorageError};

use super::query::{query, Page, DEFAULT_PAGE_SIZE};

/// Stateful controller behind the history screen.
///
/// Owns a copy of the stored history plus the current search, filter,
/// sort and page. Every state change that can shrink the result set
/// resets to page 1.
#[derive(Debug, Clone)]
pub struct HistoryView {
    records: Vec<AnalysisRecord>,
    search_term: String,
    status_filter: StatusFilter,
    sort_field: SortField,
    sort_order: SortOrder,
    page: usize,
    page_size: usize,
}

impl HistoryView {
    /// Start from an in-memory record list: newest date first, page 1.
    pub fn new(records: Vec<AnalysisRecord>) -> Self {
        Self {
            records,
            search_term: String::new(),
            status_filter: StatusFilter::All,
            sort_field: SortField::Date,
            sort_order: SortOrder::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Load the persisted history (seeding it on first use).
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self::new(state::load_history(store))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    // ── Accessors ────────────────────────────────────────

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn sort(&self) -> (SortField, SortOrder) {
        (self.sort_field, self.sort_order)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Run the query pipeline with the current state.
    pub fn current(&self) -> Page {
        query(
            &self.records,
            &self.search_term,
            self.status_filter,
            self.sort_field,
            self.sort_order,
            self.page,
            self.page_size,
        )
    }

    // ── State transitions ────────────────────────────────

    /// Same field flips direction; a new field starts ascending.
    pub fn select_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Asc;
        }
        self.page = 1;
    }

    /// Parse an untrusted sort field; unknown values leave state untouched.
    pub fn select_sort_str(&mut self, raw: &str) -> bool {
        match SortField::from_str(raw) {
            Ok(field) => {
                self.select_sort(field);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid sort field");
                false
            }
        }
    }

    /// Set an explicit direction from untrusted input.
    pub fn set_sort_order_str(&mut self, raw: &str) -> bool {
        match SortOrder::from_str(raw) {
            Ok(order) => {
                self.sort_order = order;
                self.page = 1;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid sort order");
                false
            }
        }
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.page = 1;
    }

    /// Parse an untrusted status filter; unknown values leave state untouched.
    pub fn set_status_filter_str(&mut self, raw: &str) -> bool {
        match StatusFilter::from_str(raw) {
            Ok(filter) => {
                self.set_status_filter(filter);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid status filter");
                false
            }
        }
    }

    pub fn set_search_term(&mut self, term: &str) {
        if self.search_term != term {
            self.search_term = term.to_string();
            self.page = 1;
        }
    }

    fn last_page(&self) -> usize {
        self.current().total_pages.max(1)
    }

    /// Jump to a page, clamped into `1..=total_pages`.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.last_page());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    /// Permanently delete a record after explicit confirmation.
    ///
    /// Returns `Ok(false)` without touching anything when unconfirmed.
    /// If the current page ends up empty and is not the first, steps
    /// back one page.
    pub fn delete(
        &mut self,
        store: &dyn KeyValueStore,
        id: &str,
        confirmed: bool,
    ) -> Result<bool, StorageError> {
        if !confirmed {
            tracing::debug!(record_id = %id, "Record deletion not confirmed");
            return Ok(false);
        }

        let removed = state::delete_record(store, id)?;
        self.records.retain(|r| r.id != id);

        if self.page > 1 && self.current().is_empty() {
            self.page -= 1;
        }

        Ok(removed)
    }

    /// Reload from storage, keeping search/filter/sort but clamping the page.
    pub fn refresh(&mut self, store: &dyn KeyValueStore) {
        self.records = state::load_history(store);
        self.page = self.page.clamp(1, self.last_page());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordStatus;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};

    fn records(n: usize) -> Vec<AnalysisRecord> {
        (0..n)
            .map(|i| AnalysisRecord {
                id: format!("ANL-{}", 20_000 + i),
                date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::days(i as i64),
                patient_id: format!("PX-{}", 2_000 + i),
                drugs: vec!["WARFARIN".into()],
                status: if i % 2 == 0 { RecordStatus::Complete } else { RecordStatus::Pending },
            })
            .collect()
    }

    fn stored_view(n: usize) -> (MemoryStore, HistoryView) {
        let store = MemoryStore::new();
        state::save_history(&store, &records(n)).unwrap();
        let view = HistoryView::load(&store);
        (store, view)
    }

    #[test]
    fn initial_state_is_date_descending_page_one() {
        let view = HistoryView::new(records(3));
        assert_eq!(view.sort(), (SortField::Date, SortOrder::Desc));
        assert_eq!(view.page(), 1);
        assert_eq!(view.current().records[0].id, "ANL-20002");
    }

    #[test]
    fn reselecting_field_toggles_order() {
        let mut view = HistoryView::new(records(3));
        view.select_sort(SortField::Date);
        assert_eq!(view.sort(), (SortField::Date, SortOrder::Asc));
        view.select_sort(SortField::Date);
        assert_eq!(view.sort(), (SortField::Date, SortOrder::Desc));
    }

    #[test]
    fn new_field_starts_ascending_and_resets_page() {
        let mut view = HistoryView::new(records(12));
        view.go_to_page(3);
        assert_eq!(view.page(), 3);
        view.select_sort(SortField::PatientId);
        assert_eq!(view.sort(), (SortField::PatientId, SortOrder::Asc));
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn invalid_inputs_keep_previous_state() {
        let mut view = HistoryView::new(records(12));
        view.select_sort(SortField::Id);
        view.set_status_filter(StatusFilter::Pending);
        view.go_to_page(2);

        assert!(!view.select_sort_str("bogus"));
        assert!(!view.set_sort_order_str("up"));
        assert!(!view.set_status_filter_str("Archived"));

        assert_eq!(view.sort(), (SortField::Id, SortOrder::Asc));
        assert_eq!(view.status_filter(), StatusFilter::Pending);
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn valid_string_inputs_apply() {
        let mut view = HistoryView::new(records(4));
        assert!(view.select_sort_str("status"));
        assert!(view.set_status_filter_str("Complete"));
        assert!(view.set_sort_order_str("desc"));
        assert_eq!(view.sort(), (SortField::Status, SortOrder::Desc));
        assert_eq!(view.current().total_count, 2);
    }

    #[test]
    fn filter_and_search_reset_page() {
        let mut view = HistoryView::new(records(12));
        view.go_to_page(2);
        view.set_status_filter(StatusFilter::Complete);
        assert_eq!(view.page(), 1);

        view.go_to_page(2);
        view.set_search_term("warf");
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn paging_is_clamped() {
        let mut view = HistoryView::new(records(12));
        view.go_to_page(99);
        assert_eq!(view.page(), 3);
        view.next_page();
        assert_eq!(view.page(), 3);
        view.go_to_page(0);
        assert_eq!(view.page(), 1);
        view.prev_page();
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn unconfirmed_delete_is_noop() {
        let (store, mut view) = stored_view(3);
        assert!(!view.delete(&store, "ANL-20000", false).unwrap());
        assert_eq!(view.records().len(), 3);
        assert_eq!(state::load_history(&store).len(), 3);
    }

    #[test]
    fn confirmed_delete_persists() {
        let (store, mut view) = stored_view(3);
        assert!(view.delete(&store, "ANL-20001", true).unwrap());
        assert_eq!(view.records().len(), 2);
        let persisted = state::load_history(&store);
        assert_eq!(persisted.len(), 2);
        assert!(persisted.iter().all(|r| r.id != "ANL-20001"));
    }

    #[test]
    fn deleting_last_row_of_last_page_steps_back() {
        let (store, mut view) = stored_view(11);
        view.go_to_page(3);
        let page = view.current();
        assert_eq!(page.records.len(), 1);

        let last_id = page.records[0].id.clone();
        view.delete(&store, &last_id, true).unwrap();
        assert_eq!(view.page(), 2);
        assert_eq!(view.current().records.len(), 5);
    }

    #[test]
    fn deleting_on_first_page_stays_put() {
        let (store, mut view) = stored_view(1);
        view.delete(&store, "ANL-20000", true).unwrap();
        assert_eq!(view.page(), 1);
        assert!(view.current().is_empty());
    }

    #[test]
    fn deleting_unknown_id_reports_false() {
        let (store, mut view) = stored_view(2);
        assert!(!view.delete(&store, "ANL-99999", true).unwrap());
        assert_eq!(view.records().len(), 2);
    }
}
