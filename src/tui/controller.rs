//! State controllers for the two remote-backed views.
//!
//! Controllers are runtime-free state machines: every state-affecting user
//! action either mutates local state, or returns a fetch spec for the app
//! layer to run on the async runtime. Completions come back through
//! `apply_response` carrying the sequence token of the request they answer;
//! a token older than the newest issued one is discarded, so a slow response
//! can never overwrite a fresher page.

use tracing::{debug, warn};

use crate::core::filter::{FilterCriteria, FilterError, PaginationState};
use crate::core::models::{ResultEnvelope, TransactionPage, TransactionRecord};
use crate::services::api_client::TransactionsRequest;

/// A transactions fetch the app layer should execute.
#[derive(Debug, Clone)]
pub struct FetchSpec {
    pub seq: u64,
    pub request: TransactionsRequest,
}

/// An insight query the app layer should execute.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub seq: u64,
    pub session_id: String,
    pub query: String,
}

/// Owns the transaction grid's remote-synchronized state.
///
/// States are *idle* and *fetching*; a failed fetch returns to idle with the
/// previous page slice intact and an error flag set. Each successful response
/// replaces the slice and total count wholesale.
#[derive(Debug, Default)]
pub struct TransactionsController {
    user_id: Option<String>,
    pagination: PaginationState,
    staged: FilterCriteria,
    applied: FilterCriteria,
    items: Vec<TransactionRecord>,
    total_records: u64,
    loading: bool,
    error: Option<String>,
    seq: u64,
}

impl TransactionsController {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            pagination: PaginationState::new(rows_per_page),
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[TransactionRecord] {
        &self.items
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn staged(&self) -> &FilterCriteria {
        &self.staged
    }

    pub fn applied(&self) -> &FilterCriteria {
        &self.applied
    }

    /// Bump the token and describe the fetch for the current state. `None`
    /// until a user identity is available.
    fn issue(&mut self) -> Option<FetchSpec> {
        let user_id = self.user_id.clone()?;
        self.seq += 1;
        self.loading = true;
        self.error = None;
        debug!(seq = self.seq, page = self.pagination.page_number(), "issuing transactions fetch");
        Some(FetchSpec {
            seq: self.seq,
            request: TransactionsRequest::new(
                self.pagination.page_number(),
                self.pagination.rows_per_page as u32,
                user_id,
                &self.applied,
            ),
        })
    }

    /// The identity became available or changed: drop the held result set and
    /// fetch the first page under the current page size and filters.
    pub fn set_user(&mut self, user_id: Option<String>) -> Option<FetchSpec> {
        if self.user_id == user_id {
            return None;
        }
        self.user_id = user_id;
        self.items.clear();
        self.total_records = 0;
        self.pagination.reset_page();
        self.issue()
    }

    /// Re-run the current request (retry after an error, manual refresh).
    pub fn refresh(&mut self) -> Option<FetchSpec> {
        self.issue()
    }

    pub fn next_page(&mut self) -> Option<FetchSpec> {
        self.pagination.next_page(self.total_records).then(|| self.issue())?
    }

    pub fn prev_page(&mut self) -> Option<FetchSpec> {
        self.pagination.prev_page().then(|| self.issue())?
    }

    /// Switch to the next page-size option; the page resets to 0 because the
    /// result set under a new page size is a logically new sequence.
    pub fn cycle_rows_per_page(&mut self) -> Option<FetchSpec> {
        self.pagination.cycle_rows_per_page();
        self.issue()
    }

    /// Apply edited criteria. An invalid range refuses the transition (no
    /// state change, no fetch) and surfaces the reason to the form.
    pub fn apply_filters(
        &mut self,
        criteria: FilterCriteria,
    ) -> Result<Option<FetchSpec>, FilterError> {
        criteria.validate()?;
        self.staged = criteria.clone();
        self.applied = criteria;
        self.pagination.reset_page();
        Ok(self.issue())
    }

    /// Restore default staged criteria. Deliberately does not fetch: the
    /// applied criteria (and the data on screen) change only on the next
    /// explicit apply.
    pub fn reset_filters(&mut self) {
        self.staged = FilterCriteria::default();
    }

    pub fn stage(&mut self, criteria: FilterCriteria) {
        self.staged = criteria;
    }

    /// Fold a fetch completion into the state. Returns false when the
    /// response was stale (a newer request has been issued since) and was
    /// discarded.
    pub fn apply_response(
        &mut self,
        seq: u64,
        result: Result<TransactionPage, String>,
    ) -> bool {
        if seq != self.seq {
            debug!(seq, newest = self.seq, "discarding stale transactions response");
            return false;
        }
        // Whatever the outcome, the fetching state ends here.
        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.items;
                self.total_records = page.total_records;
                self.error = None;
            }
            Err(message) => {
                // Keep the stale-but-valid slice on screen.
                warn!(%message, "transactions fetch failed");
                self.error = Some(message);
            }
        }
        true
    }
}

/// Owns the insight view's remote-synchronized state: one envelope at a
/// time, replaced wholesale per submitted query.
#[derive(Debug, Default)]
pub struct InsightsController {
    envelope: Option<ResultEnvelope>,
    last_query: Option<String>,
    loading: bool,
    error: Option<String>,
    seq: u64,
}

impl InsightsController {
    pub fn envelope(&self) -> Option<&ResultEnvelope> {
        self.envelope.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Submit a query for the active identity. Blank queries are refused.
    pub fn submit(&mut self, query: &str, session_id: &str) -> Option<QuerySpec> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.seq += 1;
        self.loading = true;
        self.error = None;
        self.last_query = Some(query.to_string());
        Some(QuerySpec {
            seq: self.seq,
            session_id: session_id.to_string(),
            query: query.to_string(),
        })
    }

    /// The identity changed: the held envelope no longer describes this
    /// user's data. Re-submit the last query when there is one.
    pub fn on_user_changed(&mut self, session_id: &str) -> Option<QuerySpec> {
        self.envelope = None;
        self.error = None;
        match self.last_query.clone() {
            Some(query) => self.submit(&query, session_id),
            None => None,
        }
    }

    /// "Try another prompt": back to the input, envelope discarded.
    pub fn clear(&mut self) {
        self.envelope = None;
        self.error = None;
    }

    pub fn apply_response(&mut self, seq: u64, result: Result<ResultEnvelope, String>) -> bool {
        if seq != self.seq {
            debug!(seq, newest = self.seq, "discarding stale insights response");
            return false;
        }
        self.loading = false;
        match result {
            Ok(envelope) => {
                self.envelope = Some(envelope);
                self.error = None;
            }
            Err(message) => {
                warn!(%message, "insight query failed");
                self.error = Some(message);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::TransactionStatus;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn page(ids: &[&str], total: u64) -> TransactionPage {
        TransactionPage {
            items: ids
                .iter()
                .map(|id| TransactionRecord {
                    transaction_id: id.to_string(),
                    ..Default::default()
                })
                .collect(),
            total_records: total,
            ..Default::default()
        }
    }

    fn ready_controller() -> TransactionsController {
        let mut controller = TransactionsController::new(10);
        let spec = controller.set_user(Some("user-1".into())).unwrap();
        controller.apply_response(spec.seq, Ok(page(&["a", "b"], 57)));
        controller
    }

    #[test]
    fn test_no_fetch_without_identity() {
        let mut controller = TransactionsController::new(10);
        assert!(controller.refresh().is_none());
        assert!(controller.cycle_rows_per_page().is_none());
        assert!(controller.set_user(None).is_none());
    }

    #[test]
    fn test_initial_fetch_uses_defaults() {
        let mut controller = TransactionsController::new(10);
        let spec = controller.set_user(Some("user-1".into())).unwrap();
        assert_eq!(spec.request.page_number, 1);
        assert_eq!(spec.request.page_size, 10);
        assert_eq!(spec.request.user_id, "user-1");
        assert!(spec.request.status.is_none());
        assert!(controller.loading());
    }

    #[test]
    fn test_success_replaces_slice_wholesale() {
        let mut controller = ready_controller();
        assert_eq!(controller.items().len(), 2);
        assert_eq!(controller.total_records(), 57);

        let spec = controller.next_page().unwrap();
        assert!(controller.apply_response(spec.seq, Ok(page(&["c"], 57))));
        // Replaced, not appended.
        assert_eq!(controller.items().len(), 1);
        assert_eq!(controller.items()[0].transaction_id, "c");
        assert!(!controller.loading());
    }

    #[test]
    fn test_page_change_keeps_filters_and_is_one_based() {
        let mut controller = ready_controller();
        let criteria = FilterCriteria {
            status: Some(TransactionStatus::Success),
            ..Default::default()
        };
        let spec = controller.apply_filters(criteria).unwrap().unwrap();
        controller.apply_response(spec.seq, Ok(page(&["a"], 30)));

        let spec = controller.next_page().unwrap();
        assert_eq!(spec.request.page_number, 2);
        assert_eq!(spec.request.status, Some(TransactionStatus::Success));
    }

    #[test]
    fn test_rows_per_page_change_resets_page() {
        let mut controller = ready_controller();
        let spec = controller.next_page().unwrap();
        controller.apply_response(spec.seq, Ok(page(&["c"], 57)));
        assert_eq!(controller.pagination().page, 1);

        let spec = controller.cycle_rows_per_page().unwrap();
        assert_eq!(controller.pagination().page, 0);
        assert_eq!(spec.request.page_number, 1);
        assert_eq!(spec.request.page_size, 25);
    }

    #[test]
    fn test_filter_apply_resets_page() {
        let mut controller = ready_controller();
        let spec = controller.next_page().unwrap();
        controller.apply_response(spec.seq, Ok(page(&["c"], 57)));
        assert_eq!(controller.pagination().page, 1);

        let spec = controller
            .apply_filters(FilterCriteria::default())
            .unwrap()
            .unwrap();
        assert_eq!(controller.pagination().page, 0);
        assert_eq!(spec.request.page_number, 1);
        // Page size survives the filter apply.
        assert_eq!(spec.request.page_size, 10);
    }

    #[test]
    fn test_invalid_range_refuses_transition() {
        let mut controller = ready_controller();
        let before_seq = controller.seq;
        let criteria = FilterCriteria {
            from_date: NaiveDate::from_ymd_opt(2025, 9, 10),
            to_date: NaiveDate::from_ymd_opt(2025, 9, 1),
            ..Default::default()
        };
        let result = controller.apply_filters(criteria);
        assert!(matches!(result, Err(FilterError::InvalidDateRange { .. })));
        // No fetch was dispatched and nothing was applied.
        assert_eq!(controller.seq, before_seq);
        assert!(controller.applied().is_default());
        assert!(!controller.loading());
    }

    #[test]
    fn test_reset_filters_does_not_fetch() {
        let mut controller = ready_controller();
        controller.stage(FilterCriteria {
            status: Some(TransactionStatus::Failed),
            ..Default::default()
        });
        let before_seq = controller.seq;
        controller.reset_filters();
        assert!(controller.staged().is_default());
        assert_eq!(controller.seq, before_seq);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut controller = ready_controller();
        // Fetch A (slow), then fetch B (fast).
        let a = controller.cycle_rows_per_page().unwrap();
        let b = controller.cycle_rows_per_page().unwrap();

        // B resolves first and wins.
        assert!(controller.apply_response(b.seq, Ok(page(&["newest"], 57))));
        assert_eq!(controller.items()[0].transaction_id, "newest");
        assert!(!controller.loading());

        // A resolves later and must not overwrite B's result.
        assert!(!controller.apply_response(a.seq, Ok(page(&["older"], 57))));
        assert_eq!(controller.items()[0].transaction_id, "newest");
    }

    #[test]
    fn test_error_retains_stale_data_and_clears_loading() {
        let mut controller = ready_controller();
        let spec = controller.refresh().unwrap();
        assert!(controller.loading());

        assert!(controller.apply_response(spec.seq, Err("connection refused".into())));
        assert!(!controller.loading());
        assert_eq!(controller.error(), Some("connection refused"));
        // Previous slice still visible.
        assert_eq!(controller.items().len(), 2);

        // Retrying the same action clears the error flag.
        let spec = controller.refresh().unwrap();
        assert!(controller.error().is_none());
        controller.apply_response(spec.seq, Ok(page(&["a", "b"], 57)));
        assert!(controller.error().is_none());
    }

    #[test]
    fn test_user_switch_invalidates_and_refetches() {
        let mut controller = ready_controller();
        let spec = controller.next_page().unwrap();
        controller.apply_response(spec.seq, Ok(page(&["c"], 57)));

        let spec = controller.set_user(Some("user-2".into())).unwrap();
        assert!(controller.items().is_empty());
        assert_eq!(controller.total_records(), 0);
        assert_eq!(spec.request.page_number, 1);
        assert_eq!(spec.request.user_id, "user-2");

        // Same identity again: nothing to do.
        assert!(controller.set_user(Some("user-2".into())).is_none());
    }

    #[test]
    fn test_page_reset_invariant_across_action_sequences() {
        // For any sequence of actions, a rows-per-page change or filter
        // apply leaves page == 0 immediately after.
        let mut controller = ready_controller();
        for step in 0..6 {
            let spec = match step % 3 {
                0 => controller.next_page(),
                1 => controller.cycle_rows_per_page(),
                _ => controller.apply_filters(FilterCriteria::default()).unwrap(),
            };
            if let Some(spec) = spec {
                controller.apply_response(spec.seq, Ok(page(&["x"], 500)));
            }
            if step % 3 != 0 {
                assert_eq!(controller.pagination().page, 0, "after step {step}");
            }
        }
    }

    #[test]
    fn test_insights_submit_and_replace() {
        let mut insights = InsightsController::default();
        assert!(insights.submit("   ", "u").is_none());

        let spec = insights.submit("Top spends", "user-1").unwrap();
        assert_eq!(spec.query, "Top spends");
        assert_eq!(spec.session_id, "user-1");
        assert!(insights.loading());

        let envelope = ResultEnvelope {
            query: "Top spends".into(),
            ..Default::default()
        };
        assert!(insights.apply_response(spec.seq, Ok(envelope)));
        assert!(!insights.loading());
        assert_eq!(insights.envelope().unwrap().query, "Top spends");
    }

    #[test]
    fn test_insights_stale_query_discarded() {
        let mut insights = InsightsController::default();
        let a = insights.submit("first", "u").unwrap();
        let b = insights.submit("second", "u").unwrap();

        assert!(insights.apply_response(b.seq, Ok(ResultEnvelope {
            query: "second".into(),
            ..Default::default()
        })));
        assert!(!insights.apply_response(a.seq, Ok(ResultEnvelope {
            query: "first".into(),
            ..Default::default()
        })));
        assert_eq!(insights.envelope().unwrap().query, "second");
    }

    #[test]
    fn test_insights_error_keeps_last_envelope() {
        let mut insights = InsightsController::default();
        let spec = insights.submit("first", "u").unwrap();
        insights.apply_response(spec.seq, Ok(ResultEnvelope::default()));

        let spec = insights.submit("second", "u").unwrap();
        insights.apply_response(spec.seq, Err("boom".into()));
        assert_eq!(insights.error(), Some("boom"));
        assert!(insights.envelope().is_some());
        assert!(!insights.loading());
    }

    #[test]
    fn test_insights_user_change_resubmits_last_query() {
        let mut insights = InsightsController::default();
        assert!(insights.on_user_changed("user-2").is_none());

        let spec = insights.submit("Top spends", "user-1").unwrap();
        insights.apply_response(spec.seq, Ok(ResultEnvelope::default()));

        let spec = insights.on_user_changed("user-2").unwrap();
        assert_eq!(spec.session_id, "user-2");
        assert_eq!(spec.query, "Top spends");
        assert!(insights.envelope().is_none());
    }
}
