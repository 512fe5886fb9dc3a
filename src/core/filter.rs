//! Filter criteria and pagination state for the transaction grid.
//!
//! Criteria are staged while the user edits the filter form and only take
//! effect on an explicit apply; the date-range invariant is enforced here,
//! before anything reaches the network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Transaction lifecycle states accepted by the server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Initiated,
    Success,
    Failed,
    Refunded,
}

/// Payment rails. Wire strings are fixed by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum TransactionMode {
    #[strum(serialize = "UPI")]
    #[serde(rename = "UPI")]
    Upi,
    Card,
    BankTransfer,
    Cash,
}

/// Direction of money movement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
    Refund,
}

/// Violations caught before a filter submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("from date {from} must not be after to date {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
}

/// The filter form's value. Unset fields mean "any".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub status: Option<TransactionStatus>,
    pub transaction_mode: Option<TransactionMode>,
    pub transaction_type: Option<TransactionType>,
}

impl FilterCriteria {
    /// Date-range invariant: `from <= to` when both boundaries are present.
    /// A violated range is refused here and never sent to the server.
    pub fn validate(&self) -> Result<(), FilterError> {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date)
            && from > to
        {
            return Err(FilterError::InvalidDateRange { from, to });
        }
        Ok(())
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Inclusive lower boundary as an ISO instant (start of day).
    pub fn from_instant(&self) -> Option<String> {
        self.from_date
            .map(|d| format!("{}T00:00:00", d.format("%Y-%m-%d")))
    }

    /// Inclusive upper boundary as an ISO instant (end of day).
    pub fn to_instant(&self) -> Option<String> {
        self.to_date
            .map(|d| format!("{}T23:59:59.999", d.format("%Y-%m-%d")))
    }
}

/// Fixed page-size choices offered by the grid.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 4] = [5, 10, 25, 50];

/// Zero-based page cursor plus page size.
///
/// `page` snaps back to 0 whenever the page size changes or filters are
/// (re-)applied: the result set underneath is a logically new sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page: usize,
    pub rows_per_page: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 0,
            rows_per_page: 10,
        }
    }
}

impl PaginationState {
    /// Start at page 0 with the requested page size, snapped to the nearest
    /// allowed option.
    pub fn new(rows_per_page: usize) -> Self {
        let rows_per_page = if ROWS_PER_PAGE_OPTIONS.contains(&rows_per_page) {
            rows_per_page
        } else {
            Self::default().rows_per_page
        };
        Self {
            page: 0,
            rows_per_page,
        }
    }

    /// One-based page number, as the server expects it.
    pub fn page_number(&self) -> u32 {
        self.page as u32 + 1
    }

    pub fn total_pages(&self, total_records: u64) -> usize {
        (total_records as usize).div_ceil(self.rows_per_page)
    }

    /// Advance within bounds. Returns whether the page actually changed.
    pub fn next_page(&mut self, total_records: u64) -> bool {
        if self.page + 1 < self.total_pages(total_records) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Switch to the next option in the fixed set, resetting to page 0.
    pub fn cycle_rows_per_page(&mut self) {
        let idx = ROWS_PER_PAGE_OPTIONS
            .iter()
            .position(|&n| n == self.rows_per_page)
            .unwrap_or(0);
        self.rows_per_page = ROWS_PER_PAGE_OPTIONS[(idx + 1) % ROWS_PER_PAGE_OPTIONS.len()];
        self.page = 0;
    }

    pub fn reset_page(&mut self) {
        self.page = 0;
    }
}
