pub mod filter;
pub mod format;
pub mod models;
pub mod table;

pub use filter::{FilterCriteria, FilterError, PaginationState};
pub use models::{ResultEnvelope, TransactionPage, TransactionRecord, UserProfile, Visualization};
pub use table::{CellValue, ColumnType, SortState, TableData};
