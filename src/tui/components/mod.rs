pub mod charts;
pub mod filter_form;
pub mod insight_table;
pub mod insights;
pub mod transactions;
pub mod visualization;

pub use filter_form::{FilterForm, FormOutcome};
pub use insights::InsightsView;
pub use transactions::TransactionsView;
pub use visualization::{RenderStrategy, strategy_for};
