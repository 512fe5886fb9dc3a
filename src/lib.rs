pub mod config;
pub mod core;
pub mod logging;
pub mod services;
pub mod tui;

// Re-export commonly used types
pub use crate::config::Settings;
pub use crate::core::{
    FilterCriteria, PaginationState, ResultEnvelope, TransactionRecord, Visualization,
};
pub use crate::services::{ApiClient, ApiError, UserProvider};
pub use crate::tui::{Action, App, Theme};
