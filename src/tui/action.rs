use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::models::{ResultEnvelope, TransactionPage, UserProfile};

/// High-level actions flowing through the app: key-driven commands plus
/// completions posted back by spawned fetch tasks.
#[derive(Debug, Clone, PartialEq, Display, Serialize, Deserialize)]
pub enum Action {
    // Runtime
    Quit,
    Error(String),

    // Navigation within the focused view
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    GoToTop,
    GoToBottom,

    // Application-wide
    NextTab,
    Refresh,
    CycleUser,
    Confirm,
    Cancel,

    // Transaction grid
    ToggleExpand,
    CycleRowsPerPage,
    OpenFilters,

    // Insights
    NewQuery,
    ToggleSort,

    // Fetch completions. Each carries the request sequence token it answers;
    // stale tokens are discarded on arrival.
    UsersLoaded(Result<Vec<UserProfile>, String>),
    TransactionsLoaded {
        seq: u64,
        result: Result<TransactionPage, String>,
    },
    InsightsLoaded {
        seq: u64,
        result: Result<ResultEnvelope, String>,
    },
}

impl Action {
    /// Human-readable description for key hints and the bindings table.
    pub fn description(&self) -> &'static str {
        match self {
            Action::Quit => "Quit",
            Action::Error(_) => "Error",
            Action::MoveUp => "Move up",
            Action::MoveDown => "Move down",
            Action::MoveLeft => "Move left / previous page",
            Action::MoveRight => "Move right / next page",
            Action::GoToTop => "Go to first row",
            Action::GoToBottom => "Go to last row",
            Action::NextTab => "Switch view",
            Action::Refresh => "Refresh",
            Action::CycleUser => "Switch user",
            Action::Confirm => "Confirm",
            Action::Cancel => "Cancel",
            Action::ToggleExpand => "Expand/collapse row",
            Action::CycleRowsPerPage => "Change page size",
            Action::OpenFilters => "Edit filters",
            Action::NewQuery => "New query",
            Action::ToggleSort => "Sort column",
            Action::UsersLoaded(_) => "Users loaded",
            Action::TransactionsLoaded { .. } => "Transactions loaded",
            Action::InsightsLoaded { .. } => "Insights loaded",
        }
    }

    /// Actions a key may be bound to; completions and runtime events are
    /// excluded.
    pub fn bindable() -> Vec<Action> {
        vec![
            Action::Quit,
            Action::MoveUp,
            Action::MoveDown,
            Action::MoveLeft,
            Action::MoveRight,
            Action::GoToTop,
            Action::GoToBottom,
            Action::NextTab,
            Action::Refresh,
            Action::CycleUser,
            Action::Confirm,
            Action::Cancel,
            Action::ToggleExpand,
            Action::CycleRowsPerPage,
            Action::OpenFilters,
            Action::NewQuery,
            Action::ToggleSort,
        ]
    }
}
