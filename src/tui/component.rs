use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::tui::action::Action;

/// Base trait for the dashboard's views and dialogs.
///
/// Key events reach a component first when it is capturing text input
/// (`wants_keys`); otherwise the app translates keys to actions and routes
/// them here.
pub trait Component {
    /// Handle a translated action.
    ///
    /// Ok(true) means the action was consumed; Ok(false) lets it propagate.
    fn handle_action(&mut self, action: &Action) -> Result<bool>;

    /// Handle a raw key event. Only called while `wants_keys` is true.
    fn handle_key(&mut self, _key: KeyEvent) -> Result<bool> {
        Ok(false)
    }

    /// True while the component is capturing raw keystrokes (text fields).
    fn wants_keys(&self) -> bool {
        false
    }

    /// Render into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// Component name for logging.
    fn name(&self) -> &str;
}
