//! Insights view: natural-language prompt, analysis panel and the dispatched
//! visualization.
//!
//! Two modes: while no envelope is held the prompt captures keystrokes;
//! once a result arrives the view shows the analysis next to the
//! visualization and the sort/column keys drive the insight table.

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tui_textarea::TextArea;

use crate::core::models::{ResultEnvelope, Visualization};
use crate::core::table::SortState;
use crate::tui::action::Action;
use crate::tui::component::Component;
use crate::tui::components::visualization;
use crate::tui::controller::{InsightsController, QuerySpec};
use crate::tui::theme::Theme;

pub struct InsightsView {
    pub controller: InsightsController,
    prompt: TextArea<'static>,
    sort: SortState,
    selected_col: usize,
    theme: Theme,
}

impl InsightsView {
    pub fn new(theme: Theme) -> Self {
        let mut prompt = TextArea::default();
        prompt.set_placeholder_text("Ask about your spending, e.g. \"List my top 10 biggest spends this year in a table\"");
        prompt.set_cursor_line_style(ratatui::style::Style::default());
        Self {
            controller: InsightsController::default(),
            prompt,
            sort: SortState::default(),
            selected_col: 0,
            theme,
        }
    }

    /// The prompt captures raw keys whenever no result is on screen.
    pub fn in_prompt(&self) -> bool {
        self.controller.envelope().is_none()
    }

    /// Raw key while in prompt mode. Enter submits; everything else edits.
    pub fn on_prompt_key(&mut self, key: KeyEvent, session_id: Option<&str>) -> Result<Option<QuerySpec>> {
        if key.code == KeyCode::Enter {
            let Some(session_id) = session_id else {
                return Ok(None);
            };
            let query = self.prompt.lines().join(" ");
            return Ok(self.controller.submit(&query, session_id));
        }
        self.prompt.input(key);
        Ok(None)
    }

    /// Actions routed here while a result is shown.
    pub fn on_action(&mut self, action: &Action) -> bool {
        match action {
            Action::MoveLeft => {
                self.selected_col = self.selected_col.saturating_sub(1);
                true
            }
            Action::MoveRight => {
                self.selected_col = (self.selected_col + 1).min(self.column_limit());
                true
            }
            Action::ToggleSort | Action::Confirm => {
                // Header-click semantics: same column toggles direction,
                // a new column starts ascending.
                self.sort.activate(self.selected_col);
                true
            }
            Action::NewQuery | Action::Cancel => {
                self.controller.clear();
                true
            }
            _ => false,
        }
    }

    /// Re-run the last query in place, keeping the current result visible
    /// until the fresh one lands.
    pub fn refresh(&mut self, session_id: Option<&str>) -> Option<QuerySpec> {
        let session_id = session_id?;
        let query = self.controller.last_query()?.to_string();
        self.controller.submit(&query, session_id)
    }

    /// The identity changed: drop the envelope, re-ask the last question.
    pub fn on_user_changed(&mut self, session_id: Option<&str>) -> Option<QuerySpec> {
        match session_id {
            Some(session_id) => self.controller.on_user_changed(session_id),
            None => {
                self.controller.clear();
                None
            }
        }
    }

    pub fn on_loaded(&mut self, seq: u64, result: Result<ResultEnvelope, String>) {
        let applied = self.controller.apply_response(seq, result);
        if applied && self.controller.error().is_none() {
            // New result set: default sort key, first column selected.
            self.sort = SortState::default();
            self.selected_col = 0;
        }
    }

    fn column_limit(&self) -> usize {
        match self.controller.envelope().map(|e| &e.visualization) {
            Some(Visualization::Table(table)) => table.headers.len().saturating_sub(1),
            _ => 0,
        }
    }

    fn render_prompt(&mut self, frame: &mut Frame, area: Rect) {
        let [_, input_area, status_area, hint_area] = Layout::vertical([
            Constraint::Length(area.height / 3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.prompt.set_block(
            Block::default()
                .title(" Financial Insights ")
                .borders(Borders::ALL)
                .border_style(self.theme.border_style(true)),
        );
        frame.render_widget(&self.prompt, input_area);

        if self.controller.loading() {
            frame.render_widget(
                Paragraph::new("Thinking\u{2026}").style(self.theme.muted_style()),
                status_area,
            );
        } else if let Some(error) = self.controller.error() {
            frame.render_widget(
                Paragraph::new(format!("error: {error}")).style(self.theme.error_style()),
                status_area,
            );
        }
        frame.render_widget(
            Paragraph::new("Enter submit \u{00b7} Tab switch view").style(self.theme.muted_style()),
            hint_area,
        );
    }

    fn render_result(&mut self, frame: &mut Frame, area: Rect, envelope: &ResultEnvelope) {
        let [query_area, body_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);

        let mut spans = vec![
            Span::styled("\u{201c}", self.theme.muted_style()),
            Span::styled(envelope.query.clone(), self.theme.normal_style()),
            Span::styled("\u{201d}", self.theme.muted_style()),
            Span::styled("  n new query", self.theme.muted_style()),
        ];
        if self.controller.loading() {
            spans.push(Span::styled("  refreshing\u{2026}", self.theme.muted_style()));
        }
        if let Some(error) = self.controller.error() {
            spans.push(Span::styled(format!("  error: {error}"), self.theme.error_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), query_area);

        let [analysis_area, viz_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(body_area);

        self.render_analysis(frame, analysis_area, envelope);
        visualization::render(
            frame,
            viz_area,
            &envelope.visualization,
            &self.sort,
            self.selected_col,
            &self.theme,
        );
    }

    fn render_analysis(&self, frame: &mut Frame, area: Rect, envelope: &ResultEnvelope) {
        let block = Block::default()
            .title(" Analysis ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();
        if !envelope.analysis.recommendations.is_empty() {
            lines.push(Line::from(Span::styled(
                "Recommendations",
                self.theme.header_style(),
            )));
            for item in &envelope.analysis.recommendations {
                lines.push(Line::from(format!("\u{2022} {item}")));
            }
        }
        if !envelope.analysis.unnecessary_patterns.is_empty() {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                "Unnecessary patterns",
                self.theme.header_style(),
            )));
            for item in &envelope.analysis.unnecessary_patterns {
                lines.push(Line::from(format!("\u{2022} {item}")));
            }
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "No analysis returned.",
                self.theme.muted_style(),
            )));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}

impl Component for InsightsView {
    fn handle_action(&mut self, action: &Action) -> Result<bool> {
        Ok(self.on_action(action))
    }

    fn handle_key(&mut self, _key: KeyEvent) -> Result<bool> {
        // Prompt keys need a session id, so the app drives `on_prompt_key`
        // directly.
        Ok(false)
    }

    fn wants_keys(&self) -> bool {
        self.in_prompt()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        match self.controller.envelope().cloned() {
            Some(envelope) => self.render_result(frame, area, &envelope),
            None => self.render_prompt(frame, area),
        }
    }

    fn name(&self) -> &str {
        "insights"
    }
}
