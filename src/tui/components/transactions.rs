//! Transaction grid: server-paginated list with per-row expansion and a
//! filter form overlay.
//!
//! Rows are rendered as list items so an expanded row can grow past one
//! line; the grid itself never filters or pages locally, it only displays
//! the slice the controller holds.

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::collections::HashSet;

use crate::core::format::{self, DASH};
use crate::core::models::TransactionRecord;
use crate::tui::action::Action;
use crate::tui::component::Component;
use crate::tui::components::filter_form::{FilterForm, FormOutcome};
use crate::tui::controller::{FetchSpec, TransactionsController};
use crate::tui::theme::Theme;

/// Fixed column widths; the counterparty column absorbs the remainder.
const DATE_W: usize = 12;
const MODE_W: usize = 13;
const TYPE_W: usize = 7;
const AMOUNT_W: usize = 14;
const STATUS_W: usize = 10;

/// Secondary fields shown when a row is expanded. The field set branches on
/// the counterparty: merchant payments show the merchant type and omit the
/// recipient account number, peer transfers do the opposite.
pub fn detail_fields(record: &TransactionRecord) -> Vec<(&'static str, String)> {
    let mut fields = vec![(
        "Transaction ID",
        format::text_or_dash(Some(record.transaction_id.as_str())),
    )];
    if record.is_merchant_payment() {
        let merchant_type = record
            .merchant
            .as_ref()
            .map(|m| format!("{} - {}", m.category, m.kind));
        fields.push(("Merchant Type", format::text_or_dash(merchant_type.as_deref())));
    } else {
        let account = record.to_account.as_ref().map(|a| a.account_number.clone());
        fields.push((
            "Recipient Account Number",
            format::text_or_dash(account.as_deref()),
        ));
    }
    fields.push((
        "Date/Time",
        record
            .initiated_at
            .map(format::format_datetime)
            .unwrap_or_else(|| DASH.to_string()),
    ));
    fields.push((
        "Description",
        format::text_or_dash(record.description.as_deref()),
    ));
    fields.push(("Notes", format::text_or_dash(record.remarks.as_deref())));
    fields
}

pub struct TransactionsView {
    pub controller: TransactionsController,
    cursor: usize,
    /// Expansion is per row, keyed by transaction id; replaced slices start
    /// collapsed.
    expanded: HashSet<String>,
    filter_form: Option<FilterForm>,
    theme: Theme,
}

impl TransactionsView {
    pub fn new(rows_per_page: usize, theme: Theme) -> Self {
        Self {
            controller: TransactionsController::new(rows_per_page),
            cursor: 0,
            expanded: HashSet::new(),
            filter_form: None,
            theme,
        }
    }

    pub fn filter_form_open(&self) -> bool {
        self.filter_form.is_some()
    }

    /// Identity changed (or arrived): invalidate and refetch.
    pub fn set_user(&mut self, user_id: Option<String>) -> Option<FetchSpec> {
        let spec = self.controller.set_user(user_id);
        if spec.is_some() {
            self.expanded.clear();
            self.cursor = 0;
        }
        spec
    }

    /// Actions routed here while the grid is the active view.
    pub fn on_action(&mut self, action: &Action) -> Option<FetchSpec> {
        match action {
            Action::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            Action::MoveDown => {
                let last = self.controller.items().len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
                None
            }
            Action::GoToTop => {
                self.cursor = 0;
                None
            }
            Action::GoToBottom => {
                self.cursor = self.controller.items().len().saturating_sub(1);
                None
            }
            Action::Confirm | Action::ToggleExpand => {
                self.toggle_cursor_row();
                None
            }
            Action::MoveLeft => self.controller.prev_page(),
            Action::MoveRight => self.controller.next_page(),
            Action::CycleRowsPerPage => self.controller.cycle_rows_per_page(),
            Action::Refresh => self.controller.refresh(),
            Action::OpenFilters => {
                self.filter_form = Some(FilterForm::new(self.controller.staged()));
                None
            }
            _ => None,
        }
    }

    /// Raw keys while the filter form is open.
    pub fn on_form_key(&mut self, key: KeyEvent) -> Result<Option<FetchSpec>> {
        let Some(form) = &mut self.filter_form else {
            return Ok(None);
        };
        match form.handle_key(key) {
            FormOutcome::Pending => Ok(None),
            FormOutcome::Reset => {
                self.controller.reset_filters();
                Ok(None)
            }
            FormOutcome::Cancelled => {
                self.controller.stage(form.draft_lossy());
                self.filter_form = None;
                Ok(None)
            }
            FormOutcome::Applied(criteria) => {
                // The form already guards the range invariant; a refusal here
                // keeps the form open with the reason on screen.
                match self.controller.apply_filters(criteria) {
                    Ok(spec) => {
                        self.filter_form = None;
                        Ok(spec)
                    }
                    Err(_) => Ok(None),
                }
            }
        }
    }

    /// Fold in a fetch completion.
    pub fn on_loaded(&mut self, seq: u64, result: Result<crate::core::models::TransactionPage, String>) {
        let applied = self.controller.apply_response(seq, result);
        if applied && self.controller.error().is_none() {
            // A new logical sequence: collapse everything, cursor to top.
            self.expanded.clear();
            self.cursor = 0;
        }
    }

    fn toggle_cursor_row(&mut self) {
        let Some(record) = self.controller.items().get(self.cursor) else {
            return;
        };
        let key = record.transaction_id.clone();
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
    }

    fn header_line(&self, counterparty_w: usize) -> Line<'static> {
        Line::from(vec![
            Span::raw("  "),
            Span::raw(pad("Date", DATE_W, false)),
            Span::raw(pad("Counterparty", counterparty_w, false)),
            Span::raw(pad("Mode", MODE_W, false)),
            Span::raw(pad("Type", TYPE_W, false)),
            Span::raw(pad("Amount", AMOUNT_W, true)),
            Span::raw("  "),
            Span::raw(pad("Status", STATUS_W, false)),
        ])
    }

    fn record_item(
        &self,
        record: &TransactionRecord,
        counterparty_w: usize,
        theme: &Theme,
    ) -> ListItem<'static> {
        let expanded = self.expanded.contains(&record.transaction_id);
        let marker = if expanded { "\u{25be} " } else { "\u{25b8} " };
        let date = record
            .initiated_at
            .map(format::format_date)
            .unwrap_or_else(|| DASH.to_string());

        let mut lines = vec![Line::from(vec![
            Span::raw(marker.to_string()),
            Span::raw(pad(&date, DATE_W, false)),
            Span::raw(pad(&record.counterparty(), counterparty_w, false)),
            Span::raw(pad(&record.transaction_mode, MODE_W, false)),
            Span::raw(pad(&record.transaction_type, TYPE_W, false)),
            Span::styled(
                pad(&format::format_inr(record.amount), AMOUNT_W, true),
                theme.amount_style(&record.transaction_type),
            ),
            Span::raw("  "),
            Span::styled(
                pad(&record.status, STATUS_W, false),
                theme.status_style(&record.status),
            ),
        ])];

        if expanded {
            for (label, value) in detail_fields(record) {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(format!("{label}: "), theme.muted_style()),
                    Span::raw(value),
                ]));
            }
        }
        ListItem::new(Text::from(lines))
    }

    fn footer_line(&self, theme: &Theme) -> Line<'static> {
        let pagination = self.controller.pagination();
        let total = self.controller.total_records();
        let pages = pagination.total_pages(total).max(1);
        let mut spans = vec![Span::styled(
            format!(
                "Page {}/{} \u{00b7} {} per page \u{00b7} {} total",
                pagination.page_number(),
                pages,
                pagination.rows_per_page,
                total,
            ),
            theme.normal_style(),
        )];
        if self.controller.loading() {
            spans.push(Span::styled("  fetching\u{2026}", theme.muted_style()));
        }
        spans.push(Span::styled(
            "  \u{2190}\u{2192} page \u{00b7} c size \u{00b7} f filters \u{00b7} Space expand",
            theme.muted_style(),
        ));
        Line::from(spans)
    }
}

impl Component for TransactionsView {
    fn handle_action(&mut self, _action: &Action) -> Result<bool> {
        // Fetch-producing actions go through `on_action`; the trait path is
        // render-only for this view.
        Ok(false)
    }

    fn wants_keys(&self) -> bool {
        self.filter_form.is_some()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme.clone();
        let block = Block::default()
            .title(" Payment Transactions ")
            .borders(Borders::ALL)
            .border_style(theme.border_style(self.filter_form.is_none()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [header_area, list_area, error_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(u16::from(self.controller.error().is_some())),
            Constraint::Length(1),
        ])
        .areas(inner);

        let fixed = 2 + DATE_W + MODE_W + TYPE_W + AMOUNT_W + 2 + STATUS_W;
        let counterparty_w = (inner.width as usize).saturating_sub(fixed).max(12);

        frame.render_widget(
            Paragraph::new(self.header_line(counterparty_w)).style(theme.header_style()),
            header_area,
        );

        if self.controller.items().is_empty() {
            let placeholder = if self.controller.loading() {
                "Loading transactions\u{2026}"
            } else {
                "No transactions"
            };
            frame.render_widget(
                Paragraph::new(placeholder)
                    .style(theme.muted_style())
                    .centered(),
                list_area,
            );
        } else {
            let items: Vec<ListItem> = self
                .controller
                .items()
                .iter()
                .map(|record| self.record_item(record, counterparty_w, &theme))
                .collect();
            let list = List::new(items).highlight_style(theme.selected_style());
            let mut state = ListState::default().with_selected(Some(self.cursor));
            frame.render_stateful_widget(list, list_area, &mut state);
        }

        if let Some(error) = self.controller.error() {
            frame.render_widget(
                Paragraph::new(format!("error: {error} (r to retry)"))
                    .style(theme.error_style()),
                error_area,
            );
        }
        frame.render_widget(Paragraph::new(self.footer_line(&theme)), footer_area);

        if let Some(form) = &self.filter_form {
            form.render(frame, area, &theme);
        }
    }

    fn name(&self) -> &str {
        "transactions"
    }
}

/// Pad or truncate to a display width, with a trailing space as separator.
fn pad(value: &str, width: usize, right_align: bool) -> String {
    let mut s: String = value.chars().take(width.saturating_sub(1)).collect();
    if value.chars().count() > width.saturating_sub(1) {
        s.pop();
        s.push('\u{2026}');
    }
    if right_align {
        format!("{s:>w$} ", w = width.saturating_sub(1))
    } else {
        format!("{s:<w$} ", w = width.saturating_sub(1))
    }
}
