//! Filter form overlay for the transaction grid.
//!
//! The form edits a draft copy of the criteria; nothing takes effect until
//! the user applies. The date-range invariant is checked live: while the
//! range is inverted (or a date fails to parse) the apply action is refused
//! and the reason is shown inline.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use strum::IntoEnumIterator;

use crate::core::filter::{
    FilterCriteria, TransactionMode, TransactionStatus, TransactionType,
};
use crate::tui::theme::Theme;

const DATE_HINT: &str = "dates are YYYY-MM-DD";

/// What a key press did to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Still editing.
    Pending,
    /// Closed without applying; the draft stays staged.
    Cancelled,
    /// Valid criteria to apply.
    Applied(FilterCriteria),
    /// Draft restored to defaults (no fetch).
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FromDate,
    ToDate,
    Status,
    Mode,
    Type,
}

const FIELDS: [Field; 5] = [
    Field::FromDate,
    Field::ToDate,
    Field::Status,
    Field::Mode,
    Field::Type,
];

/// Text buffer with a cursor, for the two date fields.
#[derive(Debug, Clone, Default)]
struct DateInput {
    text: String,
    cursor: usize,
}

impl DateInput {
    fn from_date(date: Option<NaiveDate>) -> Self {
        let text = date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        let cursor = text.len();
        Self { text, cursor }
    }

    fn insert(&mut self, c: char) {
        if c.is_ascii_digit() || c == '-' {
            self.text.insert(self.cursor, c);
            self.cursor += 1;
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.text.remove(self.cursor - 1);
            self.cursor -= 1;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, self.text.len() as isize) as usize;
    }

    /// Empty means unset; anything else must parse.
    fn parse(&self) -> Result<Option<NaiveDate>, String> {
        let text = self.text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<NaiveDate>()
            .map(Some)
            .map_err(|_| format!("'{text}' is not a date ({DATE_HINT})"))
    }
}

pub struct FilterForm {
    active: usize,
    from: DateInput,
    to: DateInput,
    status: Option<TransactionStatus>,
    mode: Option<TransactionMode>,
    kind: Option<TransactionType>,
}

impl FilterForm {
    /// Open the form pre-filled with the currently staged criteria.
    pub fn new(staged: &FilterCriteria) -> Self {
        Self {
            active: 0,
            from: DateInput::from_date(staged.from_date),
            to: DateInput::from_date(staged.to_date),
            status: staged.status,
            mode: staged.transaction_mode,
            kind: staged.transaction_type,
        }
    }

    /// Current draft, if every field parses.
    pub fn draft(&self) -> Result<FilterCriteria, String> {
        Ok(FilterCriteria {
            from_date: self.from.parse()?,
            to_date: self.to.parse()?,
            status: self.status,
            transaction_mode: self.mode,
            transaction_type: self.kind,
        })
    }

    /// Best-effort draft for staging on cancel: unparsable dates drop out.
    pub fn draft_lossy(&self) -> FilterCriteria {
        FilterCriteria {
            from_date: self.from.parse().unwrap_or(None),
            to_date: self.to.parse().unwrap_or(None),
            status: self.status,
            transaction_mode: self.mode,
            transaction_type: self.kind,
        }
    }

    /// Reason the apply action is currently refused, if any.
    pub fn blocked_reason(&self) -> Option<String> {
        match self.draft() {
            Err(reason) => Some(reason),
            Ok(criteria) => criteria.validate().err().map(|e| e.to_string()),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancelled,
            KeyCode::Enter => {
                // Pure guard: while invalid, the action is refused and the
                // reason stays on screen.
                return match self.draft() {
                    Ok(criteria) if criteria.validate().is_ok() => {
                        FormOutcome::Applied(criteria)
                    }
                    _ => FormOutcome::Pending,
                };
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                *self = Self::new(&FilterCriteria::default());
                return FormOutcome::Reset;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.active = (self.active + FIELDS.len() - 1) % FIELDS.len();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.active = (self.active + 1) % FIELDS.len();
            }
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Backspace => {
                if let Some(input) = self.active_date_input() {
                    input.backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(input) = self.active_date_input() {
                    input.delete();
                }
            }
            KeyCode::Char(c) if key.modifiers.is_empty() => {
                if let Some(input) = self.active_date_input() {
                    input.insert(c);
                }
            }
            _ => {}
        }
        FormOutcome::Pending
    }

    fn active_date_input(&mut self) -> Option<&mut DateInput> {
        match FIELDS[self.active] {
            Field::FromDate => Some(&mut self.from),
            Field::ToDate => Some(&mut self.to),
            _ => None,
        }
    }

    /// Left/Right: move the cursor in date fields, cycle enum fields.
    fn adjust(&mut self, delta: isize) {
        match FIELDS[self.active] {
            Field::FromDate => self.from.move_cursor(delta),
            Field::ToDate => self.to.move_cursor(delta),
            Field::Status => self.status = cycle(self.status, delta),
            Field::Mode => self.mode = cycle(self.mode, delta),
            Field::Type => self.kind = cycle(self.kind, delta),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = centered(area, 46, 12);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Filters ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border_style(true));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::vertical([
            Constraint::Length(1), // from
            Constraint::Length(1), // to
            Constraint::Length(1), // status
            Constraint::Length(1), // mode
            Constraint::Length(1), // type
            Constraint::Length(1), // spacer
            Constraint::Length(1), // error
            Constraint::Min(1),    // hints
        ])
        .split(inner);

        self.render_date_row(frame, rows[0], 0, "From date", &self.from, theme);
        self.render_date_row(frame, rows[1], 1, "To date", &self.to, theme);
        self.render_choice_row(frame, rows[2], 2, "Status", option_label(self.status), theme);
        self.render_choice_row(frame, rows[3], 3, "Mode", option_label(self.mode), theme);
        self.render_choice_row(frame, rows[4], 4, "Type", option_label(self.kind), theme);

        if let Some(reason) = self.blocked_reason() {
            frame.render_widget(
                Paragraph::new(Line::from(reason)).style(theme.error_style()),
                rows[6],
            );
        }
        frame.render_widget(
            Paragraph::new(Line::from(
                "Enter apply \u{00b7} Esc close \u{00b7} Ctrl+r reset \u{00b7} \u{2190}\u{2192} edit/cycle",
            ))
            .style(theme.muted_style()),
            rows[7],
        );
    }

    fn render_date_row(
        &self,
        frame: &mut Frame,
        area: Rect,
        index: usize,
        label: &str,
        input: &DateInput,
        theme: &Theme,
    ) {
        let focused = self.active == index;
        let mut spans = vec![Span::styled(format!("{label:<11}"), self.label_style(focused, theme))];
        if focused {
            let (before, after) = input.text.split_at(input.cursor.min(input.text.len()));
            spans.push(Span::raw(before.to_string()));
            spans.push(Span::styled("\u{2588}", theme.normal_style()));
            spans.push(Span::raw(after.to_string()));
        } else if input.text.is_empty() {
            spans.push(Span::styled("any", theme.muted_style()));
        } else {
            spans.push(Span::raw(input.text.clone()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_choice_row(
        &self,
        frame: &mut Frame,
        area: Rect,
        index: usize,
        label: &str,
        value: String,
        theme: &Theme,
    ) {
        let focused = self.active == index;
        let line = Line::from(vec![
            Span::styled(format!("{label:<11}"), self.label_style(focused, theme)),
            Span::raw("\u{2039} "),
            Span::raw(value),
            Span::raw(" \u{203a}"),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn label_style(&self, focused: bool, theme: &Theme) -> ratatui::style::Style {
        if focused {
            theme.header_style()
        } else {
            theme.muted_style()
        }
    }
}

/// Cycle an optional enum through None -> variants -> None.
fn cycle<E: IntoEnumIterator + Copy + PartialEq>(current: Option<E>, delta: isize) -> Option<E> {
    let variants: Vec<E> = E::iter().collect();
    // Positions: 0 = unset, 1..=n = variants.
    let position = match current {
        None => 0,
        Some(v) => variants.iter().position(|x| *x == v).map_or(0, |i| i + 1),
    } as isize;
    let count = variants.len() as isize + 1;
    let next = (position + delta).rem_euclid(count) as usize;
    if next == 0 {
        None
    } else {
        Some(variants[next - 1])
    }
}

fn option_label<E: std::fmt::Display>(value: Option<E>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "any".to_string(),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut FilterForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_apply_refused_for_inverted_range() {
        let mut form = FilterForm::new(&FilterCriteria::default());
        type_text(&mut form, "2025-09-10");
        form.handle_key(key(KeyCode::Down));
        type_text(&mut form, "2025-09-01");

        assert!(form.blocked_reason().is_some());
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Pending);
    }

    #[test]
    fn test_apply_accepts_ordered_range() {
        let mut form = FilterForm::new(&FilterCriteria::default());
        type_text(&mut form, "2025-09-01");
        form.handle_key(key(KeyCode::Down));
        type_text(&mut form, "2025-09-10");

        assert!(form.blocked_reason().is_none());
        let FormOutcome::Applied(criteria) = form.handle_key(key(KeyCode::Enter)) else {
            panic!("expected apply");
        };
        assert_eq!(
            criteria.from_date,
            NaiveDate::from_ymd_opt(2025, 9, 1)
        );
        assert_eq!(criteria.to_date, NaiveDate::from_ymd_opt(2025, 9, 10));
    }

    #[test]
    fn test_apply_refused_for_unparsable_date() {
        let mut form = FilterForm::new(&FilterCriteria::default());
        type_text(&mut form, "2025-13");
        assert!(form.blocked_reason().is_some());
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Pending);
    }

    #[test]
    fn test_enum_fields_cycle_through_unset() {
        let mut form = FilterForm::new(&FilterCriteria::default());
        // Move to the status field.
        form.handle_key(key(KeyCode::Down));
        form.handle_key(key(KeyCode::Down));
        assert_eq!(form.status, None);

        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.status, Some(TransactionStatus::Initiated));
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.status, None);
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.status, Some(TransactionStatus::Refunded));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = FilterForm::new(&FilterCriteria {
            status: Some(TransactionStatus::Failed),
            ..Default::default()
        });
        type_text(&mut form, "2025-01-01");
        let outcome = form.handle_key(KeyEvent::new(
            KeyCode::Char('r'),
            KeyModifiers::CONTROL,
        ));
        assert_eq!(outcome, FormOutcome::Reset);
        assert!(form.draft_lossy().is_default());
    }

    #[test]
    fn test_cancel_keeps_lossy_draft() {
        let mut form = FilterForm::new(&FilterCriteria::default());
        type_text(&mut form, "2025-09-01");
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormOutcome::Cancelled);
        assert_eq!(
            form.draft_lossy().from_date,
            NaiveDate::from_ymd_opt(2025, 9, 1)
        );
    }

    #[test]
    fn test_date_editing_with_cursor() {
        let mut form = FilterForm::new(&FilterCriteria::default());
        type_text(&mut form, "2025-09-0x1"); // 'x' is ignored
        assert_eq!(form.from.text, "2025-09-01");

        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.from.text, "2025-09-0");
        type_text(&mut form, "7");
        assert_eq!(form.from.parse().unwrap(), NaiveDate::from_ymd_opt(2025, 9, 7));
    }
}
