//! Adaptive table renderer for insight results.
//!
//! Renders an arbitrary headers/rows dataset with no knowledge of its
//! meaning: numeric columns (per the ingestion-time tag) are right-aligned
//! and number-formatted, everything else renders as text. One column is the
//! active sort key; re-sorting happens on every render through a pure index
//! permutation, the underlying rows are never reordered.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::core::table::{SortState, TableData, sorted_indices};
use crate::tui::theme::Theme;

/// Header marker for the active sort column.
fn sort_marker(sort: &SortState, col: usize) -> &'static str {
    if sort.column != col {
        ""
    } else if sort.ascending {
        " \u{25b2}"
    } else {
        " \u{25bc}"
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    table: &TableData,
    sort: &SortState,
    selected_col: usize,
    theme: &Theme,
) {
    let block = Block::default()
        .title(" Table ")
        .borders(Borders::ALL)
        .border_style(theme.border_style(true));

    if table.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new("No data available")
                .style(theme.muted_style())
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let header_cells: Vec<Cell> = table
        .headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let style = if col == selected_col {
                theme.selected_style()
            } else {
                theme.header_style()
            };
            let text = format!("{header}{}", sort_marker(sort, col));
            let alignment = if table.column_type(col).is_numeric() {
                Alignment::Right
            } else {
                Alignment::Left
            };
            Cell::from(Text::from(Line::from(Span::styled(text, style)).alignment(alignment)))
        })
        .collect();

    let rows: Vec<Row> = sorted_indices(table, sort)
        .into_iter()
        .map(|row_idx| {
            let cells: Vec<Cell> = (0..table.headers.len())
                .map(|col| {
                    let column_type = table.column_type(col);
                    let value = table.cell(row_idx, col).display(column_type);
                    let alignment = if column_type.is_numeric() {
                        Alignment::Right
                    } else {
                        Alignment::Left
                    };
                    Cell::from(Text::from(Line::from(value).alignment(alignment)))
                })
                .collect();
            Row::new(cells)
        })
        .collect();

    let count = table.headers.len().max(1) as u32;
    let widths = vec![Constraint::Ratio(1, count); count as usize];
    let widget = Table::new(rows, widths)
        .header(Row::new(header_cells))
        .block(block)
        .column_spacing(1);
    frame.render_widget(widget, area);
}
