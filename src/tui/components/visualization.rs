//! Visualization dispatch: one decoded payload, exactly one strategy.
//!
//! The match over [`Visualization`] is exhaustive over known variants and
//! fails open: `Unsupported` draws nothing, leaving the analysis panel as
//! the only content. Unknown payloads can therefore never crash the view.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    widgets::Paragraph,
};

use crate::core::models::{ChartKind, Visualization};
use crate::core::table::SortState;
use crate::tui::components::{charts, insight_table};
use crate::tui::theme::Theme;

/// The strategy selected for a payload; split out from rendering so dispatch
/// is testable without a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    Table,
    Pie,
    Bar,
    Line,
    Nothing,
}

pub fn strategy_for(visualization: &Visualization) -> RenderStrategy {
    match visualization {
        Visualization::Table(_) => RenderStrategy::Table,
        Visualization::Chart(ChartKind::Pie, _) => RenderStrategy::Pie,
        Visualization::Chart(ChartKind::Bar, _) => RenderStrategy::Bar,
        Visualization::Chart(ChartKind::Line, _) => RenderStrategy::Line,
        Visualization::Unsupported => RenderStrategy::Nothing,
    }
}

/// Render a visualization into `area`. The sort state applies only to table
/// payloads; chart strategies receive their series untouched.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    visualization: &Visualization,
    sort: &SortState,
    selected_col: usize,
    theme: &Theme,
) {
    match visualization {
        Visualization::Table(table) => {
            insight_table::render(frame, area, table, sort, selected_col, theme);
        }
        Visualization::Chart(kind, series) => {
            let (plot, summary) = charts::split_for_summary(area, &series.text_summary);
            match kind {
                ChartKind::Pie => charts::render_pie(frame, plot, series, theme),
                ChartKind::Bar => charts::render_bar(frame, plot, series, theme),
                ChartKind::Line => charts::render_line(frame, plot, series, theme),
            }
            if let Some(summary_area) = summary {
                frame.render_widget(
                    Paragraph::new(series.text_summary.as_str())
                        .style(theme.muted_style())
                        .alignment(Alignment::Left)
                        .wrap(ratatui::widgets::Wrap { trim: true }),
                    summary_area,
                );
            }
        }
        Visualization::Unsupported => {}
    }
}
