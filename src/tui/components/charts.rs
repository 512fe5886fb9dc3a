//! Chart strategies for insight results: pie, bar and line.
//!
//! Each strategy is a pure mapping from an already-aggregated `{label,
//! value}` series to widgets; no sorting, filtering or aggregation happens
//! here. Series colors cycle the theme palette over the data index, so a
//! series longer than the palette reuses colors. An empty series renders an
//! empty plot area.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType, Paragraph},
};

use crate::core::format::format_number;
use crate::core::models::ChartSeries;
use crate::tui::theme::Theme;

/// Proportional breakdown rendered as colored share rows; the terminal
/// stand-in for a pie.
pub fn render_pie(frame: &mut Frame, area: Rect, series: &ChartSeries, theme: &Theme) {
    if series.points.is_empty() || area.height == 0 {
        return;
    }
    let total: f64 = series.points.iter().map(|p| p.value.max(0.0)).sum();
    let label_w = series
        .points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0)
        .min(area.width as usize / 3);

    let gauge_w = (area.width as usize).saturating_sub(label_w + 20).max(8);
    let mut lines = Vec::with_capacity(series.points.len());
    for (idx, point) in series.points.iter().enumerate() {
        let share = if total > 0.0 {
            point.value.max(0.0) / total
        } else {
            0.0
        };
        let filled = ((share * gauge_w as f64).round() as usize).min(gauge_w);
        let color = theme.series_color(idx);
        lines.push(Line::from(vec![
            Span::styled("\u{25a0} ", Style::default().fg(color)),
            Span::raw(format!("{:<w$} ", clip(&point.label, label_w), w = label_w)),
            Span::styled("\u{2588}".repeat(filled), Style::default().fg(color)),
            Span::raw(" ".repeat(gauge_w - filled)),
            Span::raw(format!(" {:>5.1}%", share * 100.0)),
            Span::styled(
                format!("  {}", format_number(point.value)),
                theme.muted_style(),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

/// Vertical bar chart, one bar per point.
pub fn render_bar(frame: &mut Frame, area: Rect, series: &ChartSeries, theme: &Theme) {
    if series.points.is_empty() || area.width < 4 {
        return;
    }
    let bars: Vec<Bar> = series
        .points
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let style = Style::default().fg(theme.series_color(idx));
            Bar::default()
                .value(point.value.max(0.0).round() as u64)
                .text_value(format_number(point.value))
                .label(Line::from(clip(&point.label, 12)))
                .style(style)
                .value_style(style.reversed())
        })
        .collect();

    let gap = 1u16;
    let count = series.points.len() as u16;
    let bar_width = ((area.width.saturating_sub(count * gap)) / count).clamp(3, 14);
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(gap);
    frame.render_widget(chart, area);
}

/// Line chart over the point index; labels mark the x-axis extremes.
pub fn render_line(frame: &mut Frame, area: Rect, series: &ChartSeries, theme: &Theme) {
    if series.points.is_empty() {
        return;
    }
    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();
    let max_y = points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max).max(1.0);
    let min_y = points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::min).min(0.0);
    let max_x = (points.len() as f64 - 1.0).max(1.0);

    let dataset = Dataset::default()
        .name("Amount")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.series_color(0)))
        .data(&points);

    let first_label = series.points.first().map(|p| clip(&p.label, 12)).unwrap_or_default();
    let last_label = series.points.last().map(|p| clip(&p.label, 12)).unwrap_or_default();

    let chart = Chart::new(vec![dataset])
        .block(Block::default())
        .x_axis(
            Axis::default()
                .style(theme.muted_style())
                .bounds([0.0, max_x])
                .labels([Span::raw(first_label), Span::raw(last_label)]),
        )
        .y_axis(
            Axis::default()
                .style(theme.muted_style())
                .bounds([min_y, max_y])
                .labels([
                    Span::raw(format_number(min_y)),
                    Span::raw(format_number((min_y + max_y) / 2.0)),
                    Span::raw(format_number(max_y)),
                ]),
        );
    frame.render_widget(chart, area);
}

/// Split a chart area so the series summary sits under the plot.
pub fn split_for_summary(area: Rect, text_summary: &str) -> (Rect, Option<Rect>) {
    if text_summary.trim().is_empty() || area.height < 5 {
        return (area, None);
    }
    let [plot, summary] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(2)]).areas(area);
    (plot, Some(summary))
}

fn clip(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let mut s: String = value.chars().take(max.saturating_sub(1)).collect();
        s.push('\u{2026}');
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_preserves_short_labels() {
        assert_eq!(clip("Transfers", 12), "Transfers");
        assert_eq!(clip("Internet Providers", 10), "Internet \u{2026}");
    }

    #[test]
    fn test_split_for_summary() {
        let area = Rect::new(0, 0, 80, 20);
        let (plot, summary) = split_for_summary(area, "Mostly transfers.");
        assert_eq!(summary.unwrap().height, 2);
        assert_eq!(plot.height + 2, area.height);

        let (plot, summary) = split_for_summary(area, "  ");
        assert!(summary.is_none());
        assert_eq!(plot, area);
    }
}
