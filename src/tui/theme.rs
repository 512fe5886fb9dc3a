use ratatui::style::{Color, Modifier, Style};

/// Color scheme for the dashboard.
///
/// Plain color table, no conditional styling rules. The chart palette is
/// fixed at six entries; series longer than the palette reuse colors by
/// cycling, which is acceptable.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,

    // Tables
    pub header_fg: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,

    // Money
    pub credit: Color,
    pub debit: Color,

    // Status chips
    pub status_success: Color,
    pub status_failed: Color,
    pub status_initiated: Color,
    pub status_refunded: Color,

    // Feedback
    pub error: Color,
    pub info: Color,

    /// Series colors, cycled over the data index.
    pub chart_palette: [Color; 6],
}

impl Theme {
    /// Default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            foreground: Color::Gray,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            header_fg: Color::Cyan,
            selected_fg: Color::Black,
            selected_bg: Color::Cyan,
            credit: Color::Green,
            debit: Color::Red,
            status_success: Color::Green,
            status_failed: Color::Red,
            status_initiated: Color::Yellow,
            status_refunded: Color::Blue,
            error: Color::Red,
            info: Color::Blue,
            chart_palette: [
                Color::Rgb(0x00, 0x88, 0xfe),
                Color::Rgb(0x00, 0xc4, 0x9f),
                Color::Rgb(0xff, 0xbb, 0x28),
                Color::Rgb(0xff, 0x80, 0x42),
                Color::Rgb(0xa0, 0x20, 0xf0),
                Color::Rgb(0xff, 0x4c, 0x4c),
            ],
        }
    }

    /// Light theme for pale terminals.
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            foreground: Color::Black,
            muted: Color::Gray,
            border: Color::Gray,
            border_focused: Color::Blue,
            header_fg: Color::Blue,
            selected_fg: Color::White,
            selected_bg: Color::Blue,
            status_initiated: Color::Rgb(200, 150, 0),
            ..Self::dark()
        }
    }

    /// Resolve a theme by config name; unknown names fall back to dark.
    pub fn by_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn amount_style(&self, transaction_type: &str) -> Style {
        match transaction_type {
            "credit" | "refund" => Style::default().fg(self.credit),
            "debit" => Style::default().fg(self.debit),
            _ => self.normal_style(),
        }
    }

    /// Chip color for a transaction status string.
    pub fn status_style(&self, status: &str) -> Style {
        let color = match status {
            "success" => self.status_success,
            "failed" => self.status_failed,
            "initiated" => self.status_initiated,
            "refunded" => self.status_refunded,
            _ => self.muted,
        };
        Style::default().fg(color)
    }

    /// Series color for a chart data index, cycling the palette.
    pub fn series_color(&self, index: usize) -> Color {
        self.chart_palette[index % self.chart_palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
