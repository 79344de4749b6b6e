//! Color tokens for the cotview TUI.
//!
//! Dark-terminal palette with the classic COT chart coloring:
//! - **Commercials**: red
//! - **Large Speculators**: blue
//! - **Small Speculators**: yellow
//! - **Accent**: cyan (focus, highlights)
//! - **Zero line**: white, so the long/short flip is unmissable

use cotview_core::domain::TraderGroup;
use ratatui::style::{Color, Modifier, Style};

/// Deep charcoal background.
pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);

const ACCENT: Color = Color::Rgb(0, 255, 255);
const POSITIVE: Color = Color::Rgb(0, 255, 128);
const NEGATIVE: Color = Color::Rgb(255, 20, 147);
const WARNING: Color = Color::Rgb(255, 140, 0);
const MUTED: Color = Color::Rgb(100, 149, 237);
const TEXT: Color = Color::Rgb(200, 200, 200);

const COMMERCIAL: Color = Color::Rgb(255, 80, 80);
const LARGE_SPEC: Color = Color::Rgb(90, 140, 255);
const SMALL_SPEC: Color = Color::Rgb(255, 220, 60);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

/// White zero line across the net-position chart.
pub fn zero_line() -> Style {
    Style::default().fg(Color::White)
}

/// Border style for a panel, highlighted when it holds focus.
pub fn panel_border(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::Rgb(60, 60, 70))
    }
}

/// Title style for a panel, highlighted when it holds focus.
pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Chart color for a trader group.
pub fn group_color(group: TraderGroup) -> Color {
    match group {
        TraderGroup::Commercial => COMMERCIAL,
        TraderGroup::LargeSpeculator => LARGE_SPEC,
        TraderGroup::SmallSpeculator => SMALL_SPEC,
    }
}

/// Foreground style for a trader group label.
pub fn group_style(group: TraderGroup) -> Style {
    Style::default().fg(group_color(group))
}

/// Sign coloring for a net position value.
pub fn net_style(net: i64) -> Style {
    if net >= 0 {
        Style::default().fg(POSITIVE)
    } else {
        Style::default().fg(NEGATIVE)
    }
}
