//! One-line status bar: loaded report summary, key hints, last message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    match &app.report {
        Some(report) => {
            spans.push(Span::styled(
                format!(" {} {} ", report.report_type.tag(), report.year),
                theme::accent(),
            ));
            spans.push(Span::styled(
                format!(
                    "{} markets / {} rows ",
                    report.table.markets().len(),
                    report.table.len()
                ),
                theme::muted(),
            ));
        }
        None => spans.push(Span::styled(" no report ", theme::muted())),
    }

    if app.loading {
        spans.push(Span::styled("| fetching... ", theme::warning()));
    }

    spans.push(Span::styled(
        "| [/]filter [r]report [e]errors [?]help [q]quit ",
        theme::muted(),
    ));

    if let Some((message, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::text(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled("| ", theme::muted()));
        spans.push(Span::styled(message, style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
