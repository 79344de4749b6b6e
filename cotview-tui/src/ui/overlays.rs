//! Overlay widgets: help, report selector, error history.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use cotview_core::domain::ReportType;

use crate::app::{AppState, ErrorCategory, SelectorField};
use crate::theme;
use crate::ui::centered_rect;

/// Startup help overlay with the full key reference.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" cotview ")
        .title_style(theme::accent_bold());

    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "CFTC Commitment of Traders, net positions by trader group.",
            theme::text(),
        )),
        Line::from(""),
    ];
    section(&mut text, "Navigate");
    shortcut(&mut text, "Tab / Shift-Tab", "cycle panel focus");
    shortcut(&mut text, "1 / 2 / 3", "jump to Markets / Chart / Detail");
    shortcut(&mut text, "j / k", "move through the market list");
    shortcut(&mut text, "h / l", "step through report dates");
    text.push(Line::from(""));
    section(&mut text, "Search");
    shortcut(&mut text, "/", "edit the market filter");
    shortcut(&mut text, "Enter or Esc", "stop editing");
    shortcut(&mut text, "Esc", "clear the filter");
    text.push(Line::from(""));
    section(&mut text, "Data");
    shortcut(&mut text, "r", "choose report type and year");
    shortcut(&mut text, "e", "error history");
    shortcut(&mut text, "q", "quit");
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Press any key to dismiss...",
        theme::muted(),
    )));

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

fn section(lines: &mut Vec<Line>, title: &'static str) {
    lines.push(Line::from(Span::styled(title, theme::accent_bold())));
}

fn shortcut(lines: &mut Vec<Line>, key: &'static str, description: &'static str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {key:<16}"), theme::accent()),
        Span::styled(description, theme::muted()),
    ]));
}

/// Report type and year picker.
pub fn render_selector(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(50, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Load Report [Enter]fetch [Esc]cancel ")
        .title_style(theme::accent_bold());

    let sel = &app.selector;
    let type_focus = sel.field == SelectorField::ReportType;

    let mut lines = vec![Line::from("")];
    for (i, report_type) in ReportType::ALL.iter().enumerate() {
        let chosen = i == sel.report_idx;
        let marker = if chosen { "▸ " } else { "  " };
        let style = match (chosen, type_focus) {
            (true, true) => theme::accent_bold().add_modifier(Modifier::REVERSED),
            (true, false) => theme::accent_bold(),
            _ => theme::muted(),
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker}{} (since {})",
                report_type.label(),
                report_type.first_year()
            ),
            style,
        )));
    }

    lines.push(Line::from(""));
    let year_style = if type_focus {
        theme::muted()
    } else {
        theme::accent_bold().add_modifier(Modifier::REVERSED)
    };
    lines.push(Line::from(vec![
        Span::styled("  Year: ", theme::text()),
        Span::styled(format!("◂ {} ▸", sel.year), year_style),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  j/k switch field   h/l adjust",
        theme::muted(),
    )));

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, popup);
}

/// Error history overlay, newest entry on top.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(" Errors ({}) [j/k]scroll [Esc]close ", app.error_history.len()))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No errors this session.", theme::muted())),
            inner,
        );
        return;
    }

    // One line per error plus an indented line naming the fetch it belonged
    // to. The scroll cursor picks which entry sits at the top of the view.
    let mut lines: Vec<Line> = Vec::new();
    let mut top_line = 0;
    for (i, err) in app.error_history.iter().enumerate() {
        if i == app.error_scroll {
            top_line = lines.len();
        }
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), category_style(err.category)),
            Span::styled(&err.message, theme::text()),
        ]));
        if !err.context.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("           {}", err.context),
                theme::muted(),
            )));
        }
    }

    let para = Paragraph::new(lines).scroll((top_line as u16, 0));
    f.render_widget(para, inner);
}

fn category_style(category: ErrorCategory) -> Style {
    match category {
        ErrorCategory::Network => theme::warning(),
        ErrorCategory::Schema => theme::negative(),
        ErrorCategory::Data => theme::accent(),
    }
}
