//! Detail panel: per-group long/short/net for the cursor date.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use cotview_core::positions;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(report) = &app.report else {
        render_message(f, area, "No report loaded.");
        return;
    };
    let Some(market) = app.selected_market() else {
        render_message(f, area, "No market selected.");
        return;
    };
    let Some(date) = app.selected_date() else {
        render_message(f, area, "No report dates for this market.");
        return;
    };
    let Some(row) = report.table.row_at(market, date) else {
        render_message(f, area, "No row for the selected date.");
        return;
    };

    let open_interest = match row.open_interest {
        Some(oi) => format_count(oi),
        None => "n/a".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(market.to_string(), theme::accent_bold())),
        Line::from(Span::styled(
            format!("{}  open interest {}", date, open_interest),
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{:<20} {:>12} {:>12} {:>12}", "Group", "Long", "Short", "Net"),
            theme::muted(),
        )),
    ];

    for (group, position) in positions::positions_for_row(report.report_type, row) {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<20}", group.label()), theme::group_style(group)),
            Span::styled(format!(" {:>12}", format_count(position.long)), theme::text()),
            Span::styled(format!(" {:>12}", format_count(position.short)), theme::text()),
            Span::styled(
                format!(" {:>12}", format_net(position.net)),
                theme::net_style(position.net),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_message(f: &mut Frame, area: Rect, message: &str) {
    let text = Span::styled(message.to_string(), theme::muted());
    f.render_widget(Paragraph::new(text), area);
}

/// Group digits in threes: 1234567 renders as 1,234,567.
fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_net(net: i64) -> String {
    if net >= 0 {
        format!("+{}", format_count(net as u64))
    } else {
        format!("-{}", format_count(net.unsigned_abs()))
    }
}
