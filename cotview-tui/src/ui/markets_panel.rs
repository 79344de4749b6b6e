//! Markets panel: search input line plus the ranked match list.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    render_search_line(f, chunks[0], app);
    render_match_list(f, chunks[1], app);
}

fn render_search_line(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans = vec![Span::styled("/ ", theme::accent())];

    if app.markets.query.is_empty() && !app.markets.editing {
        spans.push(Span::styled("press / to filter", theme::muted()));
    } else {
        spans.push(Span::styled(app.markets.query.as_str(), theme::accent_bold()));
    }
    if app.markets.editing {
        spans.push(Span::styled("_", theme::accent()));
    }
    if app.report.is_some() {
        spans.push(Span::styled(
            format!("  [{}]", app.match_count()),
            theme::muted(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_match_list(f: &mut Frame, area: Rect, app: &AppState) {
    if app.report.is_none() {
        let message = if app.loading {
            "Fetching report..."
        } else {
            "No report loaded. Press r to pick one."
        };
        f.render_widget(Paragraph::new(Span::styled(message, theme::muted())), area);
        return;
    }

    let matches = app.matches();
    if matches.is_empty() {
        let message = format!("No markets match {:?}.", app.markets.query);
        f.render_widget(Paragraph::new(Span::styled(message, theme::muted())), area);
        return;
    }

    let items: Vec<ListItem> = matches
        .iter()
        .map(|name| ListItem::new(Line::from(Span::styled(*name, theme::text()))))
        .collect();

    let list = List::new(items)
        .highlight_style(theme::accent_bold().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▌");

    let mut state = ListState::default().with_selected(Some(app.markets.cursor));
    f.render_stateful_widget(list, area, &mut state);
}
