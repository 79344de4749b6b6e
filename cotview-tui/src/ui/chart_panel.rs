//! Chart panel: grouped net-position bars for the selected market.

use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use cotview_core::positions;

use crate::app::AppState;
use crate::panels::{DateCluster, NetChart};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(report) = &app.report else {
        render_message(f, area, "Load a report to see net positions.");
        return;
    };
    let Some(market) = app.selected_market() else {
        render_message(f, area, "Select a market in the Markets panel.");
        return;
    };

    match positions::net_series(&report.table, market) {
        Ok(series) => {
            let clusters: Vec<DateCluster> = series
                .into_iter()
                .map(|(date, groups)| DateCluster {
                    date,
                    nets: groups.into_iter().map(|(group, p)| (group, p.net)).collect(),
                })
                .collect();
            f.render_widget(NetChart::new(&clusters, app.chart.date_cursor), area);
        }
        Err(err) => render_message(f, area, &err.to_string()),
    }
}

fn render_message(f: &mut Frame, area: Rect, message: &str) {
    let text = Span::styled(message.to_string(), theme::muted());
    f.render_widget(Paragraph::new(text), area);
}
