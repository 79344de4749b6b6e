//! Keyboard handling.
//!
//! Dispatch order: overlays swallow everything, then search editing,
//! then global keys, then the focused panel.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{AppState, Overlay, Panel};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Terminals that report key releases would double every press.
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Selector => {
            handle_selector_key(app, key);
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_history_key(app, key);
            return;
        }
        Overlay::None => {}
    }

    if app.markets.editing {
        handle_search_editing(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => {
            app.active_panel = Panel::Markets;
            return;
        }
        KeyCode::Char('2') => {
            app.active_panel = Panel::Chart;
            return;
        }
        KeyCode::Char('3') => {
            app.active_panel = Panel::Detail;
            return;
        }
        KeyCode::Tab => {
            app.active_panel = app.active_panel.next();
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('/') => {
            app.active_panel = Panel::Markets;
            app.markets.editing = true;
            return;
        }
        KeyCode::Char('r') => {
            app.open_selector();
            return;
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        _ => {}
    }

    match app.active_panel {
        Panel::Markets => handle_markets_key(app, key),
        // Date navigation works from both the chart and the detail view.
        Panel::Chart | Panel::Detail => handle_date_key(app, key),
    }
}

fn handle_search_editing(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.markets.editing = false,
        KeyCode::Backspace => {
            app.markets.query.pop();
            app.reset_selection();
        }
        KeyCode::Down => app.move_market(1),
        KeyCode::Up => app.move_market(-1),
        KeyCode::Char(c) => {
            app.markets.query.push(c);
            app.reset_selection();
        }
        _ => {}
    }
}

fn handle_markets_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_market(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_market(-1),
        KeyCode::Enter => app.active_panel = Panel::Chart,
        KeyCode::Esc => {
            if !app.markets.query.is_empty() {
                app.markets.query.clear();
                app.reset_selection();
            }
        }
        _ => {}
    }
}

fn handle_date_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.move_date(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_date(1),
        _ => {}
    }
}

fn handle_selector_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.overlay = Overlay::None,
        KeyCode::Tab
        | KeyCode::Char('j')
        | KeyCode::Char('k')
        | KeyCode::Down
        | KeyCode::Up => app.selector.toggle_field(),
        KeyCode::Char('h') | KeyCode::Left => app.selector.adjust(-1),
        KeyCode::Char('l') | KeyCode::Right => app.selector.adjust(1),
        KeyCode::Enter => {
            let report_type = app.selector.report_type();
            let year = app.selector.year;
            app.overlay = Overlay::None;
            app.request_load(report_type, year);
        }
        _ => {}
    }
}

fn handle_error_history_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let max = app.error_history.len().saturating_sub(1);
            app.error_scroll = (app.error_scroll + 1).min(max);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use crossterm::event::KeyModifiers;

    use crate::app::ErrorCategory;
    use crate::worker::WorkerCommand;
    use cotview_core::domain::ReportType;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_channel() -> (AppState, mpsc::Receiver<WorkerCommand>) {
        let (tx, rx) = mpsc::channel();
        let mut app = AppState::new(tx);
        app.overlay = Overlay::None;
        (app, rx)
    }

    #[test]
    fn q_quits_when_not_editing() {
        let (mut app, _rx) = app_with_channel();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn slash_enters_editing_and_keys_type_instead_of_acting() {
        let (mut app, _rx) = app_with_channel();
        handle_key(&mut app, press(KeyCode::Char('/')));
        assert!(app.markets.editing);
        assert_eq!(app.active_panel, Panel::Markets);

        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.running, "q must type, not quit, while editing");
        assert_eq!(app.markets.query, "q");

        handle_key(&mut app, press(KeyCode::Enter));
        assert!(!app.markets.editing);
        assert_eq!(app.markets.query, "q");
    }

    #[test]
    fn escape_clears_the_query_in_the_markets_panel() {
        let (mut app, _rx) = app_with_channel();
        app.markets.query = "wheat".to_string();
        handle_key(&mut app, press(KeyCode::Esc));
        assert!(app.markets.query.is_empty());
    }

    #[test]
    fn tab_cycles_panels() {
        let (mut app, _rx) = app_with_channel();
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Chart);
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Detail);
        handle_key(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_panel, Panel::Chart);
    }

    #[test]
    fn help_overlay_closes_on_any_key() {
        let (mut app, _rx) = app_with_channel();
        app.overlay = Overlay::Help;
        handle_key(&mut app, press(KeyCode::Char('x')));
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn selector_enter_confirms_and_requests_a_fetch() {
        let (mut app, rx) = app_with_channel();
        handle_key(&mut app, press(KeyCode::Char('r')));
        assert_eq!(app.overlay, Overlay::Selector);

        // Switch to the second report type, then bump the year down.
        handle_key(&mut app, press(KeyCode::Char('l')));
        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Char('h')));
        handle_key(&mut app, press(KeyCode::Enter));

        assert_eq!(app.overlay, Overlay::None);
        assert!(app.loading);
        match rx.try_recv().unwrap() {
            WorkerCommand::LoadReport { report_type, year } => {
                assert_eq!(report_type, ReportType::LegacyCombined);
                assert_eq!(year, app.selector.max_year - 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn error_history_scroll_stays_in_bounds() {
        let (mut app, _rx) = app_with_channel();
        app.push_error(ErrorCategory::Network, "one", "");
        app.push_error(ErrorCategory::Data, "two", "");
        handle_key(&mut app, press(KeyCode::Char('e')));
        assert_eq!(app.overlay, Overlay::ErrorHistory);

        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.error_scroll, 1);
        handle_key(&mut app, press(KeyCode::Char('k')));
        handle_key(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.error_scroll, 0);

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
    }
}
