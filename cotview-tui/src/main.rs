//! cotview TUI: CFTC Commitment of Traders positions in the terminal.
//!
//! Panels:
//! 1. Markets: search and pick a market
//! 2. Chart: net position per trader group across the year
//! 3. Detail: long/short/net breakdown for the cursor date
//!
//! A single worker thread runs the blocking CFTC fetches; everything
//! else happens on the main thread.

mod app;
mod input;
mod panels;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use chrono::Datelike;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use cotview_core::data::{FetchError, LoadError};
use cotview_core::domain::ReportType;

use crate::app::{AppState, ErrorCategory};
use crate::worker::{WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx);

    let mut app = AppState::new(cmd_tx.clone());

    // Kick off the default view: this year's legacy futures-only report.
    app.request_load(ReportType::LegacyFuturesOnly, chrono::Local::now().year());

    // Terminal setup
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &resp_rx);

    // Terminal teardown
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Stop the worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    resp_rx: &mpsc::Receiver<WorkerResponse>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(response) = resp_rx.try_recv() {
            handle_worker_response(app, response);
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            return Ok(());
        }
    }
}

fn handle_worker_response(app: &mut AppState, response: WorkerResponse) {
    match response {
        WorkerResponse::ReportLoaded { report } => app.install_report(*report),
        WorkerResponse::LoadFailed {
            report_type,
            year,
            error,
        } => {
            app.loading = false;
            let category = match &error {
                LoadError::Fetch(
                    FetchError::Network(_) | FetchError::RateLimited | FetchError::HttpStatus { .. },
                ) => ErrorCategory::Network,
                LoadError::Fetch(_) => ErrorCategory::Data,
                LoadError::Schema(_) => ErrorCategory::Schema,
            };
            app.push_error(
                category,
                error.to_string(),
                format!("{} {year}", report_type.tag()),
            );
        }
    }
}
