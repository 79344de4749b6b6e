//! Application state for the cotview TUI.
//!
//! All state lives on the main thread. The worker thread only ever sees
//! commands and responses; it never touches `AppState`.

use std::collections::VecDeque;
use std::sync::mpsc::Sender;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use cotview_core::data::LoadedReport;
use cotview_core::domain::ReportType;

use crate::worker::WorkerCommand;

/// Most recent errors kept for the error-history overlay.
const MAX_ERROR_HISTORY: usize = 50;

/// The three screen panels, in focus-cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Markets,
    Chart,
    Detail,
}

impl Panel {
    pub const COUNT: usize = 3;

    pub fn index(&self) -> usize {
        match self {
            Panel::Markets => 0,
            Panel::Chart => 1,
            Panel::Detail => 2,
        }
    }

    pub fn from_index(index: usize) -> Panel {
        match index % Panel::COUNT {
            0 => Panel::Markets,
            1 => Panel::Chart,
            _ => Panel::Detail,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Panel::Markets => "Markets",
            Panel::Chart => "Chart",
            Panel::Detail => "Detail",
        }
    }

    pub fn next(&self) -> Panel {
        Panel::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Panel {
        Panel::from_index(self.index() + Panel::COUNT - 1)
    }
}

/// Severity of the status-bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Where an error came from, shown as a short tag in the history overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Schema,
}

impl ErrorCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Schema => "SCHEMA",
        }
    }
}

/// One entry in the error history.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    /// Which report/year the error belongs to, empty when not applicable.
    pub context: String,
}

/// Modal overlays. At most one is visible; it consumes all input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    Selector,
    ErrorHistory,
}

/// Which field of the report selector holds focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorField {
    ReportType,
    Year,
}

/// State of the report/year selector overlay.
#[derive(Debug, Clone)]
pub struct SelectorState {
    pub report_idx: usize,
    pub year: i32,
    pub field: SelectorField,
    /// Upper bound for the year field (current calendar year).
    pub max_year: i32,
}

impl SelectorState {
    pub fn new(max_year: i32) -> Self {
        Self {
            report_idx: 0,
            year: max_year,
            field: SelectorField::ReportType,
            max_year,
        }
    }

    pub fn report_type(&self) -> ReportType {
        ReportType::ALL[self.report_idx]
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            SelectorField::ReportType => SelectorField::Year,
            SelectorField::Year => SelectorField::ReportType,
        };
    }

    /// Step the focused field. Year stays inside the dataset's coverage.
    pub fn adjust(&mut self, delta: i32) {
        match self.field {
            SelectorField::ReportType => {
                let len = ReportType::ALL.len() as i32;
                self.report_idx = (self.report_idx as i32 + delta).rem_euclid(len) as usize;
            }
            SelectorField::Year => {
                self.year += delta;
            }
        }
        self.clamp_year();
    }

    pub fn clamp_year(&mut self) {
        let first = self.report_type().first_year();
        self.year = self.year.clamp(first, self.max_year);
    }
}

/// Search/selection state of the Markets panel.
#[derive(Debug, Clone, Default)]
pub struct MarketsState {
    pub query: String,
    /// True while keystrokes edit the query instead of navigating.
    pub editing: bool,
    pub cursor: usize,
}

/// Date cursor of the Chart panel, indexing the selected market's dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartState {
    pub date_cursor: usize,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub active_panel: Panel,
    pub overlay: Overlay,

    pub report: Option<LoadedReport>,
    pub loading: bool,

    pub markets: MarketsState,
    pub chart: ChartState,
    pub selector: SelectorState,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,

    worker_tx: Sender<WorkerCommand>,
}

impl AppState {
    pub fn new(worker_tx: Sender<WorkerCommand>) -> Self {
        let max_year = chrono::Local::now().year();
        Self {
            running: true,
            active_panel: Panel::Markets,
            overlay: Overlay::Help,
            report: None,
            loading: false,
            markets: MarketsState::default(),
            chart: ChartState::default(),
            selector: SelectorState::new(max_year),
            status_message: None,
            error_history: VecDeque::new(),
            error_scroll: 0,
            worker_tx,
        }
    }

    // ── Status and errors ────────────────────────────────────────────

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), StatusLevel::Warning));
    }

    pub fn push_error(
        &mut self,
        category: ErrorCategory,
        message: impl Into<String>,
        context: impl Into<String>,
    ) {
        let message = message.into();
        self.error_history.push_front(ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context: context.into(),
        });
        while self.error_history.len() > MAX_ERROR_HISTORY {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    // ── Worker interaction ───────────────────────────────────────────

    /// Ask the worker for a report. Ignored while a fetch is in flight.
    pub fn request_load(&mut self, report_type: ReportType, year: i32) {
        if self.loading {
            self.set_warning("A fetch is already running");
            return;
        }
        self.loading = true;
        let _ = self.worker_tx.send(WorkerCommand::LoadReport { report_type, year });
        self.set_status(format!("Fetching {} {year}...", report_type.label()));
    }

    /// Adopt a freshly loaded report and reset selection to its contents.
    pub fn install_report(&mut self, report: LoadedReport) {
        self.loading = false;
        let summary = format!(
            "{} {}: {} markets, {} rows",
            report.report_type.label(),
            report.year,
            report.table.markets().len(),
            report.table.len(),
        );
        if report.skipped_rows > 0 || report.duplicate_rows > 0 {
            self.set_warning(format!(
                "{summary} ({} skipped, {} duplicate)",
                report.skipped_rows, report.duplicate_rows
            ));
        } else {
            self.set_status(summary);
        }
        self.report = Some(report);
        self.markets.cursor = 0;
        self.select_latest_date();
    }

    /// Sync the selector overlay with whatever report is on screen.
    pub fn open_selector(&mut self) {
        if let Some(report) = &self.report {
            if let Some(idx) = ReportType::ALL.iter().position(|rt| *rt == report.report_type) {
                self.selector.report_idx = idx;
            }
            self.selector.year = report.year;
        }
        self.selector.field = SelectorField::ReportType;
        self.selector.clamp_year();
        self.overlay = Overlay::Selector;
    }

    // ── Derived views ────────────────────────────────────────────────
    //
    // Recomputed on demand from the loaded report; nothing here is cached.

    /// Market names matching the current query, best match first.
    pub fn matches(&self) -> Vec<&str> {
        match &self.report {
            Some(report) => report.index.search(&self.markets.query),
            None => Vec::new(),
        }
    }

    pub fn match_count(&self) -> usize {
        self.matches().len()
    }

    pub fn selected_market(&self) -> Option<&str> {
        self.matches().get(self.markets.cursor).copied()
    }

    /// Report dates for the selected market, oldest first.
    pub fn market_dates(&self) -> Vec<NaiveDate> {
        let (Some(report), Some(market)) = (&self.report, self.selected_market()) else {
            return Vec::new();
        };
        report
            .table
            .rows_for_market(market)
            .iter()
            .map(|row| row.date)
            .collect()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.market_dates().get(self.chart.date_cursor).copied()
    }

    // ── Selection movement ───────────────────────────────────────────

    pub fn move_market(&mut self, delta: i64) {
        let count = self.match_count();
        if count == 0 {
            return;
        }
        let cursor = self.markets.cursor as i64 + delta;
        self.markets.cursor = cursor.clamp(0, count as i64 - 1) as usize;
        self.select_latest_date();
    }

    pub fn move_date(&mut self, delta: i64) {
        let count = self.market_dates().len();
        if count == 0 {
            return;
        }
        let cursor = self.chart.date_cursor as i64 + delta;
        self.chart.date_cursor = cursor.clamp(0, count as i64 - 1) as usize;
    }

    /// Reset the market cursor after the query changed.
    pub fn reset_selection(&mut self) {
        self.markets.cursor = 0;
        self.select_latest_date();
    }

    /// Snap the date cursor to the most recent report date.
    pub fn select_latest_date(&mut self) {
        self.chart.date_cursor = self.market_dates().len().saturating_sub(1);
    }
}
