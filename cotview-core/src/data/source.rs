//! Report source trait and the fetch error taxonomy.
//!
//! The ReportSource trait abstracts over where a raw table comes from (the
//! CFTC Socrata API, a downloaded CSV file) so the shells can swap sources
//! and tests can substitute fixtures.

use thiserror::Error;

use crate::domain::report::ReportType;

use super::raw::RawTable;

/// Why a fetch produced no table.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("file error: {0}")]
    Io(String),

    #[error("rate limited by the server")]
    RateLimited,

    #[error("server returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("response format not understood: {0}")]
    Decode(String),

    #[error("no {report} rows for {year}")]
    Empty { report: &'static str, year: i32 },
}

/// A place COT report tables come from.
///
/// One `fetch` call is a single attempt: implementations do not retry, and
/// the caller treats the call as blocking until it returns a table or an
/// error. Caching, if any, is the caller's business.
pub trait ReportSource: Send + Sync {
    /// Short human-readable source name for status lines.
    fn name(&self) -> &str;

    /// Load the raw table for one (report type, year) selection.
    fn fetch(&self, report_type: ReportType, year: i32) -> Result<RawTable, FetchError>;
}
