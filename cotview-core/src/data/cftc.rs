//! CFTC Socrata API source.
//!
//! Fetches COT report rows from publicreporting.cftc.gov. Each report type is
//! its own Socrata dataset; a fetch selects one calendar year with a `$where`
//! window and pages through it with `$limit`/`$offset`. Paging is part of one
//! logical fetch; there is no retry of failed requests.

use std::time::Duration;

use serde_json::Value;

use crate::domain::report::ReportType;

use super::raw::RawTable;
use super::source::{FetchError, ReportSource};

const DEFAULT_BASE_URL: &str = "https://publicreporting.cftc.gov/resource";
const PAGE_SIZE: usize = 5000;

type Record = serde_json::Map<String, Value>;

/// Blocking client for the CFTC public reporting API.
pub struct CftcSocrata {
    client: reqwest::blocking::Client,
    base_url: String,
    page_size: usize,
}

impl CftcSocrata {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different base URL (tests, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("cotview/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self { client, base_url: base_url.into(), page_size: PAGE_SIZE }
    }

    /// Resource URL for a report type's dataset.
    fn resource_url(&self, report_type: ReportType) -> String {
        format!("{}/{}.json", self.base_url.trim_end_matches('/'), report_type.dataset_id())
    }

    /// `$where` clause selecting one calendar year of report dates.
    fn year_window(year: i32) -> String {
        format!(
            "report_date_as_yyyy_mm_dd between '{year}-01-01T00:00:00.000' \
             and '{year}-12-31T23:59:59.999'"
        )
    }

    /// Fetch one page of records at the given offset.
    fn fetch_page(
        &self,
        report_type: ReportType,
        year: i32,
        offset: usize,
    ) -> Result<Vec<Record>, FetchError> {
        let response = self
            .client
            .get(self.resource_url(report_type))
            .query(&[
                ("$where", Self::year_window(year)),
                ("$order", "report_date_as_yyyy_mm_dd DESC".to_string()),
                ("$limit", self.page_size.to_string()),
                ("$offset", offset.to_string()),
            ])
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::HttpStatus { status: status.as_u16() });
        }

        response
            .json::<Vec<Record>>()
            .map_err(|e| FetchError::Decode(format!("{} response: {e}", report_type.dataset_id())))
    }
}

impl Default for CftcSocrata {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSource for CftcSocrata {
    fn name(&self) -> &str {
        "cftc_socrata"
    }

    fn fetch(&self, report_type: ReportType, year: i32) -> Result<RawTable, FetchError> {
        let records = fetch_all(self.page_size, |offset| {
            self.fetch_page(report_type, year, offset)
        })?;

        if records.is_empty() {
            return Err(FetchError::Empty { report: report_type.label(), year });
        }

        let mut raw = RawTable::new();
        for record in &records {
            push_record(&mut raw, record);
        }
        Ok(raw)
    }
}

/// Page through `fetch_page` from offset 0 until a short page.
fn fetch_all<F>(page_size: usize, mut fetch_page: F) -> Result<Vec<Record>, FetchError>
where
    F: FnMut(usize) -> Result<Vec<Record>, FetchError>,
{
    let mut records = Vec::new();
    let mut offset = 0usize;
    loop {
        let page = fetch_page(offset)?;
        let fetched = page.len();
        records.extend(page);
        if fetched < page_size {
            return Ok(records);
        }
        offset += fetched;
    }
}

/// Append one JSON record to the raw table.
///
/// Socrata serves numerics as strings but some mirrors return raw numbers;
/// both become cell text. Nulls and composite values are skipped.
fn push_record(raw: &mut RawTable, record: &Record) {
    raw.push_record(record.iter().filter_map(|(key, value)| {
        let cell = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => return None,
        };
        Some((key.as_str(), cell))
    }));
}
