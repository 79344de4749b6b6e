//! ReportTable — the canonical table for one (report type, year) selection.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::report::ReportType;
use super::row::ReportRow;

/// An ordered sequence of [`ReportRow`] for one (report type, year) selection.
///
/// Rows are unique per (market, date); when the source repeats a pair the
/// first occurrence wins. The order in which markets first appear is
/// preserved and exposed through [`ReportTable::markets`]; it is the final
/// tie-break of the search ranking.
#[derive(Debug, Clone)]
pub struct ReportTable {
    report_type: ReportType,
    year: i32,
    rows: Vec<ReportRow>,
    markets: Vec<String>,
}

impl ReportTable {
    /// Build a table from mapped rows, dropping duplicate (market, date)
    /// pairs. Returns the table and the number of duplicates dropped.
    pub fn new(report_type: ReportType, year: i32, rows: Vec<ReportRow>) -> (Self, usize) {
        let mut seen: HashSet<(String, NaiveDate)> = HashSet::with_capacity(rows.len());
        let mut markets: Vec<String> = Vec::new();
        let mut kept: Vec<ReportRow> = Vec::with_capacity(rows.len());
        let mut duplicates = 0usize;

        for row in rows {
            if seen.insert((row.market.clone(), row.date)) {
                if !markets.iter().any(|m| m == &row.market) {
                    markets.push(row.market.clone());
                }
                kept.push(row);
            } else {
                duplicates += 1;
            }
        }

        (Self { report_type, year, rows: kept, markets }, duplicates)
    }

    pub fn report_type(&self) -> ReportType {
        self.report_type
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct market names, order of first appearance.
    pub fn markets(&self) -> &[String] {
        &self.markets
    }

    /// All rows for one market (exact name match), dates ascending.
    pub fn rows_for_market(&self, market: &str) -> Vec<&ReportRow> {
        let mut rows: Vec<&ReportRow> =
            self.rows.iter().filter(|r| r.market == market).collect();
        rows.sort_by_key(|r| r.date);
        rows
    }

    /// The row for one (market, date) pair, if present.
    pub fn row_at(&self, market: &str, date: NaiveDate) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.market == market && r.date == date)
    }
}
