//! One-shot load pipeline: fetch a raw table, map it onto the canonical
//! schema, and build the search index the UI layers query.

use thiserror::Error;

use crate::domain::report::ReportType;
use crate::domain::table::ReportTable;
use crate::search::MarketSearchIndex;

use super::schema::{self, SchemaError};
use super::source::{FetchError, ReportSource};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A fully prepared report: the canonical table plus its search index and
/// the row counts dropped on the way in.
#[derive(Debug)]
pub struct LoadedReport {
    pub report_type: ReportType,
    pub year: i32,
    /// Name of the source that produced the table.
    pub source: String,
    pub table: ReportTable,
    pub index: MarketSearchIndex,
    pub skipped_rows: usize,
    pub duplicate_rows: usize,
}

/// Fetch one (report type, year) selection and prepare it for querying.
///
/// Exactly one fetch attempt is made; a failure is returned as-is with no
/// retry. The index is rebuilt from scratch on every load, so a caller that
/// replaces its current `LoadedReport` never holds an index for a table
/// that is gone.
pub fn load_report(
    source: &dyn ReportSource,
    report_type: ReportType,
    year: i32,
) -> Result<LoadedReport, LoadError> {
    let raw = source.fetch(report_type, year)?;
    let mapped = schema::map_table(report_type, &raw, year)?;
    let index = MarketSearchIndex::new(mapped.table.markets().iter().cloned());
    Ok(LoadedReport {
        report_type,
        year,
        source: source.name().to_string(),
        table: mapped.table,
        index,
        skipped_rows: mapped.skipped_rows,
        duplicate_rows: mapped.duplicate_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::raw::RawTable;

    struct FixedSource {
        raw: RawTable,
    }

    impl ReportSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, _report_type: ReportType, _year: i32) -> Result<RawTable, FetchError> {
            Ok(self.raw.clone())
        }
    }

    struct FailingSource;

    impl ReportSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch(&self, _report_type: ReportType, _year: i32) -> Result<RawTable, FetchError> {
            Err(FetchError::RateLimited)
        }
    }

    fn legacy_raw() -> RawTable {
        let mut raw = RawTable::new();
        for market in ["WHEAT-SRW", "GOLD"] {
            raw.push_record([
                ("market_and_exchange_names", market),
                ("report_date_as_yyyy_mm_dd", "2024-06-11"),
                ("comm_positions_long_all", "1000"),
                ("comm_positions_short_all", "1500"),
                ("noncomm_positions_long_all", "800"),
                ("noncomm_positions_short_all", "300"),
                ("nonrept_positions_long_all", "200"),
                ("nonrept_positions_short_all", "200"),
            ]);
        }
        raw
    }

    #[test]
    fn load_builds_table_and_index_together() {
        let source = FixedSource { raw: legacy_raw() };
        let loaded = load_report(&source, ReportType::LegacyFuturesOnly, 2024).unwrap();
        assert_eq!(loaded.source, "fixed");
        assert_eq!(loaded.table.len(), 2);
        assert_eq!(loaded.index.names(), loaded.table.markets());
        assert_eq!(loaded.skipped_rows, 0);
        assert_eq!(loaded.duplicate_rows, 0);
    }

    #[test]
    fn fetch_failure_is_returned_without_a_table() {
        let err = load_report(&FailingSource, ReportType::LegacyFuturesOnly, 2024).unwrap_err();
        assert!(matches!(err, LoadError::Fetch(FetchError::RateLimited)));
    }

    #[test]
    fn schema_failure_carries_the_missing_column() {
        let mut raw = RawTable::new();
        raw.push_record([("market_and_exchange_names", "GOLD")]);
        let source = FixedSource { raw };
        let err = load_report(&source, ReportType::LegacyFuturesOnly, 2024).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Schema(SchemaError::MissingColumn { column: "report date", .. })
        ));
    }
}
