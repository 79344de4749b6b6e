//! ReportRow — one market's positions for one report date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::TraderCategory;
use super::report::ReportType;

/// Long/short contract counts for one trader category.
///
/// Counts are non-negative by CFTC definition; the net is derived, never
/// stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sides {
    pub long: u64,
    pub short: u64,
}

impl Sides {
    pub fn new(long: u64, short: u64) -> Self {
        Self { long, short }
    }

    /// Net contracts, long minus short.
    pub fn net(&self) -> i64 {
        self.long as i64 - self.short as i64
    }
}

/// One market's data for one report date.
///
/// `market` is the canonical CFTC contract name, kept verbatim as it appeared
/// in the source (exchange suffix and all). The position map is complete for
/// the report type the row was mapped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub market: String,
    pub date: NaiveDate,
    pub open_interest: Option<u64>,
    pub positions: BTreeMap<TraderCategory, Sides>,
}

impl ReportRow {
    /// Positions for one category, if the row carries it.
    pub fn sides(&self, category: TraderCategory) -> Option<Sides> {
        self.positions.get(&category).copied()
    }

    /// True when every category of `report_type` has an entry.
    pub fn is_complete_for(&self, report_type: ReportType) -> bool {
        report_type
            .categories()
            .iter()
            .all(|c| self.positions.contains_key(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> ReportRow {
        let mut positions = BTreeMap::new();
        positions.insert(TraderCategory::Commercial, Sides::new(1000, 1500));
        positions.insert(TraderCategory::NonCommercial, Sides::new(800, 300));
        positions.insert(TraderCategory::NonReportable, Sides::new(200, 200));
        ReportRow {
            market: "GOLD - COMMODITY EXCHANGE INC.".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 11).unwrap(),
            open_interest: Some(450_000),
            positions,
        }
    }

    #[test]
    fn net_is_long_minus_short() {
        assert_eq!(Sides::new(1000, 1500).net(), -500);
        assert_eq!(Sides::new(1500, 1000).net(), 500);
        assert_eq!(Sides::default().net(), 0);
    }

    #[test]
    fn completeness_depends_on_report_type() {
        let row = sample_row();
        assert!(row.is_complete_for(ReportType::LegacyFuturesOnly));
        assert!(row.is_complete_for(ReportType::LegacyCombined));
        assert!(!row.is_complete_for(ReportType::DisaggregatedFutures));
    }

    #[test]
    fn row_serialization_roundtrip() {
        let row = sample_row();
        let json = serde_json::to_string(&row).unwrap();
        let deser: ReportRow = serde_json::from_str(&json).unwrap();
        assert_eq!(row, deser);
    }
}
