//! Report types — the four CFTC COT report formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::category::TraderCategory;

/// One of the four CFTC report formats.
///
/// Each format is published as its own Socrata dataset and carries its own
/// trader-category taxonomy: the legacy pair uses the classic three-way
/// commercial / non-commercial / non-reportable split, the disaggregated and
/// financial formats break the reportable side into finer categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    LegacyFuturesOnly,
    LegacyCombined,
    DisaggregatedFutures,
    FinancialFutures,
}

impl ReportType {
    /// All report types, selector order.
    pub const ALL: [ReportType; 4] = [
        ReportType::LegacyFuturesOnly,
        ReportType::LegacyCombined,
        ReportType::DisaggregatedFutures,
        ReportType::FinancialFutures,
    ];

    /// Socrata dataset id under publicreporting.cftc.gov.
    pub fn dataset_id(&self) -> &'static str {
        match self {
            ReportType::LegacyFuturesOnly => "6dca-aqww",
            ReportType::LegacyCombined => "jun7-fc8e",
            ReportType::DisaggregatedFutures => "kh3c-gbw2",
            ReportType::FinancialFutures => "yw9f-hn96",
        }
    }

    /// Human-readable report name.
    pub fn label(&self) -> &'static str {
        match self {
            ReportType::LegacyFuturesOnly => "Legacy Futures Only",
            ReportType::LegacyCombined => "Legacy Combined (Futures + Options)",
            ReportType::DisaggregatedFutures => "Disaggregated Futures",
            ReportType::FinancialFutures => "Financial Futures (TFF)",
        }
    }

    /// Stable identifier used on the command line.
    pub fn tag(&self) -> &'static str {
        match self {
            ReportType::LegacyFuturesOnly => "legacy_fut",
            ReportType::LegacyCombined => "legacy_combined",
            ReportType::DisaggregatedFutures => "disaggregated_fut",
            ReportType::FinancialFutures => "tff_fut",
        }
    }

    /// First calendar year with published data.
    ///
    /// The legacy formats go back to 1986; the disaggregated and financial
    /// formats were introduced in 2009.
    pub fn first_year(&self) -> i32 {
        match self {
            ReportType::LegacyFuturesOnly | ReportType::LegacyCombined => 1986,
            ReportType::DisaggregatedFutures | ReportType::FinancialFutures => 2009,
        }
    }

    /// The finest-grained trader categories this report type carries.
    ///
    /// Every mapped row of this report type has a long/short pair for each of
    /// these categories, in this order.
    pub fn categories(&self) -> &'static [TraderCategory] {
        match self {
            ReportType::LegacyFuturesOnly | ReportType::LegacyCombined => &[
                TraderCategory::Commercial,
                TraderCategory::NonCommercial,
                TraderCategory::NonReportable,
            ],
            ReportType::DisaggregatedFutures => &[
                TraderCategory::ProducerMerchant,
                TraderCategory::SwapDealer,
                TraderCategory::MoneyManager,
                TraderCategory::OtherReportable,
            ],
            ReportType::FinancialFutures => &[
                TraderCategory::Dealer,
                TraderCategory::AssetManager,
                TraderCategory::LeveragedFunds,
                TraderCategory::OtherReportable,
            ],
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown report type {input:?} (expected one of: legacy_fut, legacy_combined, disaggregated_fut, tff_fut)")]
pub struct ParseReportTypeError {
    pub input: String,
}

impl FromStr for ReportType {
    type Err = ParseReportTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportType::ALL
            .iter()
            .find(|t| t.tag().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ParseReportTypeError { input: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_ids_are_distinct() {
        let ids: std::collections::HashSet<_> =
            ReportType::ALL.iter().map(|t| t.dataset_id()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn legacy_starts_1986_newer_formats_2009() {
        assert_eq!(ReportType::LegacyFuturesOnly.first_year(), 1986);
        assert_eq!(ReportType::LegacyCombined.first_year(), 1986);
        assert_eq!(ReportType::DisaggregatedFutures.first_year(), 2009);
        assert_eq!(ReportType::FinancialFutures.first_year(), 2009);
    }

    #[test]
    fn tags_round_trip_through_from_str() {
        for t in ReportType::ALL {
            assert_eq!(t.tag().parse::<ReportType>(), Ok(t));
        }
    }

    #[test]
    fn from_str_is_case_insensitive_and_trims() {
        assert_eq!(" LEGACY_FUT ".parse::<ReportType>(), Ok(ReportType::LegacyFuturesOnly));
        assert!("legacy".parse::<ReportType>().is_err());
    }

    #[test]
    fn legacy_and_combined_share_a_taxonomy() {
        assert_eq!(
            ReportType::LegacyFuturesOnly.categories(),
            ReportType::LegacyCombined.categories()
        );
        assert_eq!(ReportType::DisaggregatedFutures.categories().len(), 4);
        assert_eq!(ReportType::FinancialFutures.categories().len(), 4);
    }
}
