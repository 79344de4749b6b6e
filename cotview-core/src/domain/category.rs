//! Trader categories and the chart-level groups they aggregate into.

use serde::{Deserialize, Serialize};

use super::report::ReportType;

/// Finest-grained trader category appearing in any report type.
///
/// A given report type carries only a subset of these (see
/// [`ReportType::categories`]); the enum is shared so rows from every format
/// fit one position map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TraderCategory {
    // Legacy taxonomy
    Commercial,
    NonCommercial,
    NonReportable,
    // Disaggregated taxonomy
    ProducerMerchant,
    SwapDealer,
    MoneyManager,
    // Financial (TFF) taxonomy
    Dealer,
    AssetManager,
    LeveragedFunds,
    // Shared by disaggregated and financial
    OtherReportable,
}

impl TraderCategory {
    pub fn label(&self) -> &'static str {
        match self {
            TraderCategory::Commercial => "Commercial",
            TraderCategory::NonCommercial => "Non-Commercial",
            TraderCategory::NonReportable => "Non-Reportable",
            TraderCategory::ProducerMerchant => "Producer/Merchant",
            TraderCategory::SwapDealer => "Swap Dealer",
            TraderCategory::MoneyManager => "Money Manager",
            TraderCategory::Dealer => "Dealer",
            TraderCategory::AssetManager => "Asset Manager",
            TraderCategory::LeveragedFunds => "Leveraged Funds",
            TraderCategory::OtherReportable => "Other Reportable",
        }
    }
}

/// Chart-level trader group.
///
/// The three groups of the classic COT chart. Net positions are always
/// reported per group; which categories feed a group depends on the report
/// type and is fixed by [`TraderGroup::members`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TraderGroup {
    Commercial,
    LargeSpeculator,
    SmallSpeculator,
}

impl TraderGroup {
    /// All groups, chart order.
    pub const ALL: [TraderGroup; 3] = [
        TraderGroup::Commercial,
        TraderGroup::LargeSpeculator,
        TraderGroup::SmallSpeculator,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TraderGroup::Commercial => "Commercials",
            TraderGroup::LargeSpeculator => "Large Speculators",
            TraderGroup::SmallSpeculator => "Small Speculators",
        }
    }

    /// The categories summed into this group for the given report type.
    ///
    /// This is the aggregation business rule, declared here rather than
    /// inferred from data. An empty slice means the group does not exist in
    /// that report type's taxonomy (there is no non-reportable breakdown in
    /// the disaggregated and financial formats).
    pub fn members(&self, report_type: ReportType) -> &'static [TraderCategory] {
        use ReportType::*;
        use TraderCategory::*;
        match (report_type, self) {
            (LegacyFuturesOnly | LegacyCombined, TraderGroup::Commercial) => &[Commercial],
            (LegacyFuturesOnly | LegacyCombined, TraderGroup::LargeSpeculator) => &[NonCommercial],
            (LegacyFuturesOnly | LegacyCombined, TraderGroup::SmallSpeculator) => &[NonReportable],

            (DisaggregatedFutures, TraderGroup::Commercial) => &[ProducerMerchant, SwapDealer],
            (DisaggregatedFutures, TraderGroup::LargeSpeculator) => {
                &[MoneyManager, OtherReportable]
            }
            (DisaggregatedFutures, TraderGroup::SmallSpeculator) => &[],

            (FinancialFutures, TraderGroup::Commercial) => &[Dealer],
            (FinancialFutures, TraderGroup::LargeSpeculator) => {
                &[AssetManager, LeveragedFunds, OtherReportable]
            }
            (FinancialFutures, TraderGroup::SmallSpeculator) => &[],
        }
    }
}

/// The groups present in a report type's taxonomy, chart order.
pub fn groups_for(report_type: ReportType) -> Vec<TraderGroup> {
    TraderGroup::ALL
        .iter()
        .copied()
        .filter(|g| !g.members(report_type).is_empty())
        .collect()
}
