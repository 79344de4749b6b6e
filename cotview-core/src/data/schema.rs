//! Column mapper — heterogeneous source columns onto the canonical schema.
//!
//! COT data arrives under three header dialects: the Socrata API's lowercase
//! field names, the CamelCase headers of CFTC CSV downloads, and the
//! human-readable headers of spreadsheet exports. Each canonical column keeps
//! an ordered candidate list across the dialects; the first header present in
//! the raw table wins. A required column missing under every alias fails the
//! whole mapping; a single bad row is skipped and counted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::category::TraderCategory;
use crate::domain::report::ReportType;
use crate::domain::row::{ReportRow, Sides};
use crate::domain::table::ReportTable;

use super::raw::RawTable;

/// One canonical column and the source headers that can carry it.
struct ColumnSpec {
    canonical: &'static str,
    candidates: &'static [&'static str],
}

struct CategoryColumns {
    category: TraderCategory,
    long: ColumnSpec,
    short: ColumnSpec,
}

const MARKET: ColumnSpec = ColumnSpec {
    canonical: "market name",
    candidates: &[
        "market_and_exchange_names",
        "Market_and_Exchange_Names",
        "Market and Exchange Names",
    ],
};

const DATE: ColumnSpec = ColumnSpec {
    canonical: "report date",
    candidates: &[
        "report_date_as_yyyy_mm_dd",
        "Report_Date_as_YYYY_MM_DD",
        "As of Date in Form YYYY-MM-DD",
        "Report_Date_as_MM_DD_YYYY",
    ],
};

const OPEN_INTEREST: ColumnSpec = ColumnSpec {
    canonical: "open interest",
    candidates: &["open_interest_all", "Open_Interest_All", "Open Interest (All)"],
};

const LEGACY_COLUMNS: &[CategoryColumns] = &[
    CategoryColumns {
        category: TraderCategory::Commercial,
        long: ColumnSpec {
            canonical: "commercial long",
            candidates: &[
                "comm_positions_long_all",
                "Comm_Positions_Long_All",
                "Commercial Positions-Long (All)",
            ],
        },
        short: ColumnSpec {
            canonical: "commercial short",
            candidates: &[
                "comm_positions_short_all",
                "Comm_Positions_Short_All",
                "Commercial Positions-Short (All)",
            ],
        },
    },
    CategoryColumns {
        category: TraderCategory::NonCommercial,
        long: ColumnSpec {
            canonical: "non-commercial long",
            candidates: &[
                "noncomm_positions_long_all",
                "NonComm_Positions_Long_All",
                "Noncommercial Positions-Long (All)",
            ],
        },
        short: ColumnSpec {
            canonical: "non-commercial short",
            candidates: &[
                "noncomm_positions_short_all",
                "NonComm_Positions_Short_All",
                "Noncommercial Positions-Short (All)",
            ],
        },
    },
    CategoryColumns {
        category: TraderCategory::NonReportable,
        long: ColumnSpec {
            canonical: "non-reportable long",
            candidates: &[
                "nonrept_positions_long_all",
                "NonRept_Positions_Long_All",
                "Nonreportable Positions-Long (All)",
            ],
        },
        short: ColumnSpec {
            canonical: "non-reportable short",
            candidates: &[
                "nonrept_positions_short_all",
                "NonRept_Positions_Short_All",
                "Nonreportable Positions-Short (All)",
            ],
        },
    },
];

// The disaggregated dataset carries a CFTC header quirk: the swap dealer
// short column has a doubled underscore in both the API field and the CSV
// header. Both spellings are accepted.
const DISAGGREGATED_COLUMNS: &[CategoryColumns] = &[
    CategoryColumns {
        category: TraderCategory::ProducerMerchant,
        long: ColumnSpec {
            canonical: "producer/merchant long",
            candidates: &[
                "prod_merc_positions_long",
                "prod_merc_positions_long_all",
                "Prod_Merc_Positions_Long_All",
            ],
        },
        short: ColumnSpec {
            canonical: "producer/merchant short",
            candidates: &[
                "prod_merc_positions_short",
                "prod_merc_positions_short_all",
                "Prod_Merc_Positions_Short_All",
            ],
        },
    },
    CategoryColumns {
        category: TraderCategory::SwapDealer,
        long: ColumnSpec {
            canonical: "swap dealer long",
            candidates: &[
                "swap_positions_long_all",
                "swap_positions_long",
                "Swap_Positions_Long_All",
            ],
        },
        short: ColumnSpec {
            canonical: "swap dealer short",
            candidates: &[
                "swap__positions_short_all",
                "swap_positions_short_all",
                "Swap__Positions_Short_All",
                "Swap_Positions_Short_All",
            ],
        },
    },
    CategoryColumns {
        category: TraderCategory::MoneyManager,
        long: ColumnSpec {
            canonical: "money manager long",
            candidates: &[
                "m_money_positions_long_all",
                "m_money_positions_long",
                "M_Money_Positions_Long_All",
            ],
        },
        short: ColumnSpec {
            canonical: "money manager short",
            candidates: &[
                "m_money_positions_short_all",
                "m_money_positions_short",
                "M_Money_Positions_Short_All",
            ],
        },
    },
    CategoryColumns {
        category: TraderCategory::OtherReportable,
        long: ColumnSpec {
            canonical: "other reportable long",
            candidates: &[
                "other_rept_positions_long",
                "other_rept_positions_long_all",
                "Other_Rept_Positions_Long_All",
            ],
        },
        short: ColumnSpec {
            canonical: "other reportable short",
            candidates: &[
                "other_rept_positions_short",
                "other_rept_positions_short_all",
                "Other_Rept_Positions_Short_All",
            ],
        },
    },
];

const FINANCIAL_COLUMNS: &[CategoryColumns] = &[
    CategoryColumns {
        category: TraderCategory::Dealer,
        long: ColumnSpec {
            canonical: "dealer long",
            candidates: &[
                "dealer_positions_long_all",
                "dealer_positions_long",
                "Dealer_Positions_Long_All",
            ],
        },
        short: ColumnSpec {
            canonical: "dealer short",
            candidates: &[
                "dealer_positions_short_all",
                "dealer_positions_short",
                "Dealer_Positions_Short_All",
            ],
        },
    },
    CategoryColumns {
        category: TraderCategory::AssetManager,
        long: ColumnSpec {
            canonical: "asset manager long",
            candidates: &[
                "asset_mgr_positions_long",
                "asset_mgr_positions_long_all",
                "Asset_Mgr_Positions_Long_All",
            ],
        },
        short: ColumnSpec {
            canonical: "asset manager short",
            candidates: &[
                "asset_mgr_positions_short",
                "asset_mgr_positions_short_all",
                "Asset_Mgr_Positions_Short_All",
            ],
        },
    },
    CategoryColumns {
        category: TraderCategory::LeveragedFunds,
        long: ColumnSpec {
            canonical: "leveraged funds long",
            candidates: &[
                "lev_money_positions_long",
                "lev_money_positions_long_all",
                "Lev_Money_Positions_Long_All",
            ],
        },
        short: ColumnSpec {
            canonical: "leveraged funds short",
            candidates: &[
                "lev_money_positions_short",
                "lev_money_positions_short_all",
                "Lev_Money_Positions_Short_All",
            ],
        },
    },
    CategoryColumns {
        category: TraderCategory::OtherReportable,
        long: ColumnSpec {
            canonical: "other reportable long",
            candidates: &[
                "other_rept_positions_long",
                "other_rept_positions_long_all",
                "Other_Rept_Positions_Long_All",
            ],
        },
        short: ColumnSpec {
            canonical: "other reportable short",
            candidates: &[
                "other_rept_positions_short",
                "other_rept_positions_short_all",
                "Other_Rept_Positions_Short_All",
            ],
        },
    },
];

fn category_columns(report_type: ReportType) -> &'static [CategoryColumns] {
    match report_type {
        ReportType::LegacyFuturesOnly | ReportType::LegacyCombined => LEGACY_COLUMNS,
        ReportType::DisaggregatedFutures => DISAGGREGATED_COLUMNS,
        ReportType::FinancialFutures => FINANCIAL_COLUMNS,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column {column:?} for {report}")]
    MissingColumn { column: &'static str, report: &'static str },
}

/// Output of one mapping pass.
#[derive(Debug)]
pub struct MappedReport {
    pub table: ReportTable,
    /// Rows dropped because a required cell was blank or unparseable.
    pub skipped_rows: usize,
    /// Rows dropped as duplicate (market, date) pairs.
    pub duplicate_rows: usize,
}

/// Map a raw table onto the canonical schema for one report type.
pub fn map_table(
    report_type: ReportType,
    raw: &RawTable,
    year: i32,
) -> Result<MappedReport, SchemaError> {
    let ids = ColumnIds::resolve(report_type, raw)?;

    let mut rows = Vec::with_capacity(raw.len());
    let mut skipped_rows = 0usize;
    for i in 0..raw.len() {
        match ids.parse_row(raw, i) {
            Some(row) => rows.push(row),
            None => skipped_rows += 1,
        }
    }

    let (table, duplicate_rows) = ReportTable::new(report_type, year, rows);
    Ok(MappedReport { table, skipped_rows, duplicate_rows })
}

/// Resolved column ids for one raw table.
struct ColumnIds {
    market: usize,
    date: usize,
    open_interest: Option<usize>,
    categories: Vec<(TraderCategory, usize, usize)>,
}

impl ColumnIds {
    fn resolve(report_type: ReportType, raw: &RawTable) -> Result<Self, SchemaError> {
        let market = resolve_required(&MARKET, report_type, raw)?;
        let date = resolve_required(&DATE, report_type, raw)?;
        let open_interest = resolve(&OPEN_INTEREST, raw);

        let mut categories = Vec::new();
        for columns in category_columns(report_type) {
            let long = resolve_required(&columns.long, report_type, raw)?;
            let short = resolve_required(&columns.short, report_type, raw)?;
            categories.push((columns.category, long, short));
        }

        Ok(Self { market, date, open_interest, categories })
    }

    /// Parse one raw row; `None` skips it.
    fn parse_row(&self, raw: &RawTable, row: usize) -> Option<ReportRow> {
        let market = raw.cell(row, self.market)?;
        if market.trim().is_empty() {
            return None;
        }

        let date = parse_date(raw.cell(row, self.date)?)?;

        let mut positions = BTreeMap::new();
        for &(category, long_id, short_id) in &self.categories {
            let long = parse_count(raw.cell(row, long_id)?)?;
            let short = parse_count(raw.cell(row, short_id)?)?;
            positions.insert(category, Sides::new(long, short));
        }

        let open_interest =
            self.open_interest.and_then(|id| raw.cell(row, id)).and_then(parse_count);

        Some(ReportRow { market: market.to_string(), date, open_interest, positions })
    }
}

fn resolve(spec: &ColumnSpec, raw: &RawTable) -> Option<usize> {
    spec.candidates.iter().find_map(|name| raw.column_index(name))
}

fn resolve_required(
    spec: &ColumnSpec,
    report_type: ReportType,
    raw: &RawTable,
) -> Result<usize, SchemaError> {
    resolve(spec, raw).ok_or(SchemaError::MissingColumn {
        column: spec.canonical,
        report: report_type.label(),
    })
}

/// Parse a contract count, tolerating `1,234`, `$`, and `%` decorations and
/// whole-number decimal tails. Negative values fail: counts are non-negative.
fn parse_count(cell: &str) -> Option<u64> {
    let cleaned: String =
        cell.chars().filter(|&c| c != ',' && c != '$' && c != '%').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(n) = cleaned.parse::<u64>() {
        return Some(n);
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Some(f as u64),
        _ => None,
    }
}

/// Parse a report date: Socrata floating timestamps
/// (`2024-01-02T00:00:00.000`), plain ISO, or `MM/DD/YYYY`.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    let head = cell.split(|c| c == 'T' || c == ' ').next().unwrap_or(cell);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%m/%d/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn socrata_legacy_raw() -> RawTable {
        let mut raw = RawTable::new();
        raw.push_record([
            ("market_and_exchange_names", "WHEAT-SRW - CHICAGO BOARD OF TRADE"),
            ("report_date_as_yyyy_mm_dd", "2024-06-11T00:00:00.000"),
            ("open_interest_all", "345678"),
            ("comm_positions_long_all", "1000"),
            ("comm_positions_short_all", "1500"),
            ("noncomm_positions_long_all", "800"),
            ("noncomm_positions_short_all", "300"),
            ("nonrept_positions_long_all", "200"),
            ("nonrept_positions_short_all", "200"),
        ]);
        raw
    }

    #[test]
    fn socrata_dialect_maps_to_canonical_rows() {
        let mapped = map_table(ReportType::LegacyFuturesOnly, &socrata_legacy_raw(), 2024).unwrap();
        assert_eq!(mapped.table.len(), 1);
        assert_eq!(mapped.skipped_rows, 0);

        let row = &mapped.table.rows()[0];
        assert_eq!(row.market, "WHEAT-SRW - CHICAGO BOARD OF TRADE");
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
        assert_eq!(row.open_interest, Some(345_678));
        assert_eq!(row.sides(TraderCategory::Commercial).unwrap(), Sides::new(1000, 1500));
        assert!(row.is_complete_for(ReportType::LegacyFuturesOnly));
    }

    #[test]
    fn camelcase_and_human_dialects_map_identically() {
        let mut camel = RawTable::new();
        camel.push_record([
            ("Market_and_Exchange_Names", "GOLD - COMMODITY EXCHANGE INC."),
            ("Report_Date_as_YYYY_MM_DD", "2024-06-11"),
            ("Comm_Positions_Long_All", "1,000"),
            ("Comm_Positions_Short_All", "1,500"),
            ("NonComm_Positions_Long_All", "800"),
            ("NonComm_Positions_Short_All", "300"),
            ("NonRept_Positions_Long_All", "200"),
            ("NonRept_Positions_Short_All", "200"),
        ]);

        let mut human = RawTable::new();
        human.push_record([
            ("Market and Exchange Names", "GOLD - COMMODITY EXCHANGE INC."),
            ("As of Date in Form YYYY-MM-DD", "2024-06-11"),
            ("Commercial Positions-Long (All)", "1000"),
            ("Commercial Positions-Short (All)", "1500"),
            ("Noncommercial Positions-Long (All)", "800"),
            ("Noncommercial Positions-Short (All)", "300"),
            ("Nonreportable Positions-Long (All)", "200"),
            ("Nonreportable Positions-Short (All)", "200"),
        ]);

        let a = map_table(ReportType::LegacyFuturesOnly, &camel, 2024).unwrap();
        let b = map_table(ReportType::LegacyFuturesOnly, &human, 2024).unwrap();
        assert_eq!(a.table.rows(), b.table.rows());
    }

    #[test]
    fn missing_required_column_names_the_canonical_column() {
        let mut raw = RawTable::new();
        raw.push_record([
            ("market_and_exchange_names", "GOLD"),
            ("report_date_as_yyyy_mm_dd", "2024-06-11"),
            ("comm_positions_long_all", "1000"),
            // commercial short absent under every alias
            ("noncomm_positions_long_all", "800"),
            ("noncomm_positions_short_all", "300"),
            ("nonrept_positions_long_all", "200"),
            ("nonrept_positions_short_all", "200"),
        ]);

        let err = map_table(ReportType::LegacyFuturesOnly, &raw, 2024).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumn {
                column: "commercial short",
                report: ReportType::LegacyFuturesOnly.label(),
            }
        );
    }

    #[test]
    fn open_interest_is_optional() {
        let mut raw = socrata_legacy_raw();
        raw.push_record([
            ("market_and_exchange_names", "SILVER - COMMODITY EXCHANGE INC."),
            ("report_date_as_yyyy_mm_dd", "2024-06-11"),
            ("comm_positions_long_all", "10"),
            ("comm_positions_short_all", "20"),
            ("noncomm_positions_long_all", "30"),
            ("noncomm_positions_short_all", "40"),
            ("nonrept_positions_long_all", "50"),
            ("nonrept_positions_short_all", "60"),
        ]);
        let mapped = map_table(ReportType::LegacyFuturesOnly, &raw, 2024).unwrap();
        assert_eq!(mapped.table.rows()[1].open_interest, None);
    }

    #[test]
    fn bad_rows_are_skipped_and_counted() {
        let mut raw = socrata_legacy_raw();
        // blank market
        raw.push_record([
            ("market_and_exchange_names", "   "),
            ("report_date_as_yyyy_mm_dd", "2024-06-11"),
            ("comm_positions_long_all", "1"),
            ("comm_positions_short_all", "1"),
            ("noncomm_positions_long_all", "1"),
            ("noncomm_positions_short_all", "1"),
            ("nonrept_positions_long_all", "1"),
            ("nonrept_positions_short_all", "1"),
        ]);
        // unparseable count
        raw.push_record([
            ("market_and_exchange_names", "CORN - CHICAGO BOARD OF TRADE"),
            ("report_date_as_yyyy_mm_dd", "2024-06-11"),
            ("comm_positions_long_all", "n/a"),
            ("comm_positions_short_all", "1"),
            ("noncomm_positions_long_all", "1"),
            ("noncomm_positions_short_all", "1"),
            ("nonrept_positions_long_all", "1"),
            ("nonrept_positions_short_all", "1"),
        ]);
        // negative count violates the invariant
        raw.push_record([
            ("market_and_exchange_names", "OATS - CHICAGO BOARD OF TRADE"),
            ("report_date_as_yyyy_mm_dd", "2024-06-11"),
            ("comm_positions_long_all", "-5"),
            ("comm_positions_short_all", "1"),
            ("noncomm_positions_long_all", "1"),
            ("noncomm_positions_short_all", "1"),
            ("nonrept_positions_long_all", "1"),
            ("nonrept_positions_short_all", "1"),
        ]);

        let mapped = map_table(ReportType::LegacyFuturesOnly, &raw, 2024).unwrap();
        assert_eq!(mapped.table.len(), 1);
        assert_eq!(mapped.skipped_rows, 3);
    }

    #[test]
    fn duplicate_pairs_are_counted_separately() {
        let mut raw = socrata_legacy_raw();
        raw.push_record([
            ("market_and_exchange_names", "WHEAT-SRW - CHICAGO BOARD OF TRADE"),
            ("report_date_as_yyyy_mm_dd", "2024-06-11"),
            ("comm_positions_long_all", "9"),
            ("comm_positions_short_all", "9"),
            ("noncomm_positions_long_all", "9"),
            ("noncomm_positions_short_all", "9"),
            ("nonrept_positions_long_all", "9"),
            ("nonrept_positions_short_all", "9"),
        ]);
        let mapped = map_table(ReportType::LegacyFuturesOnly, &raw, 2024).unwrap();
        assert_eq!(mapped.duplicate_rows, 1);
        assert_eq!(mapped.skipped_rows, 0);
        // first occurrence won
        assert_eq!(
            mapped.table.rows()[0].sides(TraderCategory::Commercial).unwrap().long,
            1000
        );
    }

    #[test]
    fn disaggregated_accepts_the_doubled_underscore_quirk() {
        let mut raw = RawTable::new();
        raw.push_record([
            ("market_and_exchange_names", "NATURAL GAS - NEW YORK MERCANTILE EXCHANGE"),
            ("report_date_as_yyyy_mm_dd", "2024-06-11"),
            ("prod_merc_positions_long", "100"),
            ("prod_merc_positions_short", "200"),
            ("swap_positions_long_all", "300"),
            ("swap__positions_short_all", "400"),
            ("m_money_positions_long_all", "500"),
            ("m_money_positions_short_all", "600"),
            ("other_rept_positions_long", "700"),
            ("other_rept_positions_short", "800"),
        ]);

        let mapped = map_table(ReportType::DisaggregatedFutures, &raw, 2024).unwrap();
        let row = &mapped.table.rows()[0];
        assert_eq!(row.sides(TraderCategory::SwapDealer).unwrap(), Sides::new(300, 400));
        assert!(row.is_complete_for(ReportType::DisaggregatedFutures));
    }

    #[test]
    fn financial_taxonomy_maps() {
        let mut raw = RawTable::new();
        raw.push_record([
            ("market_and_exchange_names", "UST 10Y NOTE - CHICAGO BOARD OF TRADE"),
            ("report_date_as_yyyy_mm_dd", "2024-06-11"),
            ("dealer_positions_long_all", "10"),
            ("dealer_positions_short_all", "11"),
            ("asset_mgr_positions_long", "20"),
            ("asset_mgr_positions_short", "21"),
            ("lev_money_positions_long", "30"),
            ("lev_money_positions_short", "31"),
            ("other_rept_positions_long", "40"),
            ("other_rept_positions_short", "41"),
        ]);

        let mapped = map_table(ReportType::FinancialFutures, &raw, 2024).unwrap();
        let row = &mapped.table.rows()[0];
        assert_eq!(row.sides(TraderCategory::AssetManager).unwrap(), Sides::new(20, 21));
        assert_eq!(row.sides(TraderCategory::LeveragedFunds).unwrap(), Sides::new(30, 31));
        assert!(row.is_complete_for(ReportType::FinancialFutures));
    }

    #[test]
    fn count_parsing_strips_decorations() {
        assert_eq!(parse_count("1,234"), Some(1234));
        assert_eq!(parse_count(" $5,000 "), Some(5000));
        assert_eq!(parse_count("42%"), Some(42));
        assert_eq!(parse_count("12345.0"), Some(12345));
        assert_eq!(parse_count("-5"), None);
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("n/a"), None);
    }

    #[test]
    fn date_parsing_accepts_the_three_source_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(parse_date("2024-01-02T00:00:00.000"), Some(expected));
        assert_eq!(parse_date("2024-01-02"), Some(expected));
        assert_eq!(parse_date("01/02/2024"), Some(expected));
        assert_eq!(parse_date("2024-01-02 00:00:00"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }
}
