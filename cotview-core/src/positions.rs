//! Net position calculation per trader group.
//!
//! A group's net is the sum of its member categories' longs minus the sum
//! of their shorts. Which categories belong to which group is the static
//! table in [`TraderGroup::members`]; nothing here infers groupings from
//! the data. All functions are pure reads over an in-memory table.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::category::{groups_for, TraderGroup};
use crate::domain::report::ReportType;
use crate::domain::row::ReportRow;
use crate::domain::table::ReportTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("market {market:?} not present in the loaded table")]
    MarketNotFound { market: String },
    #[error("no row for market {market:?} on {date}")]
    DateNotFound { market: String, date: NaiveDate },
}

/// Aggregate long and short totals and their difference for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPosition {
    pub long: u64,
    pub short: u64,
    pub net: i64,
}

impl NetPosition {
    fn accumulate(&mut self, long: u64, short: u64) {
        self.long += long;
        self.short += short;
        self.net = self.long as i64 - self.short as i64;
    }
}

/// Net positions per trader group for one market and report date.
pub fn net_positions(
    table: &ReportTable,
    market: &str,
    date: NaiveDate,
) -> Result<BTreeMap<TraderGroup, NetPosition>, PositionError> {
    let rows = table.rows_for_market(market);
    if rows.is_empty() {
        return Err(PositionError::MarketNotFound { market: market.to_string() });
    }
    let row = rows
        .into_iter()
        .find(|row| row.date == date)
        .ok_or_else(|| PositionError::DateNotFound { market: market.to_string(), date })?;
    Ok(positions_for_row(table.report_type(), row))
}

/// Per-date net positions for one market, dates ascending.
pub fn net_series(
    table: &ReportTable,
    market: &str,
) -> Result<Vec<(NaiveDate, BTreeMap<TraderGroup, NetPosition>)>, PositionError> {
    let rows = table.rows_for_market(market);
    if rows.is_empty() {
        return Err(PositionError::MarketNotFound { market: market.to_string() });
    }
    Ok(rows
        .into_iter()
        .map(|row| (row.date, positions_for_row(table.report_type(), row)))
        .collect())
}

/// Net positions per group for a row that is already in hand.
pub fn positions_for_row(
    report_type: ReportType,
    row: &ReportRow,
) -> BTreeMap<TraderGroup, NetPosition> {
    groups_for(report_type)
        .into_iter()
        .map(|group| (group, group_position(report_type, row, group)))
        .collect()
}

fn group_position(report_type: ReportType, row: &ReportRow, group: TraderGroup) -> NetPosition {
    let mut position = NetPosition::default();
    for &category in group.members(report_type) {
        let sides = row.sides(category).unwrap_or_default();
        position.accumulate(sides.long, sides.short);
    }
    position
}
