//! Domain types for COT reports.

pub mod category;
pub mod report;
pub mod row;
pub mod table;

pub use category::{groups_for, TraderCategory, TraderGroup};
pub use report::{ParseReportTypeError, ReportType};
pub use row::{ReportRow, Sides};
pub use table::ReportTable;
