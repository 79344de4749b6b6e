//! Data acquisition and canonicalization.
//!
//! Sources produce a [`RawTable`] with whatever columns they have; the
//! schema mapper turns that into the canonical [`crate::domain::ReportTable`]
//! and [`load_report`] runs the whole pipeline in one call.

pub mod cftc;
pub mod csv_import;
pub mod load;
pub mod raw;
pub mod schema;
pub mod source;

pub use cftc::CftcSocrata;
pub use csv_import::CsvFile;
pub use load::{load_report, LoadError, LoadedReport};
pub use raw::RawTable;
pub use schema::{map_table, MappedReport, SchemaError};
pub use source::{FetchError, ReportSource};
