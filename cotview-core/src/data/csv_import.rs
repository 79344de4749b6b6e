//! CSV import source.
//!
//! Reads a COT report CSV as downloaded from the CFTC site (or exported by
//! other tooling). Headers are taken verbatim; recognizing them is the column
//! mapper's job, so the same importer serves every report type and header
//! dialect.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::report::ReportType;

use super::raw::RawTable;
use super::source::{FetchError, ReportSource};

/// A report CSV on the local filesystem.
pub struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSource for CsvFile {
    fn name(&self) -> &str {
        "csv_file"
    }

    fn fetch(&self, report_type: ReportType, year: i32) -> Result<RawTable, FetchError> {
        let file = File::open(&self.path)
            .map_err(|e| FetchError::Io(format!("{}: {e}", self.path.display())))?;
        let raw = read_raw(file)?;
        if raw.is_empty() {
            return Err(FetchError::Empty { report: report_type.label(), year });
        }
        Ok(raw)
    }
}

/// Parse CSV from any reader into a raw table.
///
/// Empty cells read as absent so the mapper's blank handling applies
/// uniformly across sources.
pub fn read_raw<R: Read>(reader: R) -> Result<RawTable, FetchError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| FetchError::Decode(format!("csv header: {e}")))?
        .clone();
    let mut raw = RawTable::with_columns(headers.iter());

    for record in rdr.records() {
        let record = record.map_err(|e| FetchError::Decode(format!("csv record: {e}")))?;
        raw.push_row(
            record
                .iter()
                .map(|cell| if cell.is_empty() { None } else { Some(cell.to_string()) })
                .collect(),
        );
    }

    Ok(raw)
}
