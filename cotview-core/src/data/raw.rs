//! RawTable — untyped rows as returned by a source, before column mapping.

use std::collections::HashMap;

/// String-celled table with a growable column set.
///
/// Sources differ in shape: the Socrata API returns JSON records whose fields
/// can vary row to row, CSV files have a fixed header. Both funnel into this
/// structure so the column mapper sees one input. Cells hold the source text
/// verbatim; typing happens in the mapper.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a fixed header, CSV style.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for column in columns {
            table.column_id(&column.into());
        }
        table
    }

    fn column_id(&mut self, name: &str) -> usize {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.columns.len();
        self.columns.push(name.to_string());
        self.index.insert(name.to_string(), id);
        id
    }

    /// Append a row aligned with the current header; missing trailing cells
    /// read as absent.
    pub fn push_row(&mut self, cells: Vec<Option<String>>) {
        self.rows.push(cells);
    }

    /// Append a record of (field, value) pairs, JSON style. Fields unseen so
    /// far extend the column set.
    pub fn push_record<I, K, V>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut cells: Vec<Option<String>> = vec![None; self.columns.len()];
        for (key, value) in fields {
            let id = self.column_id(key.as_ref());
            if id >= cells.len() {
                cells.resize(id + 1, None);
            }
            cells[id] = Some(value.into());
        }
        self.rows.push(cells);
    }

    /// Union of column names seen so far, first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text at (row, column id); `None` when absent.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }
}
