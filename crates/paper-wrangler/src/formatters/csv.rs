//! Typed CSV reading and writing.
//!
//! Every table is written with an explicit header so that an empty run
//! still produces a well-formed file.

use std::fs::File;
use std::path::Path;

use ::csv::StringRecord;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::ensure_parent_dir;
use crate::error::{ToolError, ToolResult};

/// Read every row of a headed CSV file into `T`.
///
/// Columns are matched by header name; unknown columns are ignored.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> ToolResult<Vec<T>> {
    let file = File::open(path).map_err(|e| ToolError::io(path, e))?;
    let mut reader = ::csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// A headed CSV file kept as raw records, so columns nobody models survive a rewrite.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: StringRecord,
    pub records: Vec<StringRecord>,
}

impl Table {
    /// Position of the column named `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Index of column `name`, appending it (empty in every record) when absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column(name) {
            return index;
        }
        self.headers.push_field(name);
        for record in &mut self.records {
            record.push_field("");
        }
        self.headers.len() - 1
    }

    /// Deserialize every record into `T` by header name.
    pub fn rows<T: DeserializeOwned>(&self) -> ToolResult<Vec<T>> {
        let mut rows = Vec::with_capacity(self.records.len());
        for record in &self.records {
            rows.push(record.deserialize(Some(&self.headers))?);
        }
        Ok(rows)
    }

    /// Replace field `column` of record `row`.
    pub fn set(&mut self, row: usize, column: usize, value: &str) {
        let updated: StringRecord = self.records[row]
            .iter()
            .enumerate()
            .map(|(index, field)| if index == column { value } else { field })
            .collect();
        self.records[row] = updated;
    }
}

/// Read a headed CSV file as raw records.
pub fn read_table(path: &Path) -> ToolResult<Table> {
    let file = File::open(path).map_err(|e| ToolError::io(path, e))?;
    let mut reader = ::csv::Reader::from_reader(file);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?);
    }
    Ok(Table { headers, records })
}

/// Write `table` back out, header first, creating parent directories.
///
/// Returns the number of data rows written.
pub fn write_table(path: &Path, table: &Table) -> ToolResult<usize> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| ToolError::io(path, e))?;
    let mut writer = ::csv::Writer::from_writer(file);

    writer.write_record(&table.headers)?;
    for record in &table.records {
        writer.write_record(record)?;
    }
    writer.flush().map_err(|e| ToolError::io(path, e))?;
    Ok(table.records.len())
}

/// Write `header` then one record per row, creating parent directories.
///
/// Returns the number of data rows written.
pub fn write_rows<T, I>(path: &Path, header: &[&str], rows: I) -> ToolResult<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| ToolError::io(path, e))?;
    let mut writer = ::csv::WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(header)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush().map_err(|e| ToolError::io(path, e))?;
    Ok(count)
}
