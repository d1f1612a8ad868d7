// Dweve linescan - Section-based line scanning
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Convert section results to CSV format.

use crate::error::{CsvError, Result};
use linescan_core::{Table, Value};
use std::collections::BTreeMap;
use std::io::Write;

/// Configuration for CSV output.
#[derive(Debug, Clone)]
pub struct ToCsvConfig {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Include header row (default: true)
    pub include_headers: bool,
    /// Quote style for fields (default: necessary)
    pub quote_style: csv::QuoteStyle,
}

impl Default for ToCsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_headers: true,
            quote_style: csv::QuoteStyle::Necessary,
        }
    }
}

/// Convert a section result to a CSV string.
///
/// Accepted shapes:
///
/// - a table: its columns, then its rows
/// - a list of lists: written row by row, all rows the same width
/// - a list of maps: one column per key in first-seen order
/// - a map: `key,value` rows
///
/// # Example
/// ```
/// use linescan_core::{Table, Value};
/// use linescan_csv::to_csv;
///
/// let mut table = Table::new(vec!["Dose".to_string(), "Volume".to_string()]);
/// table.push_row(vec![Value::Int(0), Value::Float(100.0)]);
///
/// let csv_string = to_csv(&Value::Table(table)).unwrap();
/// assert_eq!(csv_string, "Dose,Volume\n0,100\n");
/// ```
pub fn to_csv(value: &Value) -> Result<String> {
    to_csv_with_config(value, ToCsvConfig::default())
}

/// Convert a section result to a CSV string with custom configuration.
pub fn to_csv_with_config(value: &Value, config: ToCsvConfig) -> Result<String> {
    let mut buffer = Vec::with_capacity(1024);
    to_csv_writer_with_config(value, &mut buffer, config)?;
    String::from_utf8(buffer).map_err(|_| CsvError::InvalidUtf8 {
        context: "CSV output".to_string(),
    })
}

/// Write a section result as CSV to a writer.
pub fn to_csv_writer<W: Write>(value: &Value, writer: W) -> Result<()> {
    to_csv_writer_with_config(value, writer, ToCsvConfig::default())
}

/// Write a section result as CSV with custom configuration.
pub fn to_csv_writer_with_config<W: Write>(value: &Value, writer: W, config: ToCsvConfig) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .quote_style(config.quote_style)
        .from_writer(writer);

    match value {
        Value::Table(table) => write_table(&mut wtr, table, config.include_headers)?,
        Value::List(items) if items.iter().all(|v| v.as_list().is_some()) => {
            write_rows(&mut wtr, items)?
        }
        Value::List(items) if items.iter().all(|v| v.as_map().is_some()) => {
            write_records(&mut wtr, items, config.include_headers)?
        }
        Value::Map(map) => write_pairs(&mut wtr, map, config.include_headers)?,
        other => {
            return Err(CsvError::Unsupported {
                shape: shape_name(other).to_string(),
            })
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_table<W: Write>(wtr: &mut csv::Writer<W>, table: &Table, headers: bool) -> Result<()> {
    if headers {
        wtr.write_record(&table.columns)?;
    }
    for row in &table.rows {
        wtr.write_record(row.iter().map(value_to_csv_string))?;
    }
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<()> {
    let mut width = None;
    for (i, row) in rows.iter().enumerate() {
        let fields = row.as_list().unwrap_or_default();
        let expected = *width.get_or_insert(fields.len());
        if fields.len() != expected {
            return Err(CsvError::WidthMismatch {
                expected,
                actual: fields.len(),
                row: i + 1,
            });
        }
        wtr.write_record(fields.iter().map(value_to_csv_string))?;
    }
    Ok(())
}

fn write_records<W: Write>(wtr: &mut csv::Writer<W>, records: &[Value], headers: bool) -> Result<()> {
    let mut columns: Vec<&str> = Vec::new();
    for map in records.iter().filter_map(Value::as_map) {
        for key in map.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    if headers {
        wtr.write_record(&columns)?;
    }
    for map in records.iter().filter_map(Value::as_map) {
        wtr.write_record(
            columns
                .iter()
                .map(|column| map.get(*column).map(value_to_csv_string).unwrap_or_default()),
        )?;
    }
    Ok(())
}

fn write_pairs<W: Write>(
    wtr: &mut csv::Writer<W>,
    map: &BTreeMap<String, Value>,
    headers: bool,
) -> Result<()> {
    if headers {
        wtr.write_record(["key", "value"])?;
    }
    for (key, value) in map {
        wtr.write_record([key.clone(), value_to_csv_string(value)])?;
    }
    Ok(())
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Int(_) => "integer",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::List(_) => "mixed list",
        Value::Map(_) => "map",
        Value::Table(_) => "table",
    }
}

fn value_to_csv_string(value: &Value) -> String {
    match value {
        Value::Float(f) => {
            if f.is_nan() {
                "NaN".to_string()
            } else if f.is_infinite() {
                if f.is_sign_positive() {
                    "Infinity".to_string()
                } else {
                    "-Infinity".to_string()
                }
            } else {
                f.to_string()
            }
        }
        other => other.to_plain_string(),
    }
}
