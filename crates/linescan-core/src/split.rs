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

//! Field splitting for delimited lines.

use crate::error::{ScanError, ScanResult};
use crate::value::Value;
use regex::Regex;

#[derive(Debug, Clone)]
enum SplitKind {
    Char(char),
    Whitespace,
    Csv(u8),
    Pattern(Regex),
}

/// Splits a line into fields.
///
/// A line that does not contain the delimiter yields a single field.
///
/// ```rust
/// use linescan_core::Splitter;
///
/// let colon = Splitter::on(':').max_fields(2);
/// assert_eq!(
///     colon.split("Date: 10:15:00"),
///     vec!["Date", " 10:15:00"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Splitter {
    kind: SplitKind,
    max_fields: Option<usize>,
}

impl Splitter {
    /// Split on a single character.
    pub fn on(delimiter: char) -> Self {
        Self {
            kind: SplitKind::Char(delimiter),
            max_fields: None,
        }
    }

    /// Split on runs of whitespace, ignoring leading and trailing whitespace.
    pub fn whitespace() -> Self {
        Self {
            kind: SplitKind::Whitespace,
            max_fields: None,
        }
    }

    /// Split a quoted CSV line with the given delimiter.
    pub fn csv(delimiter: u8) -> Self {
        Self {
            kind: SplitKind::Csv(delimiter),
            max_fields: None,
        }
    }

    /// Split on every match of a regular expression.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidPattern`] if the pattern does not compile.
    pub fn regex(pattern: &str) -> ScanResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| ScanError::pattern(pattern, &e))?;
        Ok(Self {
            kind: SplitKind::Pattern(regex),
            max_fields: None,
        })
    }

    /// Stop splitting after `n` fields; the last field keeps the remainder.
    /// Zero is treated as no limit.
    pub fn max_fields(mut self, n: usize) -> Self {
        self.max_fields = (n > 0).then_some(n);
        self
    }

    /// Split a line into owned fields.
    pub fn split(&self, line: &str) -> Vec<String> {
        match (&self.kind, self.max_fields) {
            (SplitKind::Char(c), Some(n)) => line.splitn(n, *c).map(String::from).collect(),
            (SplitKind::Char(c), None) => line.split(*c).map(String::from).collect(),
            (SplitKind::Whitespace, max) => split_whitespace(line, max),
            (SplitKind::Pattern(re), Some(n)) => re.splitn(line, n).map(String::from).collect(),
            (SplitKind::Pattern(re), None) => re.split(line).map(String::from).collect(),
            (SplitKind::Csv(delimiter), max) => split_csv(line, *delimiter, max),
        }
    }

    /// Split a line into a list record.
    pub fn split_value(&self, line: &str) -> Value {
        Value::List(self.split(line).into_iter().map(Value::from).collect())
    }
}

fn split_whitespace(line: &str, max: Option<usize>) -> Vec<String> {
    let mut fields = Vec::new();
    let mut rest = line.trim();
    while !rest.is_empty() {
        if max.is_some_and(|n| fields.len() + 1 == n) {
            fields.push(rest.to_string());
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(rest[..end].to_string());
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest.to_string());
                break;
            }
        }
    }
    fields
}

fn split_csv(line: &str, delimiter: u8, max: Option<usize>) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    let mut fields: Vec<String> = match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(String::from).collect(),
        // Unparseable or empty input stays a single field.
        _ => return vec![line.to_string()],
    };

    if let Some(n) = max {
        if fields.len() > n {
            let tail = fields.split_off(n - 1);
            fields.push(tail.join(&char::from(delimiter).to_string()));
        }
    }
    fields
}
