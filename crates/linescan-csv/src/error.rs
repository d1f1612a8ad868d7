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

//! Error types for CSV export.

use thiserror::Error;

/// CSV export error types.
///
/// # Examples
///
/// ```
/// use linescan_csv::CsvError;
///
/// let err = CsvError::Unsupported {
///     shape: "string".to_string(),
/// };
/// assert_eq!(
///     err.to_string(),
///     "Cannot export string value as CSV (expected table, list or map)"
/// );
/// ```
#[derive(Debug, Error)]
pub enum CsvError {
    /// The value has no tabular interpretation.
    #[error("Cannot export {shape} value as CSV (expected table, list or map)")]
    Unsupported {
        /// Description of the value that was passed.
        shape: String,
    },

    /// A list-of-lists row has a different width than the header.
    ///
    /// # Examples
    ///
    /// ```
    /// use linescan_csv::CsvError;
    ///
    /// let err = CsvError::WidthMismatch {
    ///     expected: 3,
    ///     actual: 2,
    ///     row: 4,
    /// };
    /// assert!(err.to_string().contains("expected 3 columns"));
    /// ```
    #[error("Row width mismatch: expected {expected} columns, got {actual} in row {row}")]
    WidthMismatch {
        /// Expected number of columns.
        expected: usize,
        /// Actual number of columns in the row.
        actual: usize,
        /// Row number where the mismatch occurred (1-based).
        row: usize,
    },

    /// I/O error during CSV writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from underlying CSV library.
    #[error("CSV library error: {0}")]
    CsvLib(#[from] csv::Error),

    /// Invalid UTF-8 in CSV output.
    #[error("Invalid UTF-8 in {context}")]
    InvalidUtf8 {
        /// Context where the invalid UTF-8 was encountered.
        context: String,
    },
}

/// Convenience type alias for `Result` with `CsvError`.
pub type Result<T> = std::result::Result<T, CsvError>;
