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

//! DVH curves to CSV.

use super::{ascii_delimiter, buffer_config, read_file, write_output};
use crate::error::CliError;
use linescan_core::Value;
use linescan_csv::{to_csv_with_config, ToCsvConfig};
use linescan_dvh::{parse_dvh_text_with_config, DvhConfig};

/// Write the curves of a DVH export as CSV.
///
/// With `structure` only that curve is written, without the leading
/// structure column.
///
/// # Errors
///
/// Returns [`CliError::InvalidInput`] for an unknown structure or a
/// non-ASCII delimiter, and other [`CliError`]s for read, parse and write
/// failures.
pub fn curves(
    file: &str,
    structure: Option<&str>,
    output: Option<&str>,
    delimiter: char,
) -> Result<(), CliError> {
    let csv_config = ToCsvConfig {
        delimiter: ascii_delimiter(delimiter)?,
        ..Default::default()
    };

    let content = read_file(file)?;
    let config = DvhConfig {
        buffer: buffer_config()?,
        ..Default::default()
    };
    let report = parse_dvh_text_with_config(&content, &config)?;

    let table = match structure {
        Some(name) => report
            .curve(name)
            .cloned()
            .ok_or_else(|| CliError::invalid_input(format!("no curve for structure '{}'", name)))?,
        None => report.curves_table(),
    };

    let csv = to_csv_with_config(&Value::Table(table), csv_config)?;
    write_output(&csv, output)
}
