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

//! DVH export to JSON.

use super::{buffer_config, read_file, to_json, write_output};
use crate::error::CliError;
use linescan_dvh::{parse_dvh_text_with_config, DvhConfig};

/// Parse a DVH export and write it as JSON.
///
/// # Errors
///
/// Returns [`CliError`] when the file cannot be read or parsed, or the
/// output cannot be written.
pub fn dvh(file: &str, output: Option<&str>, pretty: bool) -> Result<(), CliError> {
    let content = read_file(file)?;
    let config = DvhConfig {
        buffer: buffer_config()?,
        ..Default::default()
    };
    let report = parse_dvh_text_with_config(&content, &config)?;
    write_output(&to_json(&report.to_value(), pretty)?, output)
}
