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

//! CLI command implementations

mod curves;
mod dvh;
mod sections;

pub use curves::curves;
pub use dvh::dvh;
pub use sections::sections;

use crate::error::CliError;
use linescan_core::{BufferConfig, Value};
use std::fs;
use std::io::{self, Write};
use tracing::debug;

/// Default maximum input size (256 MiB).
/// Can be overridden via the `LINESCAN_MAX_FILE_SIZE` environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 256 * 1024 * 1024;

fn get_max_file_size() -> u64 {
    std::env::var("LINESCAN_MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Read a file from disk with size validation.
///
/// Files larger than `LINESCAN_MAX_FILE_SIZE` bytes are rejected before
/// anything is read.
///
/// # Errors
///
/// [`CliError::FileTooLarge`] for oversized files, [`CliError::Io`] when
/// the file cannot be read or is not UTF-8.
pub fn read_file(path: &str) -> Result<String, CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;

    let max_file_size = get_max_file_size();
    if metadata.len() > max_file_size {
        return Err(CliError::file_too_large(path, metadata.len(), max_file_size));
    }

    let content = fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))?;
    debug!(path, bytes = content.len(), "read input");
    Ok(content)
}

/// Buffer configuration, honouring `LINESCAN_BUFFER_SIZE`.
///
/// # Errors
///
/// [`CliError::InvalidInput`] when the variable is not a number, or
/// [`CliError::Scan`] when it is zero.
pub fn buffer_config() -> Result<BufferConfig, CliError> {
    match std::env::var("LINESCAN_BUFFER_SIZE") {
        Ok(raw) => {
            let capacity = raw.trim().parse::<usize>().map_err(|_| {
                CliError::invalid_input(format!("LINESCAN_BUFFER_SIZE must be a number, got '{}'", raw))
            })?;
            Ok(BufferConfig::new(capacity)?)
        }
        Err(_) => Ok(BufferConfig::default()),
    }
}

/// Write content to a file or stdout.
///
/// # Errors
///
/// [`CliError::Io`] when writing fails.
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), CliError> {
    match path {
        Some(p) => fs::write(p, content).map_err(|e| CliError::io_error(p, e)),
        None => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| CliError::io_error("<stdout>", e)),
    }
}

fn to_json(value: &Value, pretty: bool) -> Result<String, CliError> {
    let mut json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    json.push('\n');
    Ok(json)
}

fn ascii_delimiter(delimiter: char) -> Result<u8, CliError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(CliError::invalid_input(format!(
            "delimiter must be a single ASCII character, got '{}'",
            delimiter
        )))
    }
}
