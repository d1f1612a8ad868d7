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

//! Generic "key: value" sections to JSON.

use super::{buffer_config, read_file, to_json, write_output};
use crate::error::CliError;
use linescan_core::{
    Aggregate, BufferedLines, Context, Offset, ProcessingMethods, Section, SectionBreak, Splitter,
    Trigger, Value,
};

/// Build the section read by [`sections`].
///
/// The start line is part of the section; the end line is consumed.
pub fn delimited_section(start: &str, end: &str, delimiter: char) -> Section {
    Section::new("section")
        .starts_with(SectionBreak::new(Trigger::literal(start)).offset(Offset::Before))
        .ends_with(SectionBreak::new(Trigger::literal(end)))
        .reader(
            ProcessingMethods::new()
                .split(Splitter::on(delimiter).max_fields(2))
                .trim()
                .drop_blank()
                .merge_continuation(),
        )
        .aggregate(Aggregate::Dict)
}

/// Read every start/end delimited section of a file into a JSON list of
/// field maps.
///
/// # Errors
///
/// Returns [`CliError`] when the file cannot be read or scanned, or the
/// output cannot be written.
pub fn sections(
    file: &str,
    output: Option<&str>,
    start: &str,
    end: &str,
    delimiter: char,
    pretty: bool,
) -> Result<(), CliError> {
    if start.is_empty() || end.is_empty() {
        return Err(CliError::invalid_input("--start and --end must not be empty"));
    }

    let content = read_file(file)?;
    let mut source = BufferedLines::from_text_with_config(&content, buffer_config()?);
    let mut ctx = Context::for_file(file);

    let found = delimited_section(start, end, delimiter).read_all(&mut source, &mut ctx)?;
    write_output(&to_json(&Value::List(found), pretty)?, output)
}
