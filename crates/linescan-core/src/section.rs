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

//! Section boundaries and the section grammar node.
//!
//! A [`Section`] reads the lines between a start and an end
//! [`SectionBreak`] from a shared [`BufferedLines`] and aggregates them into
//! one [`Value`]. Each read goes through three phases:
//!
//! 1. **Seeking**: lines are discarded until the start boundary fires. If the
//!    source ends first the read returns `Ok(None)`.
//! 2. **Reading**: lines are handed to the reader until the end boundary
//!    fires or the source ends. A pipeline reader gets every line; a nested
//!    reader runs its inner section once per occurrence.
//! 3. **Aggregating**: the collected records are combined by the
//!    [`Aggregate`].
//!
//! The [`Offset`] of a boundary decides where the triggering line goes:
//! `Before` leaves it for the next reader, `After` keeps it in the section
//! it closes, `At` consumes it as a pure delimiter.
//!
//! ```rust
//! use linescan_core::{
//!     Aggregate, BufferedLines, Context, Offset, ProcessingMethods, Section,
//!     SectionBreak, Splitter, Trigger, Value,
//! };
//!
//! let text = "preamble\nName: A\nSize: 3\nEnd\nName: B";
//! let section = Section::new("entry")
//!     .starts_with(SectionBreak::new(Trigger::literal("Name")).offset(Offset::Before))
//!     .ends_with(SectionBreak::new(Trigger::literal("End")))
//!     .reader(
//!         ProcessingMethods::new()
//!             .split(Splitter::on(':').max_fields(2))
//!             .trim(),
//!     )
//!     .aggregate(Aggregate::Dict);
//!
//! let mut source = BufferedLines::from_text(text);
//! let mut ctx = Context::new();
//! let entry = section.read(&mut source, &mut ctx).unwrap().unwrap();
//! assert_eq!(entry.get("Size"), Some(&Value::from("3")));
//! assert!(ctx.end_sentinel.is_some());
//! ```

use crate::buffer::BufferedLines;
use crate::context::{Context, Sentinel};
use crate::error::{ScanError, ScanResult};
use crate::processing::ProcessingMethods;
use crate::rule::RuleSet;
use crate::trigger::Trigger;
use crate::value::{Table, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Where the line that fires a boundary belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Offset {
    /// Pushed back; the next reader sees it as its first line.
    Before,
    /// Kept as the last line of the section being closed.
    After,
    /// Consumed as a delimiter and assigned to neither side.
    #[default]
    At,
}

/// Result of scanning for a boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakScan {
    /// Lines consumed before the boundary (plus the boundary line itself
    /// under [`Offset::After`]).
    pub skipped: Vec<String>,
    /// Sentinel of the boundary, `None` if the source ended first.
    pub sentinel: Option<Sentinel>,
}

/// A trigger plus a disposition for the triggering line.
#[derive(Debug, Clone)]
pub struct SectionBreak {
    name: Option<String>,
    trigger: Trigger,
    offset: Offset,
}

impl SectionBreak {
    /// Create a boundary with [`Offset::At`].
    pub fn new(trigger: impl Into<Trigger>) -> Self {
        Self {
            name: None,
            trigger: trigger.into(),
            offset: Offset::At,
        }
    }

    /// Set the boundary name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the disposition of the triggering line.
    pub fn offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    /// The boundary name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The configured disposition.
    pub fn position(&self) -> Offset {
        self.offset
    }

    /// Whether the line fires the boundary, without touching the context.
    pub fn matches(&self, line: &str) -> bool {
        self.trigger.is_match(line)
    }

    /// Test a line, recording a hit in `ctx.sentinel`.
    pub fn test(&self, line: &str, ctx: &mut Context) -> Option<Sentinel> {
        let sentinel = self.trigger.check(line)?;
        ctx.sentinel = Some(sentinel.clone());
        Some(sentinel)
    }

    /// Discard lines until the boundary fires or the source ends.
    ///
    /// # Errors
    ///
    /// Only buffer errors from pushing the boundary line back.
    pub fn check<I>(&self, source: &mut BufferedLines<I>, ctx: &mut Context) -> ScanResult<BreakScan>
    where
        I: Iterator<Item = String>,
    {
        let mut scan = BreakScan::default();
        while let Some(line) = source.next_line() {
            if let Some(sentinel) = self.test(&line, ctx) {
                match self.offset {
                    Offset::Before => source.backup(1)?,
                    Offset::After => scan.skipped.push(line),
                    Offset::At => {}
                }
                scan.sentinel = Some(sentinel);
                break;
            }
            scan.skipped.push(line);
        }
        ctx.line_count = source.line_number();
        Ok(scan)
    }
}

/// How column names of a table aggregate are found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableHeader {
    /// The first record holds the column names.
    FirstRecord,
    /// Fixed column names.
    Columns(Vec<String>),
}

type AggregateFn = dyn Fn(Vec<Value>, &mut Context) -> ScanResult<Value> + Send + Sync;

/// Combines a section's records into its result.
#[derive(Clone, Default)]
pub enum Aggregate {
    /// The records as a list.
    #[default]
    List,
    /// Field name to value. `[k, v]` records map `k` to `v`, longer records
    /// map the first field to a list of the rest, single fields map to null,
    /// map records are merged. Later keys overwrite earlier ones.
    Dict,
    /// Like `Dict`, but a repeated key is an error.
    StrictDict,
    /// Map records keyed by the string form of their `key` field.
    Combine {
        /// Field holding each record's key.
        key: String,
    },
    /// A table: list records become rows, map records fill columns by name.
    Table(TableHeader),
    /// The first record, or null.
    First,
    /// A user aggregation.
    Custom(Arc<AggregateFn>),
}

impl Aggregate {
    /// Combine records keyed by `key`.
    pub fn combine(key: impl Into<String>) -> Self {
        Self::Combine { key: key.into() }
    }

    /// Wrap an aggregation function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>, &mut Context) -> ScanResult<Value> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Combine records for the section named `section`.
    ///
    /// # Errors
    ///
    /// [`ScanError::Aggregate`] when the records do not fit the shape, or
    /// whatever a custom aggregation returns.
    pub fn apply(&self, section: &str, records: Vec<Value>, ctx: &mut Context) -> ScanResult<Value> {
        match self {
            Self::List => Ok(Value::List(records)),
            Self::Dict => to_dict(section, records, false),
            Self::StrictDict => to_dict(section, records, true),
            Self::Combine { key } => combine(section, records, key),
            Self::Table(header) => to_table(section, records, header),
            Self::First => Ok(records.into_iter().next().unwrap_or(Value::Null)),
            Self::Custom(f) => f(records, ctx),
        }
    }
}

impl fmt::Debug for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("List"),
            Self::Dict => f.write_str("Dict"),
            Self::StrictDict => f.write_str("StrictDict"),
            Self::Combine { key } => f.debug_struct("Combine").field("key", key).finish(),
            Self::Table(header) => f.debug_tuple("Table").field(header).finish(),
            Self::First => f.write_str("First"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn insert_entry(
    section: &str,
    map: &mut BTreeMap<String, Value>,
    key: String,
    value: Value,
    strict: bool,
) -> ScanResult<()> {
    if strict && map.contains_key(&key) {
        return Err(ScanError::aggregate(section, format!("duplicate key '{}'", key)));
    }
    map.insert(key, value);
    Ok(())
}

fn to_dict(section: &str, records: Vec<Value>, strict: bool) -> ScanResult<Value> {
    let mut map = BTreeMap::new();
    for record in records {
        match record {
            Value::List(mut fields) => {
                if fields.is_empty() {
                    continue;
                }
                let key = fields.remove(0).to_plain_string();
                let value = match fields.len() {
                    0 => Value::Null,
                    1 => fields.remove(0),
                    _ => Value::List(fields),
                };
                insert_entry(section, &mut map, key, value, strict)?;
            }
            Value::Map(entries) => {
                for (key, value) in entries {
                    insert_entry(section, &mut map, key, value, strict)?;
                }
            }
            Value::Null => {}
            other => insert_entry(section, &mut map, other.to_plain_string(), Value::Null, strict)?,
        }
    }
    Ok(Value::Map(map))
}

fn combine(section: &str, records: Vec<Value>, key: &str) -> ScanResult<Value> {
    let mut map = BTreeMap::new();
    for record in records {
        let name = match record.get(key) {
            Some(value) => value.to_plain_string(),
            None if record.as_map().is_some() => {
                return Err(ScanError::aggregate(
                    section,
                    format!("record has no '{}' field", key),
                ))
            }
            None => {
                return Err(ScanError::aggregate(
                    section,
                    format!("cannot combine non-map record {}", record),
                ))
            }
        };
        map.insert(name, record);
    }
    Ok(Value::Map(map))
}

fn to_table(section: &str, records: Vec<Value>, header: &TableHeader) -> ScanResult<Value> {
    let mut records = records.into_iter();
    let mut table = match header {
        TableHeader::Columns(columns) => Table::new(columns.clone()),
        TableHeader::FirstRecord => match records.next() {
            Some(Value::List(fields)) => {
                Table::new(fields.iter().map(Value::to_plain_string).collect())
            }
            Some(Value::Map(map)) => {
                let mut table = Table::new(map.keys().cloned().collect());
                table.push_row(map.into_values().collect());
                table
            }
            Some(Value::String(s)) => Table::new(vec![s]),
            Some(other) => {
                return Err(ScanError::aggregate(
                    section,
                    format!("table header must be a list, got {}", other),
                ))
            }
            None => Table::default(),
        },
    };

    for record in records {
        match record {
            Value::List(fields) => table.push_row(fields),
            Value::Map(map) => {
                let mut row = vec![Value::Null; table.columns.len()];
                for (key, value) in map {
                    match table.column_index(&key) {
                        Some(i) => row[i] = value,
                        None => {
                            table.columns.push(key);
                            for existing in &mut table.rows {
                                existing.push(Value::Null);
                            }
                            row.push(value);
                        }
                    }
                }
                table.push_row(row);
            }
            other => table.push_row(vec![other]),
        }
    }
    Ok(Value::Table(table))
}

/// Produces the records of a section.
#[derive(Debug, Clone)]
pub enum Reader {
    /// Every in-section line goes through a pipeline.
    Pipeline(ProcessingMethods),
    /// One record per occurrence of the inner section.
    Nested(Box<Section>),
    /// Each inner section read once, in order, as `[name, result]` records.
    Sequence(Vec<Section>),
}

impl Default for Reader {
    fn default() -> Self {
        Self::Pipeline(ProcessingMethods::new())
    }
}

impl From<ProcessingMethods> for Reader {
    fn from(pipeline: ProcessingMethods) -> Self {
        Self::Pipeline(pipeline)
    }
}

impl From<RuleSet> for Reader {
    fn from(rules: RuleSet) -> Self {
        Self::Pipeline(ProcessingMethods::new().rules(rules))
    }
}

impl From<Section> for Reader {
    fn from(section: Section) -> Self {
        Self::Nested(Box::new(section))
    }
}

impl From<Vec<Section>> for Reader {
    fn from(sections: Vec<Section>) -> Self {
        Self::Sequence(sections)
    }
}

/// A grammar node: boundaries, a reader and an aggregation.
///
/// Sections hold configuration only and can be read any number of times
/// against different sources and contexts.
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    start: Option<SectionBreak>,
    end: Option<SectionBreak>,
    reader: Reader,
    aggregate: Aggregate,
}

impl Section {
    /// A section that starts immediately, runs to the end of the source and
    /// lists its lines.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: None,
            end: None,
            reader: Reader::default(),
            aggregate: Aggregate::List,
        }
    }

    /// Set the start boundary.
    pub fn starts_with(mut self, boundary: SectionBreak) -> Self {
        self.start = Some(boundary);
        self
    }

    /// Set the end boundary.
    pub fn ends_with(mut self, boundary: SectionBreak) -> Self {
        self.end = Some(boundary);
        self
    }

    /// Set the reader.
    pub fn reader(mut self, reader: impl Into<Reader>) -> Self {
        self.reader = reader.into();
        self
    }

    /// Set the aggregation.
    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// The section name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The start boundary, if any.
    pub fn start(&self) -> Option<&SectionBreak> {
        self.start.as_ref()
    }

    /// The end boundary, if any.
    pub fn end(&self) -> Option<&SectionBreak> {
        self.end.as_ref()
    }

    /// Seek the start boundary, then read and aggregate one occurrence.
    ///
    /// Returns `Ok(None)` if the start boundary never fires.
    pub fn read<I>(&self, source: &mut BufferedLines<I>, ctx: &mut Context) -> ScanResult<Option<Value>>
    where
        I: Iterator<Item = String>,
    {
        self.read_with(source, ctx, true)
    }

    /// Read one occurrence; with `start_search == false` the source is
    /// assumed to be positioned at the section content already.
    pub fn read_with<I>(
        &self,
        source: &mut BufferedLines<I>,
        ctx: &mut Context,
        start_search: bool,
    ) -> ScanResult<Option<Value>>
    where
        I: Iterator<Item = String>,
    {
        if let (true, Some(start)) = (start_search, &self.start) {
            let scan = start.check(source, ctx)?;
            match scan.sentinel {
                Some(sentinel) => {
                    debug!(
                        section = %self.name,
                        line = source.line_number(),
                        skipped = scan.skipped.len(),
                        "section started"
                    );
                    ctx.start_sentinel = Some(sentinel);
                }
                None => {
                    debug!(section = %self.name, "start boundary not found");
                    return Ok(None);
                }
            }
        }

        ctx.end_sentinel = None;
        let (records, end_sentinel) = match &self.reader {
            Reader::Pipeline(pipeline) => self.read_lines(pipeline, source, ctx)?,
            Reader::Nested(inner) => self.read_nested(std::slice::from_ref(inner.as_ref()), true, source, ctx)?,
            Reader::Sequence(parts) => self.read_nested(parts, false, source, ctx)?,
        };
        ctx.end_sentinel = end_sentinel;
        ctx.line_count = source.line_number();

        debug!(
            section = %self.name,
            records = records.len(),
            terminated = ctx.end_sentinel.is_some(),
            "section read"
        );
        self.aggregate.apply(&self.name, records, ctx).map(Some)
    }

    /// Read every remaining occurrence.
    pub fn read_all<I>(&self, source: &mut BufferedLines<I>, ctx: &mut Context) -> ScanResult<Vec<Value>>
    where
        I: Iterator<Item = String>,
    {
        let mut results = Vec::new();
        // A section without a start boundary would otherwise match the end
        // of the source once more.
        while source.look_ahead(1)?.is_some() {
            let before = source.line_number();
            let value = match self.read(source, ctx)? {
                Some(value) => value,
                None => break,
            };
            if source.line_number() == before {
                warn!(section = %self.name, line = before, "section read made no progress");
                break;
            }
            results.push(value);
        }
        Ok(results)
    }

    /// Checks the end boundary against a line, returning its sentinel.
    fn end_fires(&self, line: &str, ctx: &mut Context) -> Option<(Offset, Sentinel)> {
        let end = self.end.as_ref()?;
        let sentinel = end.test(line, ctx)?;
        debug!(section = %self.name, offset = ?end.offset, line, "end boundary");
        Some((end.offset, sentinel))
    }

    fn read_lines<I>(
        &self,
        pipeline: &ProcessingMethods,
        source: &mut BufferedLines<I>,
        ctx: &mut Context,
    ) -> ScanResult<(Vec<Value>, Option<Sentinel>)>
    where
        I: Iterator<Item = String>,
    {
        let mut run = pipeline.run();
        let mut records = Vec::new();
        let mut end_sentinel = None;

        while let Some(line) = source.next_line() {
            ctx.line_count = source.line_number();
            if let Some((offset, sentinel)) = self.end_fires(&line, ctx) {
                match offset {
                    Offset::Before => source.backup(1)?,
                    Offset::After => records.extend(run.push(&line, ctx)),
                    Offset::At => {}
                }
                end_sentinel = Some(sentinel);
                break;
            }
            records.extend(run.push(&line, ctx));
        }
        records.extend(run.finish(ctx));
        Ok((records, end_sentinel))
    }

    fn read_nested<I>(
        &self,
        parts: &[Section],
        repeat: bool,
        source: &mut BufferedLines<I>,
        ctx: &mut Context,
    ) -> ScanResult<(Vec<Value>, Option<Sentinel>)>
    where
        I: Iterator<Item = String>,
    {
        let mut records = Vec::new();
        let mut parts = parts.iter();
        let mut current = parts.next();

        while let Some(inner) = current {
            let line = match source.look_ahead(1)? {
                Some(line) => line.to_string(),
                None => break,
            };

            if let Some((offset, sentinel)) = self.end_fires(&line, ctx) {
                // A nested reader has no line-level records, so `After`
                // consumes the boundary like `At`.
                if offset != Offset::Before {
                    source.next_line();
                }
                return Ok((records, Some(sentinel)));
            }

            if !inner.start.as_ref().map_or(true, |start| start.matches(&line)) {
                source.next_line();
                continue;
            }

            let before = source.line_number();
            let result = inner.read_with(source, ctx, true)?;
            if repeat {
                records.extend(result);
                if source.line_number() == before {
                    warn!(
                        section = %self.name,
                        inner = %inner.name,
                        line = before,
                        "nested read made no progress"
                    );
                    break;
                }
            } else {
                records.push(Value::List(vec![
                    Value::from(inner.name.as_str()),
                    result.unwrap_or(Value::Null),
                ]));
                current = parts.next();
            }
        }
        Ok((records, None))
    }
}
