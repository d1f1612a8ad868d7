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

//! Line processing pipelines.
//!
//! [`ProcessingMethods`] is an ordered list of steps. Each line enters the
//! first step as a string record; every step turns one record into zero or
//! more records for the next step. Most steps are stateless. Merging
//! continuation lines is not: it holds the latest record back until it
//! knows the following line does not continue it, and releases it when the
//! run is finished.
//!
//! ```rust
//! use linescan_core::{Context, ProcessingMethods, Splitter, Value};
//!
//! let pipeline = ProcessingMethods::new()
//!     .split(Splitter::on(':').max_fields(2))
//!     .trim()
//!     .drop_blank()
//!     .merge_continuation();
//!
//! let lines = ["Comment: first part", "second part", "", "Date: today"];
//! let records = pipeline.read(lines, &mut Context::new());
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(
//!     records[0],
//!     Value::List(vec!["Comment".into(), "first part second part".into()])
//! );
//! ```

use crate::context::Context;
use crate::rule::RuleSet;
use crate::split::Splitter;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type MapFn = dyn Fn(Value, &mut Context) -> Option<Value> + Send + Sync;

#[derive(Clone)]
enum Step {
    Trim,
    DropBlank,
    Split(Splitter),
    Rules(RuleSet),
    MergeContinuation,
    CoerceNumbers,
    Map(Arc<MapFn>),
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trim => f.write_str("Trim"),
            Self::DropBlank => f.write_str("DropBlank"),
            Self::Split(s) => f.debug_tuple("Split").field(s).finish(),
            Self::Rules(r) => f.debug_tuple("Rules").field(r).finish(),
            Self::MergeContinuation => f.write_str("MergeContinuation"),
            Self::CoerceNumbers => f.write_str("CoerceNumbers"),
            Self::Map(_) => f.write_str("Map(..)"),
        }
    }
}

/// An ordered pipeline of record transformations.
#[derive(Debug, Clone, Default)]
pub struct ProcessingMethods {
    steps: Vec<Step>,
}

impl ProcessingMethods {
    /// Create an empty pipeline; lines pass through as string records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim strings and the string items of lists.
    pub fn trim(self) -> Self {
        self.step(Step::Trim)
    }

    /// Drop blank records (see [`Value::is_blank`]).
    pub fn drop_blank(self) -> Self {
        self.step(Step::DropBlank)
    }

    /// Split string records into list records.
    pub fn split(self, splitter: Splitter) -> Self {
        self.step(Step::Split(splitter))
    }

    /// Apply a rule set to string records. Other records pass through.
    pub fn rules(self, rules: RuleSet) -> Self {
        self.step(Step::Rules(rules))
    }

    /// Append a single-field record to the last field of the preceding
    /// multi-field record, joined with a space.
    pub fn merge_continuation(self) -> Self {
        self.step(Step::MergeContinuation)
    }

    /// Turn numeric-looking strings into integers or floats, inside lists
    /// and maps too.
    pub fn coerce_numbers(self) -> Self {
        self.step(Step::CoerceNumbers)
    }

    /// Apply a function to every record; `None` drops the record.
    pub fn map<F>(self, f: F) -> Self
    where
        F: Fn(Value, &mut Context) -> Option<Value> + Send + Sync + 'static,
    {
        self.step(Step::Map(Arc::new(f)))
    }

    fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Number of configured steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when no steps are configured.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Start a run with fresh per-run state.
    pub fn run(&self) -> ProcessingRun<'_> {
        ProcessingRun {
            steps: &self.steps,
            held: vec![None; self.steps.len()],
        }
    }

    /// Put one record through every step, flushing held records.
    pub fn process(&self, record: Value, ctx: &mut Context) -> Vec<Value> {
        let mut run = self.run();
        let mut out = run.push_value(record, ctx);
        out.extend(run.finish(ctx));
        out
    }

    /// Process a whole line source, returning the surviving records.
    pub fn read<I, S>(&self, lines: I, ctx: &mut Context) -> Vec<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut run = self.run();
        let mut out = Vec::new();
        for line in lines {
            out.extend(run.push(line.as_ref(), ctx));
        }
        out.extend(run.finish(ctx));
        out
    }
}

/// One pass of a pipeline over a line source.
pub struct ProcessingRun<'a> {
    steps: &'a [Step],
    /// Record held back by each merge step.
    held: Vec<Option<Value>>,
}

impl ProcessingRun<'_> {
    /// Feed a line; returns the records that came out of the last step.
    pub fn push(&mut self, line: &str, ctx: &mut Context) -> Vec<Value> {
        self.push_value(Value::from(line), ctx)
    }

    /// Feed an arbitrary record.
    pub fn push_value(&mut self, record: Value, ctx: &mut Context) -> Vec<Value> {
        self.cascade(0, vec![record], ctx)
    }

    /// Release held records through the remaining steps.
    pub fn finish(&mut self, ctx: &mut Context) -> Vec<Value> {
        let mut out = Vec::new();
        for i in 0..self.steps.len() {
            if let Some(record) = self.held[i].take() {
                out.extend(self.cascade(i + 1, vec![record], ctx));
            }
        }
        out
    }

    fn cascade(&mut self, from: usize, mut records: Vec<Value>, ctx: &mut Context) -> Vec<Value> {
        for i in from..self.steps.len() {
            if records.is_empty() {
                break;
            }
            let mut next = Vec::with_capacity(records.len());
            for record in records {
                next.extend(self.apply(i, record, ctx));
            }
            records = next;
        }
        records
    }

    fn apply(&mut self, i: usize, record: Value, ctx: &mut Context) -> Vec<Value> {
        match &self.steps[i] {
            Step::Trim => vec![trim(record)],
            Step::DropBlank => {
                if record.is_blank() {
                    Vec::new()
                } else {
                    vec![record]
                }
            }
            Step::Split(splitter) => match record {
                Value::String(s) => vec![splitter.split_value(&s)],
                other => vec![other],
            },
            Step::Rules(rules) => match record {
                Value::String(s) => rules.apply(&s, ctx),
                other => vec![other],
            },
            Step::CoerceNumbers => vec![coerce(record)],
            Step::Map(f) => f(record, ctx).into_iter().collect(),
            Step::MergeContinuation => merge(&mut self.held[i], record),
        }
    }
}

fn trim(record: Value) -> Value {
    match record {
        Value::String(s) => Value::String(s.trim().to_string()),
        Value::List(items) => Value::List(items.into_iter().map(trim).collect()),
        other => other,
    }
}

/// Text of a single-field record, if it is one.
fn continuation_text(record: &Value) -> Option<String> {
    match record {
        Value::String(s) => Some(s.clone()),
        Value::List(items) if items.len() == 1 => Some(items[0].to_plain_string()),
        _ => None,
    }
}

fn merge(held: &mut Option<Value>, record: Value) -> Vec<Value> {
    if let (Some(Value::List(fields)), Some(text)) = (held.as_mut(), continuation_text(&record)) {
        if fields.len() > 1 {
            if let Some(last) = fields.last_mut() {
                let mut joined = last.to_plain_string();
                if !joined.is_empty() && !text.is_empty() {
                    joined.push(' ');
                }
                joined.push_str(&text);
                *last = Value::String(joined);
                return Vec::new();
            }
        }
    }
    held.replace(record).into_iter().collect()
}

fn coerce(record: Value) -> Value {
    match record {
        Value::String(s) => parse_number(&s).unwrap_or(Value::String(s)),
        Value::List(items) => Value::List(items.into_iter().map(coerce).collect()),
        Value::Map(map) => Value::Map(map.into_iter().map(|(k, v)| (k, coerce(v))).collect()),
        other => other,
    }
}

fn parse_number(s: &str) -> Option<Value> {
    let t = s.trim();
    // Rejects "inf", "NaN" and friends that f64 parsing would accept.
    if !t.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Ok(n) = t.parse::<i64>() {
        return Some(Value::Int(n));
    }
    t.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Action, Fallback, Rule};
    use crate::trigger::Trigger;

    fn list(items: &[&str]) -> Value {
        Value::List(items.iter().map(|s| Value::from(*s)).collect())
    }

    // ==================== Stateless steps ====================

    #[test]
    fn test_empty_pipeline_passes_lines() {
        let out = ProcessingMethods::new().read(["a", "b"], &mut Context::new());
        assert_eq!(out, vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_trim_and_drop_blank() {
        let pipeline = ProcessingMethods::new().trim().drop_blank();
        let out = pipeline.read(["  a ", "   ", "", "b"], &mut Context::new());
        assert_eq!(out, vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_split_then_trim() {
        let pipeline = ProcessingMethods::new()
            .split(Splitter::on(':').max_fields(2))
            .trim();
        let out = pipeline.process(Value::from(" Volume [cm³] : 12.5 "), &mut Context::new());
        assert_eq!(out, vec![list(&["Volume [cm³]", "12.5"])]);
    }

    #[test]
    fn test_coerce_numbers() {
        let pipeline = ProcessingMethods::new().coerce_numbers();
        let out = pipeline.process(list(&["0", "-1.5", "1e3", "inf", "Dose"]), &mut Context::new());
        assert_eq!(
            out,
            vec![Value::List(vec![
                Value::Int(0),
                Value::Float(-1.5),
                Value::Float(1000.0),
                Value::from("inf"),
                Value::from("Dose"),
            ])]
        );
    }

    #[test]
    fn test_coerce_keeps_out_of_range_floats_as_text() {
        let pipeline = ProcessingMethods::new().coerce_numbers();
        let out = pipeline.read(["1e999", "-1e999", "2.5"], &mut Context::new());
        assert_eq!(
            out,
            vec![Value::from("1e999"), Value::from("-1e999"), Value::Float(2.5)]
        );
    }

    #[test]
    fn test_rules_step_skips_non_strings() {
        let rules = RuleSet::new(vec![Rule::new(Trigger::literal("skip")).on_pass(Action::Drop)])
            .with_fallback(Fallback::Split(Splitter::whitespace()));
        let pipeline = ProcessingMethods::new().rules(rules);

        let out = pipeline.read(["skip me", "1 2"], &mut Context::new());
        assert_eq!(out, vec![list(&["1", "2"])]);

        let out = pipeline.process(Value::Int(5), &mut Context::new());
        assert_eq!(out, vec![Value::Int(5)]);
    }

    #[test]
    fn test_map_step() {
        let pipeline = ProcessingMethods::new().map(|record, ctx| {
            ctx.line_count += 1;
            record.as_str().filter(|s| !s.starts_with('#')).map(Value::from)
        });
        let mut ctx = Context::new();
        let out = pipeline.read(["# comment", "data"], &mut ctx);
        assert_eq!(out, vec![Value::from("data")]);
        assert_eq!(ctx.line_count, 2);
    }

    // ==================== Merge continuation ====================

    #[test]
    fn test_merge_continuation_multiple_lines() {
        let pipeline = ProcessingMethods::new()
            .split(Splitter::on(':').max_fields(2))
            .trim()
            .drop_blank()
            .merge_continuation();
        let out = pipeline.read(
            [
                "Description: The cumulative DVH",
                "displays the percentage",
                "of structures.",
                "Type: Cumulative",
            ],
            &mut Context::new(),
        );
        assert_eq!(
            out,
            vec![
                list(&[
                    "Description",
                    "The cumulative DVH displays the percentage of structures."
                ]),
                list(&["Type", "Cumulative"]),
            ]
        );
    }

    #[test]
    fn test_leading_single_field_records_are_kept() {
        let pipeline = ProcessingMethods::new()
            .split(Splitter::on(':'))
            .merge_continuation();
        let out = pipeline.read(["title", "more", "k: v"], &mut Context::new());
        assert_eq!(out, vec![list(&["title"]), list(&["more"]), list(&["k", " v"])]);
    }

    #[test]
    fn test_run_holds_until_finish() {
        let pipeline = ProcessingMethods::new()
            .split(Splitter::on(':'))
            .merge_continuation();
        let mut ctx = Context::new();
        let mut run = pipeline.run();

        assert!(run.push("a:1", &mut ctx).is_empty());
        assert!(run.push("more", &mut ctx).is_empty());
        assert_eq!(run.push("b:2", &mut ctx), vec![list(&["a", "1 more"])]);
        assert_eq!(run.finish(&mut ctx), vec![list(&["b", "2"])]);
        assert!(run.finish(&mut ctx).is_empty());
    }

    #[test]
    fn test_held_record_flows_through_later_steps() {
        let pipeline = ProcessingMethods::new()
            .split(Splitter::on('='))
            .merge_continuation()
            .coerce_numbers();
        let out = pipeline.read(["n=4", "m=5"], &mut Context::new());
        assert_eq!(
            out,
            vec![
                Value::List(vec![Value::from("n"), Value::Int(4)]),
                Value::List(vec![Value::from("m"), Value::Int(5)]),
            ]
        );
    }
}
