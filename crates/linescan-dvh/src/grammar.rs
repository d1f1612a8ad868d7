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

//! Section grammar of a DVH text export.
//!
//! ```text
//! header      colon fields until the first plan or structure line
//! plans       (Plan sum: | Plan:) blocks until the first Structure: line
//! structures  Structure: blocks, each an info block then a curve table
//! ```

use crate::error::{DvhError, DvhResult};
use crate::report::DvhReport;
use linescan_core::{
    Aggregate, BufferConfig, BufferedLines, Callable, Context, Fallback, Location, Offset,
    ProcessingMethods, Rule, RuleSet, ScanError, ScanResult, Section, SectionBreak, Sentinel,
    Splitter, TableHeader, Trigger, Value,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Plan header line; `Type` is `Plan` or `Plan sum`.
const PLAN_LINE: &str = r"^\s*(?P<Type>Plan sum|Plan):\s*(?P<Plan>.*?)\s*$";

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DvhConfig {
    /// Buffer configuration for the line source.
    pub buffer: BufferConfig,

    /// Convert numeric plan and structure fields to numbers. Header fields
    /// (patient IDs and the like) always stay text; curves are always
    /// numeric.
    ///
    /// Default: true
    pub coerce_numbers: bool,
}

impl Default for DvhConfig {
    fn default() -> Self {
        Self {
            buffer: BufferConfig::default(),
            coerce_numbers: true,
        }
    }
}

fn plan_trigger() -> Trigger {
    Trigger::literal("Plan sum:")
        .or_literal("Plan:")
        .at(Location::Start)
}

fn structure_trigger() -> Trigger {
    Trigger::literal("Structure:").at(Location::Start)
}

fn fields(coerce: bool) -> ProcessingMethods {
    let pipeline = ProcessingMethods::new()
        .split(Splitter::on(':').max_fields(2))
        .trim()
        .drop_blank()
        .merge_continuation();
    if coerce {
        pipeline.coerce_numbers()
    } else {
        pipeline
    }
}

fn plan_fields(records: Vec<Value>, ctx: &mut Context) -> ScanResult<Value> {
    let mut plan = Aggregate::Dict.apply("plan", records, ctx)?;
    let caps = match &ctx.start_sentinel {
        Some(Sentinel::Match(caps)) => caps,
        _ => return Err(ScanError::aggregate("plan", "plan read without a plan line")),
    };
    if let Value::Map(map) = &mut plan {
        for group in ["Plan", "Type"] {
            if let Some(text) = caps.name(group) {
                map.insert(group.to_string(), Value::from(text));
            }
        }
    }
    Ok(plan)
}

fn structure_fields(records: Vec<Value>, ctx: &mut Context) -> ScanResult<Value> {
    let mut parts = match Aggregate::Dict.apply("structure", records, ctx)? {
        Value::Map(parts) => parts,
        _ => BTreeMap::new(),
    };
    let mut info = match parts.remove("info") {
        Some(Value::Map(info)) => info,
        _ => return Err(ScanError::aggregate("structure", "missing structure fields")),
    };
    info.insert(
        "Curve".to_string(),
        parts.remove("curve").unwrap_or(Value::Null),
    );
    Ok(Value::Map(info))
}

/// The DVH export grammar, built once and reusable across files.
#[derive(Debug, Clone)]
pub struct DvhGrammar {
    header: Section,
    plans: Section,
    structures: Section,
}

impl DvhGrammar {
    /// Build the grammar.
    ///
    /// # Errors
    ///
    /// Only if a built-in pattern fails to compile.
    pub fn new(config: &DvhConfig) -> DvhResult<Self> {
        let header = Section::new("header")
            .ends_with(
                SectionBreak::new(plan_trigger().or_literal_at("Structure:", Location::Start))
                    .offset(Offset::Before),
            )
            .reader(fields(false))
            .aggregate(Aggregate::Dict);

        let plan = Section::new("plan")
            .starts_with(SectionBreak::new(Trigger::regex(PLAN_LINE)?))
            .ends_with(
                SectionBreak::new(plan_trigger().or_literal_at("Structure:", Location::Start))
                    .offset(Offset::Before),
            )
            .reader(fields(config.coerce_numbers))
            .aggregate(Aggregate::custom(plan_fields));

        let plans = Section::new("plans")
            .starts_with(SectionBreak::new(plan_trigger()).offset(Offset::Before))
            .ends_with(SectionBreak::new(structure_trigger()).offset(Offset::Before))
            .reader(plan)
            .aggregate(Aggregate::combine("Plan"));

        let info = Section::new("info")
            .ends_with(
                SectionBreak::new(Trigger::literal("Dose [").at(Location::Start))
                    .offset(Offset::Before),
            )
            .reader(fields(config.coerce_numbers))
            .aggregate(Aggregate::Dict);

        let column_header = Splitter::regex(r"\s{2,}")?;
        let curve_rules = RuleSet::new(vec![Rule::new(
            Trigger::literal("Dose [").at(Location::Start),
        )
        .on_pass(Callable::line_only(move |line| {
            vec![column_header.split_value(line)]
        }))])
        .with_fallback(Fallback::Split(Splitter::whitespace()));

        let curve = Section::new("curve")
            .ends_with(SectionBreak::new(structure_trigger()).offset(Offset::Before))
            .reader(
                ProcessingMethods::new()
                    .trim()
                    .drop_blank()
                    .rules(curve_rules)
                    .coerce_numbers(),
            )
            .aggregate(Aggregate::Table(TableHeader::FirstRecord));

        let structure = Section::new("structure")
            .starts_with(SectionBreak::new(structure_trigger()).offset(Offset::Before))
            .reader(vec![info, curve])
            .aggregate(Aggregate::custom(structure_fields));

        let structures = Section::new("structures")
            .starts_with(SectionBreak::new(structure_trigger()).offset(Offset::Before))
            .reader(structure)
            .aggregate(Aggregate::combine("Structure"));

        Ok(Self {
            header,
            plans,
            structures,
        })
    }

    /// Parse one export from a line source.
    pub fn parse<I>(&self, source: &mut BufferedLines<I>, ctx: &mut Context) -> DvhResult<DvhReport>
    where
        I: Iterator<Item = String>,
    {
        let header = into_map("header", self.header.read(source, ctx)?)?;

        // Seeking the plan block would otherwise run into the structure
        // fields, which repeat the plan name.
        let at_plans = source
            .look_ahead(1)?
            .is_some_and(|line| self.plans.start().is_some_and(|start| start.matches(line)));
        let plans = if at_plans {
            into_map("plans", self.plans.read(source, ctx)?)?
        } else {
            BTreeMap::new()
        };

        let structures = into_map("structures", self.structures.read(source, ctx)?)?;

        debug!(
            file = ?ctx.file_name,
            plans = plans.len(),
            structures = structures.len(),
            lines = ctx.line_count,
            "parsed DVH export"
        );
        Ok(DvhReport {
            header,
            plans,
            structures,
        })
    }
}

fn into_map(section: &'static str, value: Option<Value>) -> DvhResult<BTreeMap<String, Value>> {
    match value {
        Some(Value::Map(map)) => Ok(map),
        None => Ok(BTreeMap::new()),
        Some(other) => Err(DvhError::Shape {
            section,
            found: other.to_string(),
        }),
    }
}

/// Parse a DVH export held in memory, with the default configuration.
pub fn parse_dvh_text(text: &str) -> DvhResult<DvhReport> {
    parse_dvh_text_with_config(text, &DvhConfig::default())
}

/// Parse a DVH export held in memory.
pub fn parse_dvh_text_with_config(text: &str, config: &DvhConfig) -> DvhResult<DvhReport> {
    let mut source = BufferedLines::from_text_with_config(text, config.buffer.clone());
    DvhGrammar::new(config)?.parse(&mut source, &mut Context::new())
}

/// Parse a DVH export from any line source.
pub fn parse_dvh_lines<S>(lines: S, config: &DvhConfig) -> DvhResult<DvhReport>
where
    S: IntoIterator<Item = String>,
{
    let mut source = BufferedLines::with_config(lines, config.buffer.clone());
    DvhGrammar::new(config)?.parse(&mut source, &mut Context::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
Patient ID : 42
Plan: A
Course: C1
Structure: Body
Volume [cm³]: 10.0

Dose [cGy]  Ratio of Total Structure Volume [%]
0  100
1  50
";

    #[test]
    fn test_plan_line_pattern() {
        let trigger = Trigger::regex(PLAN_LINE).unwrap();
        match trigger.check("Plan sum: Plan Sum  ") {
            Some(Sentinel::Match(caps)) => {
                assert_eq!(caps.name("Type"), Some("Plan sum"));
                assert_eq!(caps.name("Plan"), Some("Plan Sum"));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(!trigger.is_match("Plan Status: Approved"));
    }

    #[test]
    fn test_small_export() {
        let report = parse_dvh_text(SMALL).unwrap();
        assert_eq!(report.header.get("Patient ID"), Some(&Value::from("42")));
        assert_eq!(
            report.plans["A"].get("Type"),
            Some(&Value::from("Plan"))
        );
        let curve = report.curve("Body").unwrap();
        assert_eq!(curve.len(), 2);
        assert_eq!(
            report.structures["Body"].get("Volume [cm³]"),
            Some(&Value::Float(10.0))
        );
    }

    #[test]
    fn test_plan_aggregate_needs_plan_line() {
        let mut ctx = Context::new();
        let err = plan_fields(vec![], &mut ctx).unwrap_err();
        assert!(matches!(err, ScanError::Aggregate { .. }));
    }

    #[test]
    fn test_grammar_reuse() {
        let grammar = DvhGrammar::new(&DvhConfig::default()).unwrap();
        for _ in 0..2 {
            let mut source = BufferedLines::from_text(SMALL);
            let report = grammar.parse(&mut source, &mut Context::new()).unwrap();
            assert_eq!(report.structures.len(), 1);
        }
    }
}
