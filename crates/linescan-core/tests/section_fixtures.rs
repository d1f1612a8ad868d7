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

//! End-to-end section reads over the generic section fixtures.

use linescan_core::{
    Action, Aggregate, BufferedLines, Context, Fallback, Location, Offset, ProcessingMethods, Rule,
    RuleSet, Section, SectionBreak, Sentinel, Splitter, Trigger, Value,
};
use std::collections::BTreeMap;

const SINGLE_SECTION: &str = "\
Single Section
Section Name: A
A Content1: a
A Content2: b
A Content Long: This is a long sentence
that spans several lines
of the report

and ends after a blank line.
A Content3: c
defghijk
End Section

Trailing text
";

const MULTI_SECTION: &str = "\
Multi Section
Single Section
Section Name: B
B Content1: b1
End Section
Single Section
Section Name: C
C Content1: c1
C Content2: c2
End Section
Single Section
Section Name: D
D Content1: d1
End Section
Done Multi Section
Single Section
Section Name: E
End Section
";

fn colon_pipeline() -> ProcessingMethods {
    ProcessingMethods::new()
        .split(Splitter::on(':').max_fields(2))
        .trim()
        .drop_blank()
        .merge_continuation()
}

fn single_section() -> Section {
    Section::new("Single Section")
        .starts_with(SectionBreak::new(Trigger::literal("Section Name")).offset(Offset::Before))
        .ends_with(SectionBreak::new(Trigger::literal("End Section")))
        .reader(colon_pipeline())
        .aggregate(Aggregate::Dict)
}

fn multi_section() -> Section {
    Section::new("Multi Section")
        .starts_with(SectionBreak::new(Trigger::literal("Multi Section").at(Location::Full)))
        .ends_with(SectionBreak::new(Trigger::literal("Done Multi Section")))
        .reader(single_section())
        .aggregate(Aggregate::combine("Section Name"))
}

fn dict(pairs: &[(&str, &str)]) -> Value {
    Value::Map(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect::<BTreeMap<_, _>>(),
    )
}

// ==================== Single section ====================

#[test]
fn test_single_section_dict() {
    let mut source = BufferedLines::from_text(SINGLE_SECTION);
    let mut ctx = Context::for_file("generic_sections.txt");

    let value = single_section().read(&mut source, &mut ctx).unwrap().unwrap();

    let expected = dict(&[
        ("Section Name", "A"),
        ("A Content1", "a"),
        ("A Content2", "b"),
        (
            "A Content Long",
            "This is a long sentence that spans several lines of the report \
             and ends after a blank line.",
        ),
        ("A Content3", "c defghijk"),
    ]);
    assert_eq!(value, expected);
    assert_eq!(ctx.end_sentinel, Some(Sentinel::Literal("End Section".into())));
    assert_eq!(ctx.start_sentinel, Some(Sentinel::Literal("Section Name".into())));
    assert_eq!(ctx.line_count, 12);
    assert_eq!(ctx.file_name.as_deref(), Some("generic_sections.txt"));
}

#[test]
fn test_single_section_leaves_rest_of_source() {
    let mut source = BufferedLines::from_text(SINGLE_SECTION);
    let mut ctx = Context::new();
    single_section().read(&mut source, &mut ctx).unwrap();

    let rest: Vec<String> = source.collect();
    assert_eq!(rest, vec!["", "Trailing text"]);
}

#[test]
fn test_single_section_through_rule_set() {
    // Same content, but the colon split is the fallback of a rule set that
    // drops the section title.
    let rules = RuleSet::new(vec![
        Rule::new(Trigger::literal("Single Section").at(Location::Full)).on_pass(Action::Drop),
    ])
    .with_fallback(Fallback::Split(Splitter::on(':').max_fields(2)));

    let section = Section::new("Single Section")
        .ends_with(SectionBreak::new(Trigger::literal("End Section")))
        .reader(
            ProcessingMethods::new()
                .rules(rules)
                .trim()
                .drop_blank()
                .merge_continuation(),
        )
        .aggregate(Aggregate::Dict);

    let mut source = BufferedLines::from_text(SINGLE_SECTION);
    let value = section.read(&mut source, &mut Context::new()).unwrap().unwrap();
    assert_eq!(value.get("Section Name"), Some(&Value::from("A")));
    assert_eq!(value.get("A Content3"), Some(&Value::from("c defghijk")));
    assert!(value.get("Single Section").is_none());
}

// ==================== Nested sections ====================

#[test]
fn test_multi_section_combines_inner_sections() {
    let mut source = BufferedLines::from_text(MULTI_SECTION);
    let mut ctx = Context::new();

    let value = multi_section().read(&mut source, &mut ctx).unwrap().unwrap();

    let map = value.as_map().unwrap();
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["B", "C", "D"]);
    assert_eq!(
        map["B"],
        dict(&[("Section Name", "B"), ("B Content1", "b1")])
    );
    assert_eq!(
        map["C"],
        dict(&[("Section Name", "C"), ("C Content1", "c1"), ("C Content2", "c2")])
    );
    assert_eq!(
        ctx.end_sentinel,
        Some(Sentinel::Literal("Done Multi Section".into()))
    );

    // The section after the multi block is still available.
    let next = single_section().read(&mut source, &mut ctx).unwrap().unwrap();
    assert_eq!(next.get("Section Name"), Some(&Value::from("E")));
}

#[test]
fn test_inner_section_sentinel_visible_to_outer_aggregate() {
    let inner = single_section().aggregate(Aggregate::custom(|records, ctx| {
        let count = ctx.get("inner_reads").and_then(Value::as_int).unwrap_or(0);
        ctx.insert("inner_reads", count + 1);
        Aggregate::Dict.apply("Single Section", records, ctx)
    }));
    let outer = Section::new("Multi Section")
        .starts_with(SectionBreak::new(Trigger::literal("Multi Section").at(Location::Full)))
        .ends_with(SectionBreak::new(Trigger::literal("Done Multi Section")))
        .reader(inner)
        .aggregate(Aggregate::custom(|records, ctx| {
            let reads = ctx.get("inner_reads").cloned().unwrap_or(Value::Null);
            Ok(Value::List(vec![Value::Int(records.len() as i64), reads]))
        }));

    let mut source = BufferedLines::from_text(MULTI_SECTION);
    let value = outer.read(&mut source, &mut Context::new()).unwrap().unwrap();
    assert_eq!(value, Value::List(vec![Value::Int(3), Value::Int(3)]));
}

// ==================== Boundary offsets ====================

#[test]
fn test_before_offset_line_starts_next_section() {
    let first = Section::new("first")
        .ends_with(SectionBreak::new(Trigger::literal("Section Name")).offset(Offset::Before));
    let second = Section::new("second")
        .ends_with(SectionBreak::new(Trigger::literal("A Content2")));

    let mut source = BufferedLines::from_text(SINGLE_SECTION);
    let mut ctx = Context::new();
    let a = first.read(&mut source, &mut ctx).unwrap().unwrap();
    let b = second.read(&mut source, &mut ctx).unwrap().unwrap();

    assert_eq!(a, Value::List(vec![Value::from("Single Section")]));
    assert_eq!(
        b,
        Value::List(vec![Value::from("Section Name: A"), Value::from("A Content1: a")])
    );
}

// ==================== Configuration reuse ====================

#[test]
fn test_section_reuse_is_independent() {
    let section = single_section();

    for _ in 0..3 {
        let mut source = BufferedLines::from_text(SINGLE_SECTION);
        let mut ctx = Context::new();
        let value = section.read(&mut source, &mut ctx).unwrap().unwrap();
        assert_eq!(value.get("A Content1"), Some(&Value::from("a")));
    }

    let mut source = BufferedLines::from_text(MULTI_SECTION);
    let mut ctx = Context::new();
    let names: Vec<String> = section
        .read_all(&mut source, &mut ctx)
        .unwrap()
        .iter()
        .filter_map(|v| v.get("Section Name").map(Value::to_plain_string))
        .collect();
    assert_eq!(names, vec!["B", "C", "D", "E"]);
}

#[test]
fn test_rule_and_trigger_reuse() {
    let trigger = Trigger::new(["Plan:", "Plan sum:"]).unwrap();
    let rule = Rule::new(trigger.clone()).on_pass(Action::Event);

    let mut first = Context::new();
    let mut second = Context::new();
    assert_eq!(rule.apply("Plan sum: Plan Sum", &mut first), vec![Value::from("Plan sum:")]);
    assert_eq!(rule.apply("Plan: PARR", &mut second), vec![Value::from("Plan:")]);
    assert_eq!(first.sentinel, Some(Sentinel::Literal("Plan sum:".into())));
    assert_eq!(trigger.apply("Plan sum: Plan Sum").1, first.sentinel);
}
