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

//! Full-export tests against a two-plan DVH fixture.

use linescan_core::{BufferedLines, Context, Value};
use linescan_csv::to_csv;
use linescan_dvh::{parse_dvh_lines, parse_dvh_text, parse_dvh_text_with_config, DvhConfig, DvhGrammar};

const TWO_PLANS: &str = include_str!("fixtures/two_plans.txt");

// ==================== Header ====================

#[test]
fn test_header_fields_stay_text() {
    let report = parse_dvh_text(TWO_PLANS).unwrap();
    assert_eq!(report.header["Patient ID"], Value::from("0012345"));
    assert_eq!(report.header["Patient Name"], Value::from("Doe, Jane"));
    assert_eq!(
        report.header["Date"],
        Value::from("Tuesday, March 06, 2018 10:45:27")
    );
}

#[test]
fn test_header_continuation_merged() {
    let report = parse_dvh_text(TWO_PLANS).unwrap();
    assert_eq!(
        report.header["Description"],
        Value::from(
            "The cumulative DVH displays the percentage (relative) or volume (absolute) \
             of structures that receive a dose equal to or greater than a given dose."
        )
    );
}

// ==================== Plans ====================

#[test]
fn test_plans_and_plan_sums() {
    let report = parse_dvh_text(TWO_PLANS).unwrap();
    let names: Vec<&str> = report.plans.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["PARR", "Plan Sum"]);

    assert_eq!(report.plans["PARR"].get("Type"), Some(&Value::from("Plan")));
    assert_eq!(report.plans["Plan Sum"].get("Type"), Some(&Value::from("Plan sum")));
    assert_eq!(
        report.plans["PARR"].get("Prescribed dose [cGy]"),
        Some(&Value::Float(5000.0))
    );
    assert_eq!(
        report.plans["Plan Sum"].get("Prescribed dose [cGy]"),
        Some(&Value::from("not defined"))
    );
    assert_eq!(
        report.plans["PARR"].get("Plan Status"),
        Some(&Value::from(
            "Treatment Approved Thursday, January 02, 2018 12:55:56 by gsal"
        ))
    );
}

// ==================== Structures ====================

#[test]
fn test_structures_and_curves() {
    let report = parse_dvh_text(TWO_PLANS).unwrap();
    let names: Vec<&str> = report.structure_names().collect();
    assert_eq!(names, vec!["PTV", "Rectum"]);

    let rectum = &report.structures["Rectum"];
    assert_eq!(rectum.get("Mean Dose [cGy]"), Some(&Value::Float(2210.7)));
    assert_eq!(rectum.get("Plan"), Some(&Value::from("PARR")));

    let ptv = report.curve("PTV").unwrap();
    assert_eq!(ptv.len(), 4);
    assert_eq!(
        ptv.columns,
        vec![
            "Dose [cGy]",
            "Relative dose [%]",
            "Ratio of Total Structure Volume [%]"
        ]
    );
    assert_eq!(
        ptv.rows[2],
        vec![Value::Int(5000), Value::Int(100), Value::Float(48.5)]
    );
    assert_eq!(report.curve("Rectum").unwrap().len(), 3);
}

#[test]
fn test_curves_table_spans_structures() {
    let report = parse_dvh_text(TWO_PLANS).unwrap();
    let table = report.curves_table();
    assert_eq!(table.len(), 7);
    assert_eq!(table.columns[0], "Structure");
    assert_eq!(table.rows[0][0], Value::from("PTV"));
    assert_eq!(table.rows[6][0], Value::from("Rectum"));
}

// ==================== Configuration ====================

#[test]
fn test_without_number_coercion() {
    let config = DvhConfig {
        coerce_numbers: false,
        ..Default::default()
    };
    let report = parse_dvh_text_with_config(TWO_PLANS, &config).unwrap();
    assert_eq!(
        report.structures["Rectum"].get("Mean Dose [cGy]"),
        Some(&Value::from("2210.7"))
    );
    // Curves are numeric regardless.
    assert_eq!(report.curve("Rectum").unwrap().rows[0][0], Value::Int(0));
}

#[test]
fn test_line_source_matches_text() {
    let lines = TWO_PLANS.lines().map(str::to_string);
    let from_lines = parse_dvh_lines(lines, &DvhConfig::default()).unwrap();
    assert_eq!(from_lines, parse_dvh_text(TWO_PLANS).unwrap());
}

#[test]
fn test_context_line_count() {
    let grammar = DvhGrammar::new(&DvhConfig::default()).unwrap();
    let mut source = BufferedLines::from_text(TWO_PLANS);
    let mut ctx = Context::new();
    grammar.parse(&mut source, &mut ctx).unwrap();
    assert!(source.next_line().is_none());
    assert!(ctx.line_count > 0);
}

#[test]
fn test_export_without_plans() {
    let text = "\
Patient ID : 7
Structure: Body
Volume [cm³]: 1.0
Dose [cGy]  Ratio of Total Structure Volume [%]
0  100
";
    let report = parse_dvh_text(text).unwrap();
    assert!(report.plans.is_empty());
    assert_eq!(report.curve("Body").unwrap().len(), 1);
}

// ==================== Export ====================

#[test]
fn test_curve_csv_export() {
    let report = parse_dvh_text(TWO_PLANS).unwrap();
    let csv = to_csv(&Value::Table(report.curve("Rectum").unwrap().clone())).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Dose [cGy],Relative dose [%],Ratio of Total Structure Volume [%]",
            "0,0,100",
            "2500,50,40.2",
            "5000,100,3.1",
        ]
    );
}
