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

//! Parsed DVH export.

use linescan_core::{Table, Value};
use std::collections::BTreeMap;

/// Column prepended by [`DvhReport::curves_table`].
pub const STRUCTURE_COLUMN: &str = "Structure";

/// One parsed DVH export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DvhReport {
    /// Export header fields (patient, date, description, ...).
    pub header: BTreeMap<String, Value>,
    /// Plan and plan-sum fields keyed by plan name. Each carries `Plan` and
    /// `Type` (`Plan` or `Plan sum`).
    pub plans: BTreeMap<String, Value>,
    /// Structure fields keyed by structure name, each with its curve table
    /// under `Curve`.
    pub structures: BTreeMap<String, Value>,
}

impl DvhReport {
    /// Structure names in sorted order.
    pub fn structure_names(&self) -> impl Iterator<Item = &str> {
        self.structures.keys().map(String::as_str)
    }

    /// The dose-volume curve of one structure.
    pub fn curve(&self, structure: &str) -> Option<&Table> {
        self.structures.get(structure)?.get("Curve")?.as_table()
    }

    /// All curves in one table with a leading structure column.
    ///
    /// Columns are the union of every curve's columns in first-seen order;
    /// a curve lacking a column gets nulls there.
    pub fn curves_table(&self) -> Table {
        let curves: Vec<(&str, &Table)> = self
            .structure_names()
            .filter_map(|name| self.curve(name).map(|curve| (name, curve)))
            .collect();

        let mut columns = vec![STRUCTURE_COLUMN.to_string()];
        for (_, curve) in &curves {
            for column in &curve.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut table = Table::new(columns);
        for (name, curve) in curves {
            let positions: Vec<Option<usize>> = table.columns[1..]
                .iter()
                .map(|column| curve.column_index(column))
                .collect();
            for row in &curve.rows {
                let mut cells = Vec::with_capacity(positions.len() + 1);
                cells.push(Value::from(name));
                cells.extend(
                    positions
                        .iter()
                        .map(|pos| pos.and_then(|i| row.get(i)).cloned().unwrap_or(Value::Null)),
                );
                table.push_row(cells);
            }
        }
        table
    }

    /// The whole report as one value: `{header, plans, structures}`.
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("header".to_string(), Value::Map(self.header.clone()));
        map.insert("plans".to_string(), Value::Map(self.plans.clone()));
        map.insert("structures".to_string(), Value::Map(self.structures.clone()));
        Value::Map(map)
    }
}
