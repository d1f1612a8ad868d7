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

//! Dose-volume histogram (DVH) text exports.
//!
//! Treatment planning systems export DVHs as a patient header, one block per
//! plan or plan sum, and one block per structure holding "key: value" fields
//! followed by a whitespace-aligned dose/volume table. [`parse_dvh_text`]
//! reads such an export into a [`DvhReport`] using the `linescan-core`
//! section grammar.
//!
//! # Example
//!
//! ```
//! use linescan_core::Value;
//! use linescan_dvh::parse_dvh_text;
//!
//! let export = "\
//! Patient ID : 0012345
//! Plan: PARR
//! Prescribed dose [cGy]: 5000.0
//! Structure: PTV
//! Volume [cm³]: 100.5
//!
//! Dose [cGy]  Ratio of Total Structure Volume [%]
//!      0      100
//!   5000      48.5
//! ";
//!
//! let report = parse_dvh_text(export).unwrap();
//! assert_eq!(report.header["Patient ID"], Value::from("0012345"));
//! assert_eq!(report.plans["PARR"].get("Prescribed dose [cGy]"), Some(&Value::Float(5000.0)));
//! assert_eq!(report.curve("PTV").unwrap().len(), 2);
//! ```

mod error;
mod grammar;
mod report;

pub use error::{DvhError, DvhResult};
pub use grammar::{parse_dvh_lines, parse_dvh_text, parse_dvh_text_with_config, DvhConfig, DvhGrammar};
pub use report::{DvhReport, STRUCTURE_COLUMN};
