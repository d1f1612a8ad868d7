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

//! CSV export of section results.
//!
//! Sections aggregate into tables, lists and maps; this crate writes those
//! shapes as CSV so they can be opened in a spreadsheet.
//!
//! # Examples
//!
//! ```
//! use linescan_core::{Aggregate, BufferedLines, Context, ProcessingMethods, Section, Splitter,
//!     TableHeader};
//! use linescan_csv::{to_csv_with_config, ToCsvConfig};
//!
//! let section = Section::new("curve")
//!     .reader(ProcessingMethods::new().split(Splitter::whitespace()).coerce_numbers())
//!     .aggregate(Aggregate::Table(TableHeader::FirstRecord));
//!
//! let mut source = BufferedLines::from_text("Dose Volume\n0 100\n10 98.5");
//! let curve = section.read(&mut source, &mut Context::new()).unwrap().unwrap();
//!
//! let config = ToCsvConfig {
//!     delimiter: b'\t',
//!     ..Default::default()
//! };
//! let csv_string = to_csv_with_config(&curve, config).unwrap();
//! assert_eq!(csv_string, "Dose\tVolume\n0\t100\n10\t98.5\n");
//! ```

mod error;
mod to_csv;

// Re-export public API
pub use error::{CsvError, Result};
pub use to_csv::{to_csv, to_csv_with_config, to_csv_writer, to_csv_writer_with_config, ToCsvConfig};
