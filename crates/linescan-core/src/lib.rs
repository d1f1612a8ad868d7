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

//! Section-based parsing of line-oriented text reports.
//!
//! Many instrument and planning-system exports are "key: value" blocks,
//! free text and whitespace tables stacked on top of each other. This crate
//! describes such a report as a small grammar of [`Section`]s read from one
//! shared [`BufferedLines`] source.
//!
//! # Building Blocks
//!
//! - [`BufferedLines`]: line source with bounded look-back, look-ahead and
//!   pushback
//! - [`Trigger`]: literal or regex line predicate reporting a [`Sentinel`]
//! - [`Rule`] / [`RuleSet`]: first-match-wins line rewriting
//! - [`SectionBreak`]: a trigger plus an [`Offset`] for the boundary line
//! - [`Section`]: start/end boundaries, a [`Reader`] and an [`Aggregate`]
//! - [`ProcessingMethods`]: trim, drop-blank, split, merge-continuation and
//!   number coercion pipeline
//!
//! # Example
//!
//! ```rust
//! use linescan_core::{
//!     Aggregate, BufferedLines, Context, Offset, ProcessingMethods, Section,
//!     SectionBreak, Splitter, Trigger, Value,
//! };
//!
//! let report = "\
//! Single Section
//! Section Name: A
//! A Content1: a
//! A Content Long: a sentence that
//!   continues here
//! End Section
//! ";
//!
//! let section = Section::new("single")
//!     .starts_with(SectionBreak::new(Trigger::literal("Section Name")).offset(Offset::Before))
//!     .ends_with(SectionBreak::new(Trigger::literal("End Section")))
//!     .reader(
//!         ProcessingMethods::new()
//!             .split(Splitter::on(':').max_fields(2))
//!             .trim()
//!             .drop_blank()
//!             .merge_continuation(),
//!     )
//!     .aggregate(Aggregate::Dict);
//!
//! let mut source = BufferedLines::from_text(report);
//! let mut ctx = Context::new();
//! let value = section.read(&mut source, &mut ctx).unwrap().unwrap();
//!
//! assert_eq!(value.get("Section Name"), Some(&Value::from("A")));
//! assert_eq!(
//!     value.get("A Content Long"),
//!     Some(&Value::from("a sentence that continues here"))
//! );
//! ```
//!
//! # Logging
//!
//! The crate logs through `tracing`: section starts and ends at `debug`,
//! rule hits at `trace`, tolerated buffer overflows and stalled nested reads
//! at `warn`. Install a subscriber to see them.

mod buffer;
mod context;
mod error;
mod processing;
mod rule;
mod section;
mod split;
mod trigger;
mod value;

pub use buffer::{BufferConfig, BufferedLines, OverflowPolicy};
pub use context::{Captures, Context, Sentinel};
pub use error::{ScanError, ScanResult};
pub use processing::{ProcessingMethods, ProcessingRun};
pub use rule::{Action, Callable, Fallback, Rule, RuleSet, RuleTrigger};
pub use section::{Aggregate, BreakScan, Offset, Reader, Section, SectionBreak, TableHeader};
pub use split::Splitter;
pub use trigger::{Location, Trigger};
pub use value::{Table, Value};
