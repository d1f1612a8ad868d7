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

//! linescan CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **dvh**: parse a dose-volume histogram export into JSON
//! - **curves**: write DVH curves as CSV, one row per dose bin
//! - **sections**: read every start/end delimited "key: value" block into a
//!   JSON list
//!
//! # Examples
//!
//! ```no_run
//! use linescan_cli::commands::{dvh, sections};
//!
//! # fn main() -> Result<(), linescan_cli::error::CliError> {
//! // Pretty JSON on stdout
//! dvh("export.txt", None, true)?;
//!
//! // Colon blocks between two marker lines
//! sections("report.txt", None, "Section Name", "End Section", ':', false)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Environment
//!
//! - `LINESCAN_MAX_FILE_SIZE`: largest input accepted, in bytes (default 256 MiB)
//! - `LINESCAN_BUFFER_SIZE`: look-back/look-ahead capacity of the line buffer
//! - `RUST_LOG`: log filter, overriding `--verbose`

pub mod cli;
pub mod commands;
pub mod error;
