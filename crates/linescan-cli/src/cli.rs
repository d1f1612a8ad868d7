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

//! CLI command definitions and argument parsing.

use crate::commands;
use crate::error::CliError;
use clap::Subcommand;

/// Top-level CLI commands.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use linescan_cli::cli::Commands;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a DVH text export to JSON
    ///
    /// The output object has `header`, `plans` and `structures` members;
    /// each structure carries its curve table under `Curve`.
    Dvh {
        /// Input DVH export
        #[arg(value_name = "FILE")]
        file: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Pretty print JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Write DVH curves as CSV
    ///
    /// Without `--structure` every curve is written, prefixed by a
    /// `Structure` column.
    Curves {
        /// Input DVH export
        #[arg(value_name = "FILE")]
        file: String,

        /// Only write the curve of this structure
        #[arg(short, long, value_name = "NAME")]
        structure: Option<String>,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Field delimiter (single ASCII character)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Read delimited "key: value" sections to a JSON list
    ///
    /// A section starts at each line containing the start text and ends at
    /// the next line containing the end text. Lines without the delimiter
    /// continue the previous field.
    Sections {
        /// Input text file
        #[arg(value_name = "FILE")]
        file: String,

        /// Text marking the first line of a section
        #[arg(long)]
        start: String,

        /// Text marking the line that closes a section
        #[arg(long)]
        end: String,

        /// Key/value delimiter
        #[arg(short, long, default_value = ":")]
        delimiter: char,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Pretty print JSON
        #[arg(short, long)]
        pretty: bool,
    },
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] when reading, parsing or writing fails.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Dvh {
                file,
                output,
                pretty,
            } => commands::dvh(&file, output.as_deref(), pretty),
            Commands::Curves {
                file,
                structure,
                output,
                delimiter,
            } => commands::curves(&file, structure.as_deref(), output.as_deref(), delimiter),
            Commands::Sections {
                file,
                start,
                end,
                delimiter,
                output,
                pretty,
            } => commands::sections(&file, output.as_deref(), &start, &end, delimiter, pretty),
        }
    }
}
