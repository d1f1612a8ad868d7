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

//! linescan command line interface

use clap::Parser;
use linescan_cli::cli::Commands;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// linescan - section-based scanning of line-oriented text reports
///
/// # Examples
///
/// ```bash
/// # Parse a DVH export to pretty JSON
/// linescan dvh export.txt --pretty
///
/// # Write every structure's curve to one CSV file
/// linescan curves export.txt -o curves.csv
///
/// # Collect "key: value" blocks between two marker lines
/// linescan sections report.txt --start "Section Name" --end "End Section"
/// ```
#[derive(Parser)]
#[command(name = "linescan")]
#[command(author, version, about = "linescan - section-based line scanning toolkit", long_about = None)]
struct Cli {
    /// Log section boundaries and rule hits to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "linescan=debug" } else { "linescan=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
