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

//! Error types for DVH parsing.

use linescan_core::ScanError;
use thiserror::Error;

/// DVH parsing errors.
#[derive(Debug, Error)]
pub enum DvhError {
    /// The scanning framework rejected the grammar or the input.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A section aggregated into an unexpected shape.
    #[error("{section} section produced {found}, expected a field map")]
    Shape {
        /// Section name.
        section: &'static str,
        /// What was produced instead.
        found: String,
    },
}

/// Result type for DVH parsing.
pub type DvhResult<T> = Result<T, DvhError>;
