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

//! Error types for section scanning.
//!
//! Running out of lines is not an error: [`BufferedLines`](crate::BufferedLines)
//! simply returns `None`. Everything in this module signals a mistake made by
//! the caller, either while configuring a grammar or while driving the buffer.
//!
//! # Error Categories
//!
//! - **Buffer bounds**: backing up, looking back or looking ahead past what the
//!   buffer retains. These mean the buffer is too small for the grammar.
//! - **Configuration**: unknown action names, bad regular expressions, empty
//!   triggers. Raised when the rule or trigger is built, never on first use.
//! - **Aggregation**: a section's records could not be combined into the
//!   requested shape (duplicate keys in a strict dictionary and so on).
//!
//! ```rust
//! use linescan_core::{BufferedLines, ScanError};
//!
//! let mut lines = BufferedLines::from_text("a\nb");
//! lines.next();
//!
//! match lines.backup(2) {
//!     Err(ScanError::Backup { requested, available, .. }) => {
//!         assert_eq!(requested, 2);
//!         assert_eq!(available, 1);
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use thiserror::Error;

/// Errors raised by the scanning framework.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    /// Backing up further than the retained history or the capacity.
    #[error("cannot back up {requested} lines: {available} retained, capacity {capacity}")]
    Backup {
        requested: usize,
        available: usize,
        capacity: usize,
    },

    /// Looking back further than the retained history.
    #[error("cannot look back {requested} lines: only {available} retained")]
    LookBack { requested: usize, available: usize },

    /// Look-ahead or advance beyond the buffer capacity.
    #[error("buffer overflow: {requested} lines requested, capacity is {capacity}")]
    BufferOverflow { requested: usize, capacity: usize },

    /// A named rule action that does not exist.
    #[error("unknown rule action '{0}' (expected Original, Event, None, Blank, Name or Value)")]
    UnknownAction(String),

    /// A regular expression that failed to compile.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Any other construction-time misconfiguration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Records could not be aggregated into the requested shape.
    #[error("aggregation failed in section '{section}': {message}")]
    Aggregate { section: String, message: String },
}

impl ScanError {
    /// Create an invalid pattern error from a regex compile failure.
    #[inline]
    pub fn pattern(pattern: impl Into<String>, err: &regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: err.to_string(),
        }
    }

    /// Create a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create an aggregation error.
    #[inline]
    pub fn aggregate(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Aggregate {
            section: section.into(),
            message: message.into(),
        }
    }

    /// True for errors caused by driving the buffer past its bounds.
    #[inline]
    pub fn is_buffer_error(&self) -> bool {
        matches!(
            self,
            Self::Backup { .. } | Self::LookBack { .. } | Self::BufferOverflow { .. }
        )
    }
}

/// Result type for scanning operations.
pub type ScanResult<T> = Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Display tests ====================

    #[test]
    fn test_backup_display() {
        let err = ScanError::Backup {
            requested: 4,
            available: 2,
            capacity: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("back up 4"));
        assert!(msg.contains("2 retained"));
        assert!(msg.contains("capacity 3"));
    }

    #[test]
    fn test_unknown_action_display() {
        let err = ScanError::UnknownAction("Sometimes".to_string());
        assert!(err.to_string().contains("'Sometimes'"));
    }

    #[test]
    fn test_pattern_helper() {
        let bad = regex::Regex::new("(unclosed").unwrap_err();
        let err = ScanError::pattern("(unclosed", &bad);
        match err {
            ScanError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_helper() {
        let err = ScanError::aggregate("Plans", "duplicate key 'PARR'");
        assert_eq!(
            err.to_string(),
            "aggregation failed in section 'Plans': duplicate key 'PARR'"
        );
    }

    // ==================== Classification tests ====================

    #[test]
    fn test_is_buffer_error() {
        assert!(ScanError::LookBack {
            requested: 1,
            available: 0
        }
        .is_buffer_error());
        assert!(ScanError::BufferOverflow {
            requested: 30,
            capacity: 10
        }
        .is_buffer_error());
        assert!(!ScanError::config("empty trigger").is_buffer_error());
    }
}
