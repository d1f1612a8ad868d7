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

//! Line predicates that report which alternative matched.
//!
//! A [`Trigger`] is an ordered list of alternatives, each a literal with a
//! [`Location`] or a regular expression. Alternatives are tried in the order
//! they were added and the first hit wins, so listing `"Plan:"` before
//! `"Plan sum:"` matters:
//!
//! ```rust
//! use linescan_core::{Sentinel, Trigger};
//!
//! let trigger = Trigger::new(["Plan:", "Plan sum:"]).unwrap();
//! let (hit, sentinel) = trigger.apply("Plan sum: Plan Sum");
//! assert!(hit);
//! assert_eq!(sentinel, Some(Sentinel::Literal("Plan sum:".into())));
//! ```

use crate::context::{Captures, Sentinel};
use crate::error::{ScanError, ScanResult};
use regex::Regex;

/// Where a literal alternative must occur in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    /// Line starts with the literal, ignoring leading whitespace.
    Start,
    /// Literal occurs anywhere in the line.
    #[default]
    In,
    /// Line ends with the literal, ignoring trailing whitespace.
    End,
    /// Trimmed line equals the literal.
    Full,
}

impl Location {
    fn matches(self, line: &str, literal: &str) -> bool {
        match self {
            Self::Start => line.trim_start().starts_with(literal),
            Self::In => line.contains(literal),
            Self::End => line.trim_end().ends_with(literal),
            Self::Full => line.trim() == literal,
        }
    }
}

#[derive(Debug, Clone)]
enum Alternative {
    Literal { text: String, location: Location },
    Pattern(Regex),
}

impl Alternative {
    fn check(&self, line: &str) -> Option<Sentinel> {
        match self {
            Self::Literal { text, location } => location
                .matches(line, text)
                .then(|| Sentinel::Literal(text.clone())),
            Self::Pattern(regex) => regex
                .captures(line)
                .map(|caps| Sentinel::Match(Captures::from_regex(regex, &caps))),
        }
    }
}

fn compile(pattern: &str) -> ScanResult<Regex> {
    Regex::new(pattern).map_err(|e| ScanError::pattern(pattern, &e))
}

/// A predicate over a single line.
#[derive(Debug, Clone)]
pub struct Trigger {
    name: Option<String>,
    alternatives: Vec<Alternative>,
}

impl Trigger {
    /// Literal alternatives matched anywhere in the line.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidConfig`] when no alternatives are given.
    pub fn new<I, S>(alternatives: I) -> ScanResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alternatives: Vec<Alternative> = alternatives
            .into_iter()
            .map(|text| Alternative::Literal {
                text: text.into(),
                location: Location::In,
            })
            .collect();
        if alternatives.is_empty() {
            return Err(ScanError::config("trigger needs at least one alternative"));
        }
        Ok(Self {
            name: None,
            alternatives,
        })
    }

    /// A single literal matched anywhere in the line.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            name: None,
            alternatives: vec![Alternative::Literal {
                text: text.into(),
                location: Location::In,
            }],
        }
    }

    /// A single regular expression, searched anywhere in the line.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidPattern`] if the pattern does not compile.
    pub fn regex(pattern: &str) -> ScanResult<Self> {
        Ok(Self {
            name: None,
            alternatives: vec![Alternative::Pattern(compile(pattern)?)],
        })
    }

    /// Set the location of every literal alternative added so far.
    pub fn at(mut self, location: Location) -> Self {
        for alt in &mut self.alternatives {
            if let Alternative::Literal { location: loc, .. } = alt {
                *loc = location;
            }
        }
        self
    }

    /// Add a literal alternative matched anywhere in the line.
    pub fn or_literal(self, text: impl Into<String>) -> Self {
        self.or_literal_at(text, Location::In)
    }

    /// Add a literal alternative with an explicit location.
    pub fn or_literal_at(mut self, text: impl Into<String>, location: Location) -> Self {
        self.alternatives.push(Alternative::Literal {
            text: text.into(),
            location,
        });
        self
    }

    /// Add a regular-expression alternative.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidPattern`] if the pattern does not compile.
    pub fn or_regex(mut self, pattern: &str) -> ScanResult<Self> {
        self.alternatives.push(Alternative::Pattern(compile(pattern)?));
        Ok(self)
    }

    /// Attach a name, reported by the `Name` rule action.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The configured name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Test a line, returning whether it fired and the sentinel of the first
    /// alternative that matched.
    pub fn apply(&self, line: &str) -> (bool, Option<Sentinel>) {
        match self.check(line) {
            Some(sentinel) => (true, Some(sentinel)),
            None => (false, None),
        }
    }

    /// Sentinel of the first matching alternative.
    pub fn check(&self, line: &str) -> Option<Sentinel> {
        self.alternatives.iter().find_map(|alt| alt.check(line))
    }

    /// Whether any alternative matches.
    pub fn is_match(&self, line: &str) -> bool {
        self.alternatives.iter().any(|alt| match alt {
            Alternative::Literal { text, location } => location.matches(line, text),
            Alternative::Pattern(regex) => regex.is_match(line),
        })
    }
}

impl From<&str> for Trigger {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Literal locations ====================

    #[test]
    fn test_location_variants() {
        let line = "  Plan: PARR  ";
        assert!(Trigger::literal("Plan:").at(Location::Start).is_match(line));
        assert!(Trigger::literal("PARR").at(Location::End).is_match(line));
        assert!(Trigger::literal("an: PA").is_match(line));
        assert!(!Trigger::literal("Plan:").at(Location::Full).is_match(line));
        assert!(Trigger::literal("Plan: PARR").at(Location::Full).is_match(line));
        assert!(!Trigger::literal("PARR").at(Location::Start).is_match(line));
    }

    #[test]
    fn test_at_only_relocates_existing_literals() {
        let trigger = Trigger::literal("Dose")
            .at(Location::Start)
            .or_literal("Volume");
        assert!(!trigger.is_match("Max Dose"));
        assert!(trigger.is_match("Total Volume"));
    }

    // ==================== Precedence ====================

    #[test]
    fn test_first_listed_alternative_wins() {
        let trigger = Trigger::new(["Plan:", "Plan sum:"]).unwrap();
        assert_eq!(
            trigger.apply("Plan sum: Plan Sum"),
            (true, Some(Sentinel::Literal("Plan sum:".into())))
        );

        let trigger = Trigger::new(["Plan", "Plan sum:"]).unwrap();
        assert_eq!(
            trigger.check("Plan sum: Plan Sum"),
            Some(Sentinel::Literal("Plan".into()))
        );
    }

    #[test]
    fn test_no_match() {
        let trigger = Trigger::new(["Data", "Text"]).unwrap();
        assert_eq!(trigger.apply("Line 1"), (false, None));
    }

    #[test]
    fn test_empty_alternatives_rejected() {
        let empty: Vec<String> = Vec::new();
        assert!(matches!(
            Trigger::new(empty),
            Err(ScanError::InvalidConfig(_))
        ));
    }

    // ==================== Regex ====================

    #[test]
    fn test_regex_sentinel_carries_groups() {
        let trigger = Trigger::regex(r"^(?P<Type>Plan sum|Plan):\s*(?P<Plan>.*)$").unwrap();
        match trigger.check("Plan: PARR") {
            Some(Sentinel::Match(caps)) => {
                assert_eq!(caps.name("Type"), Some("Plan"));
                assert_eq!(caps.name("Plan"), Some("PARR"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_mixed_alternatives() {
        let trigger = Trigger::literal("End")
            .at(Location::Full)
            .or_regex(r"^-{3,}$")
            .unwrap();
        assert!(trigger.is_match("End"));
        assert!(trigger.is_match("-----"));
        assert!(!trigger.is_match("--"));
    }

    #[test]
    fn test_invalid_regex() {
        assert!(matches!(
            Trigger::regex("(unclosed"),
            Err(ScanError::InvalidPattern { .. })
        ));
        assert!(Trigger::literal("a").or_regex("[").is_err());
    }

    #[test]
    fn test_reuse_across_lines() {
        let trigger = Trigger::literal("End Section").named("end");
        assert_eq!(trigger.name(), Some("end"));
        for _ in 0..3 {
            assert!(trigger.is_match("End Section"));
            assert!(!trigger.is_match("Section Name: A"));
        }
    }
}
