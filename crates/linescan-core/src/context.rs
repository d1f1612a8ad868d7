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

//! Sentinels and the per-read context.

use crate::value::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Capture groups of a regular-expression trigger hit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Captures {
    /// The whole matched text.
    pub text: String,
    /// Positional groups; index 0 is the whole match.
    pub groups: Vec<Option<String>>,
    /// Named groups that participated in the match.
    pub named: BTreeMap<String, String>,
}

impl Captures {
    pub(crate) fn from_regex(regex: &regex::Regex, caps: &regex::Captures<'_>) -> Self {
        let groups = caps
            .iter()
            .map(|m| m.map(|m| m.as_str().to_string()))
            .collect();
        let named = regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.to_string(), m.as_str().to_string()))
            })
            .collect();
        Self {
            text: caps
                .get(0)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            groups,
            named,
        }
    }

    /// Positional group `i`, if it participated.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.groups.get(i).and_then(|g| g.as_deref())
    }

    /// Named group, if it participated.
    pub fn name(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }
}

/// Why a trigger fired.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Sentinel {
    /// The literal alternative that matched.
    Literal(String),
    /// A regular-expression match.
    Match(Captures),
    /// The result of a function trigger.
    Value(Value),
}

impl Sentinel {
    /// The matched text, if the sentinel came from a literal or regex.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Match(caps) => Some(&caps.text),
            Self::Value(v) => v.as_str(),
        }
    }

    /// Convert to a record value.
    ///
    /// Regex matches with named groups become a map of those groups;
    /// otherwise the matched text is used.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Literal(s) => Value::from(s.as_str()),
            Self::Match(caps) if !caps.named.is_empty() => Value::Map(
                caps.named
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                    .collect(),
            ),
            Self::Match(caps) => Value::from(caps.text.as_str()),
            Self::Value(v) => v.clone(),
        }
    }
}

/// Metadata threaded through one read.
///
/// A top-level read owns the context; nested sections receive the same
/// instance, so whatever an inner section records is visible to the outer
/// aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    /// Source file name, if reading from a file.
    pub file_name: Option<String>,
    /// Source file path, if reading from a file.
    pub file_path: Option<PathBuf>,
    /// Number of lines consumed from the source so far.
    pub line_count: usize,
    /// Last sentinel produced by any trigger, rule or boundary.
    pub sentinel: Option<Sentinel>,
    /// Start boundary sentinel of the most recently started section.
    pub start_sentinel: Option<Sentinel>,
    /// End boundary sentinel of the most recently read section. `None` after
    /// a read means the section ran to the end of the source.
    pub end_sentinel: Option<Sentinel>,
    /// Free-form values set by callables.
    pub data: BTreeMap<String, Value>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context describing a source file.
    pub fn for_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            file_path: Some(path.to_path_buf()),
            ..Self::default()
        }
    }

    /// Store a value under `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Look up a stored value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}
