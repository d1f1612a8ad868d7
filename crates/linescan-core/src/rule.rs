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

//! Line-rewriting rules.
//!
//! A [`Rule`] pairs a trigger with an action for when it fires and one for
//! when it does not. A [`RuleSet`] tries its rules in order; the first rule
//! whose trigger fires produces the output and later rules are not
//! consulted. If nothing fires, the set's [`Fallback`] handles the line.
//!
//! ```rust
//! use linescan_core::{Action, Context, Location, Rule, RuleSet, Trigger, Value};
//!
//! let rules = RuleSet::new(vec![
//!     Rule::new(Trigger::new(["Data", "Text"]).unwrap()).on_pass(Action::Event),
//!     Rule::new(Trigger::literal("Line").at(Location::Start)),
//! ]);
//!
//! let mut ctx = Context::new();
//! assert_eq!(rules.apply("Line 1 Text", &mut ctx), vec![Value::from("Text")]);
//! ```

use crate::context::{Context, Sentinel};
use crate::error::{ScanError, ScanResult};
use crate::split::Splitter;
use crate::trigger::Trigger;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::trace;

type NoArgsFn = dyn Fn() -> Vec<Value> + Send + Sync;
type LineFn = dyn Fn(&str) -> Vec<Value> + Send + Sync;
type FullFn = dyn Fn(&str, Option<&Sentinel>, &mut Context) -> Vec<Value> + Send + Sync;
type TriggerFn = dyn Fn(&str, &Context) -> Option<Value> + Send + Sync;
type FallbackFn = dyn Fn(&str, &mut Context) -> Vec<Value> + Send + Sync;

/// A user transformation, tagged by the arguments it takes.
///
/// The variant is fixed when the action is built; the rule engine never
/// inspects the callable again.
#[derive(Clone)]
pub enum Callable {
    /// Takes nothing.
    NoArgs(Arc<NoArgsFn>),
    /// Takes the line.
    LineOnly(Arc<LineFn>),
    /// Takes the line, the sentinel (if the trigger fired) and the context.
    LineEventContext(Arc<FullFn>),
}

impl Callable {
    /// Wrap a zero-argument function.
    pub fn no_args<F>(f: F) -> Self
    where
        F: Fn() -> Vec<Value> + Send + Sync + 'static,
    {
        Self::NoArgs(Arc::new(f))
    }

    /// Wrap a function of the line.
    pub fn line_only<F>(f: F) -> Self
    where
        F: Fn(&str) -> Vec<Value> + Send + Sync + 'static,
    {
        Self::LineOnly(Arc::new(f))
    }

    /// Wrap a function of the line, sentinel and context.
    pub fn full<F>(f: F) -> Self
    where
        F: Fn(&str, Option<&Sentinel>, &mut Context) -> Vec<Value> + Send + Sync + 'static,
    {
        Self::LineEventContext(Arc::new(f))
    }

    fn call(&self, line: &str, sentinel: Option<&Sentinel>, ctx: &mut Context) -> Vec<Value> {
        match self {
            Self::NoArgs(f) => f(),
            Self::LineOnly(f) => f(line),
            Self::LineEventContext(f) => f(line, sentinel, ctx),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arity = match self {
            Self::NoArgs(_) => "NoArgs",
            Self::LineOnly(_) => "LineOnly",
            Self::LineEventContext(_) => "LineEventContext",
        };
        write!(f, "Callable::{}", arity)
    }
}

/// What a rule produces.
#[derive(Debug, Clone, Default)]
pub enum Action {
    /// The line unchanged.
    #[default]
    Original,
    /// The sentinel that fired, as a value. Nothing when there is none.
    Event,
    /// Nothing; the line is dropped. Named `None` in action strings.
    Drop,
    /// An empty string.
    Blank,
    /// The rule's name. Nothing when the rule is unnamed.
    Name,
    /// The value returned by a function trigger.
    Value,
    /// A user transformation.
    Call(Callable),
}

impl Action {
    /// Parse a built-in action name.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnknownAction`] for anything other than `Original`,
    /// `Event`, `None`, `Blank`, `Name` or `Value`.
    pub fn named(name: &str) -> ScanResult<Self> {
        name.parse()
    }

    fn perform(
        &self,
        line: &str,
        sentinel: Option<&Sentinel>,
        name: Option<&str>,
        ctx: &mut Context,
    ) -> Vec<Value> {
        match self {
            Self::Original => vec![Value::from(line)],
            Self::Event | Self::Value => sentinel.map(Sentinel::to_value).into_iter().collect(),
            Self::Drop => Vec::new(),
            Self::Blank => vec![Value::String(String::new())],
            Self::Name => name.map(Value::from).into_iter().collect(),
            Self::Call(callable) => callable.call(line, sentinel, ctx),
        }
    }
}

impl FromStr for Action {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Original" => Ok(Self::Original),
            "Event" => Ok(Self::Event),
            "None" => Ok(Self::Drop),
            "Blank" => Ok(Self::Blank),
            "Name" => Ok(Self::Name),
            "Value" => Ok(Self::Value),
            other => Err(ScanError::UnknownAction(other.to_string())),
        }
    }
}

impl From<Callable> for Action {
    fn from(callable: Callable) -> Self {
        Self::Call(callable)
    }
}

/// What decides whether a rule fires.
#[derive(Clone)]
pub enum RuleTrigger {
    /// A literal/regex trigger.
    Trigger(Trigger),
    /// A transformation: `Some(value)` fires with `Sentinel::Value(value)`,
    /// `None` does not fire.
    Function(Arc<TriggerFn>),
}

impl RuleTrigger {
    fn evaluate(&self, line: &str, ctx: &Context) -> Option<Sentinel> {
        match self {
            Self::Trigger(trigger) => trigger.check(line),
            Self::Function(f) => f(line, ctx).map(Sentinel::Value),
        }
    }
}

impl fmt::Debug for RuleTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trigger(trigger) => f.debug_tuple("Trigger").field(trigger).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// A trigger with pass and fail actions.
#[derive(Debug, Clone)]
pub struct Rule {
    name: Option<String>,
    trigger: RuleTrigger,
    pass: Action,
    fail: Action,
}

impl Rule {
    /// Rule fired by a trigger. Passes the line through unchanged until
    /// configured otherwise.
    pub fn new(trigger: Trigger) -> Self {
        Self {
            name: trigger.name().map(String::from),
            trigger: RuleTrigger::Trigger(trigger),
            pass: Action::Original,
            fail: Action::Original,
        }
    }

    /// Rule fired by a transformation function. Passes the function's value
    /// through until configured otherwise.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str, &Context) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            name: None,
            trigger: RuleTrigger::Function(Arc::new(f)),
            pass: Action::Value,
            fail: Action::Original,
        }
    }

    /// Set the rule name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Action when the trigger fires.
    pub fn on_pass(mut self, action: impl Into<Action>) -> Self {
        self.pass = action.into();
        self
    }

    /// Action when the trigger does not fire. Default: `Original`.
    pub fn on_fail(mut self, action: impl Into<Action>) -> Self {
        self.fail = action.into();
        self
    }

    /// The rule name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Apply the pass action if the trigger fires, `None` otherwise.
    pub fn fire(&self, line: &str, ctx: &mut Context) -> Option<Vec<Value>> {
        let sentinel = self.trigger.evaluate(line, ctx)?;
        trace!(rule = ?self.name, line, "rule fired");
        ctx.sentinel = Some(sentinel.clone());
        Some(
            self.pass
                .perform(line, Some(&sentinel), self.name.as_deref(), ctx),
        )
    }

    /// Apply the pass or the fail action.
    pub fn apply(&self, line: &str, ctx: &mut Context) -> Vec<Value> {
        match self.fire(line, ctx) {
            Some(out) => out,
            None => self.fail.perform(line, None, self.name.as_deref(), ctx),
        }
    }
}

/// What a [`RuleSet`] does with a line no rule fired on.
#[derive(Clone, Default)]
pub enum Fallback {
    /// Keep the line as a string record.
    #[default]
    Original,
    /// Drop the line.
    Drop,
    /// Split the line into a list record.
    Split(Splitter),
    /// A user transformation.
    Call(Arc<FallbackFn>),
}

impl Fallback {
    /// Wrap a fallback function.
    pub fn call<F>(f: F) -> Self
    where
        F: Fn(&str, &mut Context) -> Vec<Value> + Send + Sync + 'static,
    {
        Self::Call(Arc::new(f))
    }

    fn apply(&self, line: &str, ctx: &mut Context) -> Vec<Value> {
        match self {
            Self::Original => vec![Value::from(line)],
            Self::Drop => Vec::new(),
            Self::Split(splitter) => vec![splitter.split_value(line)],
            Self::Call(f) => f(line, ctx),
        }
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => f.write_str("Original"),
            Self::Drop => f.write_str("Drop"),
            Self::Split(splitter) => f.debug_tuple("Split").field(splitter).finish(),
            Self::Call(_) => f.write_str("Call(..)"),
        }
    }
}

/// Ordered rules, first match wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    fallback: Fallback,
}

impl RuleSet {
    /// Create a rule set that passes unmatched lines through.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            fallback: Fallback::Original,
        }
    }

    /// Set the handling of unmatched lines.
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Transform a line. Only the pass action of the first firing rule is
    /// used; fail actions of individual rules are not consulted.
    pub fn apply(&self, line: &str, ctx: &mut Context) -> Vec<Value> {
        for rule in &self.rules {
            if let Some(out) = rule.fire(line, ctx) {
                return out;
            }
        }
        self.fallback.apply(line, ctx)
    }
}
