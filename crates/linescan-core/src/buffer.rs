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

//! Buffered line source with bounded look-back, look-ahead and pushback.
//!
//! Sections scan forward through a shared [`BufferedLines`], and occasionally
//! need to hand the line they just read to whoever reads next (a boundary
//! that belongs to the following section). The buffer keeps the last
//! `capacity` yielded lines so that can be done with [`BufferedLines::backup`].
//!
//! A grammar that needs to rewind further than the configured capacity is a
//! caller error; the buffer reports it instead of silently dropping history.

use crate::error::{ScanError, ScanResult};
use std::collections::VecDeque;
use tracing::{trace, warn};

/// What to do when a look-ahead or advance asks for more lines than the
/// buffer capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Fail with [`ScanError::BufferOverflow`].
    #[default]
    Error,
    /// Log a warning and proceed, trimming history as needed.
    Warn,
}

/// Buffer configuration.
///
/// ```rust
/// use linescan_core::{BufferConfig, OverflowPolicy};
///
/// let config = BufferConfig::default();
/// assert_eq!(config.capacity, 10);
/// assert_eq!(config.overflow, OverflowPolicy::Error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    /// Number of yielded lines retained for `backup`/`look_back`.
    ///
    /// Default: 10
    pub capacity: usize,

    /// Behaviour when look-ahead or advance exceeds `capacity`.
    ///
    /// Default: [`OverflowPolicy::Error`]
    pub overflow: OverflowPolicy,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            overflow: OverflowPolicy::Error,
        }
    }
}

impl BufferConfig {
    /// Create a configuration with the given capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidConfig`] for a zero capacity.
    pub fn new(capacity: usize) -> ScanResult<Self> {
        if capacity == 0 {
            return Err(ScanError::config("buffer capacity must be at least 1"));
        }
        Ok(Self {
            capacity,
            ..Default::default()
        })
    }

    /// Set the overflow policy.
    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }
}

/// Line iterator with a bounded history buffer.
///
/// # Examples
///
/// ## Backing Up
///
/// ```rust
/// use linescan_core::BufferedLines;
///
/// let mut lines = BufferedLines::from_text("one\ntwo\nthree");
/// assert_eq!(lines.next_line().as_deref(), Some("one"));
/// assert_eq!(lines.next_line().as_deref(), Some("two"));
///
/// lines.backup(2).unwrap();
/// assert_eq!(lines.next_line().as_deref(), Some("one"));
/// assert_eq!(lines.next_line().as_deref(), Some("two"));
/// assert_eq!(lines.next_line().as_deref(), Some("three"));
/// assert_eq!(lines.next_line(), None);
/// ```
///
/// ## Looking Ahead
///
/// ```rust
/// use linescan_core::BufferedLines;
///
/// let mut lines = BufferedLines::from_text("a\nb\nc");
/// assert_eq!(lines.look_ahead(2).unwrap(), Some("b"));
/// // The next pull is unaffected.
/// assert_eq!(lines.next_line().as_deref(), Some("a"));
/// ```
pub struct BufferedLines<I> {
    source: I,
    /// Yielded history followed by cached look-ahead lines.
    buffer: VecDeque<String>,
    /// Index in `buffer` of the next line to yield.
    cursor: usize,
    /// Total lines taken from `source`.
    pulled: usize,
    exhausted: bool,
    config: BufferConfig,
}

impl BufferedLines<std::vec::IntoIter<String>> {
    /// Buffer the lines of an in-memory text.
    ///
    /// Handles LF and CRLF endings; a trailing newline does not produce an
    /// extra empty line.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        Self::new(lines)
    }

    /// Same as [`from_text`](Self::from_text) with an explicit configuration.
    pub fn from_text_with_config(text: &str, config: BufferConfig) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        Self::with_config(lines, config)
    }
}

impl<I: Iterator<Item = String>> BufferedLines<I> {
    /// Wrap a line source with the default configuration.
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<Item = String, IntoIter = I>,
    {
        Self::with_config(source, BufferConfig::default())
    }

    /// Wrap a line source. A zero capacity is raised to 1.
    pub fn with_config<S>(source: S, mut config: BufferConfig) -> Self
    where
        S: IntoIterator<Item = String, IntoIter = I>,
    {
        config.capacity = config.capacity.max(1);
        Self {
            source: source.into_iter(),
            buffer: VecDeque::with_capacity(config.capacity + 1),
            cursor: 0,
            pulled: 0,
            exhausted: false,
            config,
        }
    }

    /// The configured history capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Number of yielded lines that can currently be backed up over.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.cursor
    }

    /// Number of lines already taken from the source by look-ahead but not
    /// yet yielded.
    #[inline]
    pub fn pending(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// 1-based position in the source of the most recently yielded line
    /// (0 before the first pull).
    #[inline]
    pub fn line_number(&self) -> usize {
        self.pulled - self.pending()
    }

    /// Pull the next line. Returns `None` once the source is exhausted.
    pub fn next_line(&mut self) -> Option<String> {
        if self.cursor == self.buffer.len() && !self.pull_source() {
            return None;
        }
        let line = self.buffer[self.cursor].clone();
        self.cursor += 1;
        self.trim_history();
        Some(line)
    }

    /// Rewind so that the next `n` pulls re-yield the last `n` lines.
    ///
    /// # Errors
    ///
    /// [`ScanError::Backup`] if `n` exceeds the capacity or the retained
    /// history. The cursor is left untouched on error.
    pub fn backup(&mut self, n: usize) -> ScanResult<()> {
        if n > self.config.capacity || n > self.cursor {
            return Err(ScanError::Backup {
                requested: n,
                available: self.cursor,
                capacity: self.config.capacity,
            });
        }
        self.cursor -= n;
        trace!(n, line = self.line_number(), "backed up");
        Ok(())
    }

    /// Assignment-style alias for [`backup`](Self::backup).
    #[inline]
    pub fn set_step_back(&mut self, n: usize) -> ScanResult<()> {
        self.backup(n)
    }

    /// The `n`-th most recently yielded line (`1` is the last one).
    ///
    /// # Errors
    ///
    /// [`ScanError::LookBack`] when `n` is zero or beyond the history.
    pub fn look_back(&self, n: usize) -> ScanResult<&str> {
        if n == 0 || n > self.cursor {
            return Err(ScanError::LookBack {
                requested: n,
                available: self.cursor,
            });
        }
        Ok(&self.buffer[self.cursor - n])
    }

    /// The `n`-th upcoming line (`1` is what the next pull returns), or
    /// `None` if the source ends first.
    ///
    /// The underlying source is advanced and the lines are cached, so the
    /// caller's next pulls still see them in order.
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidConfig`] for `n == 0`; [`ScanError::BufferOverflow`]
    /// when `n` exceeds the capacity under [`OverflowPolicy::Error`].
    pub fn look_ahead(&mut self, n: usize) -> ScanResult<Option<&str>> {
        if n == 0 {
            return Err(ScanError::config("look_ahead needs n >= 1"));
        }
        self.check_overflow(n, "look_ahead")?;
        while self.pending() < n {
            if !self.pull_source() {
                return Ok(None);
            }
        }
        Ok(Some(&self.buffer[self.cursor + n - 1]))
    }

    /// Discard up to `n` upcoming lines without yielding them.
    ///
    /// History is cleared: a later `backup` cannot return into or before
    /// the skipped region. Returns the number of lines skipped.
    pub fn skip_lines(&mut self, n: usize) -> usize {
        let from_buffer = n.min(self.pending());
        self.cursor += from_buffer;
        self.buffer.drain(..self.cursor);
        self.cursor = 0;

        let mut skipped = from_buffer;
        while skipped < n {
            match self.source.next() {
                Some(_) => {
                    self.pulled += 1;
                    skipped += 1;
                }
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }
        trace!(requested = n, skipped, "skipped lines");
        skipped
    }

    /// Consume up to `n` lines into history so `backup` can return through
    /// them. Returns the number of lines consumed.
    ///
    /// # Errors
    ///
    /// [`ScanError::BufferOverflow`] when `n` exceeds the capacity under
    /// [`OverflowPolicy::Error`]; nothing is consumed in that case.
    pub fn advance(&mut self, n: usize) -> ScanResult<usize> {
        self.check_overflow(n, "advance")?;
        let mut advanced = 0;
        while advanced < n && self.next_line().is_some() {
            advanced += 1;
        }
        Ok(advanced)
    }

    fn check_overflow(&self, n: usize, operation: &str) -> ScanResult<()> {
        if n <= self.config.capacity {
            return Ok(());
        }
        match self.config.overflow {
            OverflowPolicy::Error => Err(ScanError::BufferOverflow {
                requested: n,
                capacity: self.config.capacity,
            }),
            OverflowPolicy::Warn => {
                warn!(
                    operation,
                    requested = n,
                    capacity = self.config.capacity,
                    "buffer overflow tolerated"
                );
                Ok(())
            }
        }
    }

    fn pull_source(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.source.next() {
            Some(line) => {
                self.buffer.push_back(line);
                self.pulled += 1;
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }

    fn trim_history(&mut self) {
        while self.cursor > self.config.capacity {
            self.buffer.pop_front();
            self.cursor -= 1;
        }
    }
}

impl<I: Iterator<Item = String>> Iterator for BufferedLines<I> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}
