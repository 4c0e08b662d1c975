// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Diagnostic sinks receiving attempt failures.
//!
//! The executor reports every failed attempt to its sink exactly once, at the moment of
//! failure. Reporting is fire-and-forget and never affects the retry loop.

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

/// Receives the raw error of each failed attempt.
pub trait DiagnosticSink: Send + Sync {
    /// Reports that `attempt` (1-based) failed with `error`.
    fn attempt_failed(&self, attempt: u32, error: &dyn Display);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn attempt_failed(&self, attempt: u32, error: &dyn Display) {
        (**self).attempt_failed(attempt, error);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn attempt_failed(&self, attempt: u32, error: &dyn Display) {
        (**self).attempt_failed(attempt, error);
    }
}

/// Writes attempt failures as `tracing` error events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn attempt_failed(&self, attempt: u32, error: &dyn Display) {
        tracing::error!(attempt, "{error}");
    }
}

/// A failure captured by a [`RecordingSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureRecord {
    /// The 1-based attempt number.
    pub attempt: u32,
    /// The rendered error.
    pub error: String,
}

/// Captures attempt failures in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<FailureRecord>>,
}

impl RecordingSink {
    /// Creates a new empty [`RecordingSink`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the captured failures, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<FailureRecord> {
        self.lock().clone()
    }

    /// Returns the rendered errors, oldest first.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.error.clone()).collect()
    }

    /// Returns the number of captured failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether no failure was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A poisoned lock only means a panic elsewhere, the records are still usable
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<FailureRecord>> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl DiagnosticSink for RecordingSink {
    fn attempt_failed(&self, attempt: u32, error: &dyn Display) {
        self.lock().push(FailureRecord {
            attempt,
            error: error.to_string(),
        });
    }
}
