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

//! Errors surfaced by the retry executor.

/// The terminal failure of a retry session.
///
/// Individual attempt failures never reach the caller; they are reported to the
/// [`DiagnosticSink`](crate::sink::DiagnosticSink) and counted against the budget.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum RetryError {
    /// Every permitted attempt failed.
    #[error("\"keepTrying\" was not resolved after {retries} tries")]
    Exhausted {
        /// The configured attempt budget.
        retries: u32,
    },
    /// The configuration was rejected before any attempt was made.
    #[error("Invalid retry configuration: {0}")]
    InvalidConfig(String),
}

impl RetryError {
    /// Returns whether the session ended by exhausting its attempt budget.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}
