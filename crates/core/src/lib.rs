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

//! Fixed-delay retry execution for asynchronous operations.
//!
//! The `keeptrying-core` crate re-invokes a fallible asynchronous operation up to a fixed number
//! of attempts, sleeping a fixed delay between a failed attempt and the next one, and resolves
//! with the first successful value or fails once the attempt budget is exhausted.
//!
//! The crate provides:
//!
//! - The [`RetryExecutor`] and the [`keep_trying`] convenience functions.
//! - The per-invocation [`Attempt`] model.
//! - A serde-backed [`RetryConfig`] which can be loaded from TOML, JSON or the environment.
//! - The [`DiagnosticSink`] and [`Timer`] seams, with `tracing` and `tokio` defaults.
//! - Logging initialization for binaries built on top of the executor.
//!
//! # Example
//!
//! ```rust,ignore
//! use keeptrying_core::keep_trying;
//!
//! let body = keep_trying(|| fetch_status(), 3, 1_000).await?;
//! ```

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod attempt;
pub mod config;
pub mod env;
pub mod error;
pub mod executor;
pub mod logging;
pub mod sink;
pub mod timer;

pub use crate::{
    attempt::{Attempt, AttemptStatus},
    config::RetryConfig,
    error::RetryError,
    executor::{RetryExecutor, keep_trying, keep_trying_with_defaults},
    sink::{DiagnosticSink, RecordingSink, TracingSink},
    timer::{RecordingTimer, Timer, TokioTimer},
};
