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

//! Logging initialization for binaries built on the executor.

use tracing_subscriber::EnvFilter;

/// The filter applied when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize tracing.
///
/// Installs a formatting subscriber writing to stderr. The filter is read from the
/// `RUST_LOG` environment variable when set, otherwise `default_filter` is used.
///
/// Should only be called once during an applications run, ideally at the beginning of the run.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(v) => EnvFilter::new(v),
        Err(_) => EnvFilter::new(default_filter),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
