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

//! The `keep-trying` command-line interface.
//!
//! Runs an external command until it exits successfully, re-invoking it up to a fixed number
//! of attempts with a fixed delay in between. Each failed run is logged, and the process
//! exits unsuccessfully once the attempt budget is spent.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]

pub mod command;
pub mod opt;

use keeptrying_core::{RetryConfig, RetryExecutor, env::get_env_var_opt};

use crate::opt::{Commands, KeepTryingCli, RetryOpt, RunOpt};

/// Executes the parsed command line.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved, or the command never succeeds.
pub async fn run(opt: KeepTryingCli) -> anyhow::Result<()> {
    match opt.command {
        Commands::Run(run_opt) => run_with_retry(&run_opt).await?,
        Commands::Config(retry_opt) => {
            let config = resolve_config(&retry_opt)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

/// Resolves the retry configuration from the file, the process environment and the flags.
///
/// # Errors
///
/// Returns an error if a layer cannot be read or parsed, or the merged configuration is invalid.
pub fn resolve_config(opt: &RetryOpt) -> anyhow::Result<RetryConfig> {
    resolve_config_with(opt, get_env_var_opt)
}

/// Resolves the retry configuration, reading environment variables through `lookup`.
///
/// Precedence from lowest to highest: defaults, configuration file, environment, flags.
/// Layers are merged first and the result is validated once, so a higher layer can replace
/// an invalid value from a lower one.
///
/// # Errors
///
/// Returns an error if a layer cannot be read or parsed, or the merged configuration is invalid.
pub fn resolve_config_with<F>(opt: &RetryOpt, lookup: F) -> anyhow::Result<RetryConfig>
where
    F: Fn(&str) -> anyhow::Result<Option<String>>,
{
    let base = match &opt.config {
        Some(path) => RetryConfig::read_file(path)?,
        None => RetryConfig::default(),
    };

    let config = base
        .apply_env_with(lookup)?
        .with_overrides(opt.retries, opt.delay_ms);
    config.validate()?;
    Ok(config)
}

async fn run_with_retry(opt: &RunOpt) -> anyhow::Result<()> {
    let config = resolve_config(&opt.retry)?;
    let executor = RetryExecutor::new(config)?;
    let argv = opt.command.as_slice();

    tracing::info!(
        retries = config.retries,
        delay_ms = config.delay_ms,
        "Running `{}`",
        argv.join(" ")
    );

    executor.execute(|| command::run_once(argv)).await?;

    tracing::info!("`{}` succeeded", argv.join(" "));
    Ok(())
}
