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

use std::path::PathBuf;

use clap::Parser;

/// Main CLI structure for parsing command-line arguments and options.
#[derive(Debug, Parser)]
#[clap(name = "keep-trying", version, about, author)]
pub struct KeepTryingCli {
    #[clap(subcommand)]
    pub command: Commands,
}

/// Available top-level commands.
#[derive(Parser, Debug)]
pub enum Commands {
    /// Run a command until it exits successfully.
    Run(RunOpt),
    /// Print the resolved retry configuration.
    Config(RetryOpt),
}

/// Retry configuration options.
///
/// Values given here take precedence over the `KEEP_TRYING_*` environment variables, which
/// take precedence over the configuration file.
#[derive(Parser, Debug, Clone, Default)]
pub struct RetryOpt {
    /// Total number of attempts, including the first.
    #[arg(short = 'r', long)]
    pub retries: Option<u32>,
    /// Delay between a failed attempt and the next one (milliseconds).
    #[arg(short = 'd', long)]
    pub delay_ms: Option<u64>,
    /// Path to a TOML or JSON retry configuration file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

/// Options for running an external command until it succeeds.
#[derive(Parser, Debug, Clone)]
pub struct RunOpt {
    #[clap(flatten)]
    pub retry: RetryOpt,
    /// The program to run followed by its arguments.
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}
