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

//! Single invocations of an external command.

use std::process::ExitStatus;

use tokio::process::Command;

/// The failure of one command invocation.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No command given")]
    Empty,
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` failed with {status}")]
    Exit { program: String, status: ExitStatus },
}

/// Runs `argv` once with inherited stdio, succeeding only on a zero exit status.
///
/// # Errors
///
/// Returns an error if `argv` is empty, the program cannot be spawned, or it exits unsuccessfully.
pub async fn run_once(argv: &[String]) -> Result<(), CommandError> {
    let (program, args) = argv.split_first().ok_or(CommandError::Empty)?;

    let status = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|source| CommandError::Spawn {
            program: program.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(CommandError::Exit {
            program: program.clone(),
            status,
        })
    }
}
