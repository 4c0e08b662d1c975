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

//! Environment variable helpers.

use std::{env::VarError, fmt::Display, str::FromStr};

/// Returns the environment variable for the given `key`, or `None` if it is unset.
///
/// # Errors
///
/// Returns an error if the variable is set but not valid unicode.
pub fn get_env_var_opt(key: &str) -> anyhow::Result<Option<String>> {
    env_var_from(key, std::env::var(key))
}

fn env_var_from(key: &str, var: Result<String, VarError>) -> anyhow::Result<Option<String>> {
    match var {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => {
            anyhow::bail!("environment variable '{key}' is not valid unicode")
        }
    }
}

/// Parses the raw `value` of the environment variable `key`.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns an error naming `key` if `value` cannot be parsed as `T`.
pub fn parse_env_var<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("invalid value for environment variable '{key}': {e}"))
}
