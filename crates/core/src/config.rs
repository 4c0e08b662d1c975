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

//! Configuration for a retry session.
//!
//! A [`RetryConfig`] can be built directly, deserialized from TOML or JSON, and layered with
//! the `KEEP_TRYING_*` environment variables. Every constructor that accepts external input
//! validates the result before returning it.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    env::{get_env_var_opt, parse_env_var},
    error::RetryError,
};

/// The default total attempt budget.
pub const DEFAULT_RETRIES: u32 = 3;

/// The default delay between attempts (milliseconds).
pub const DEFAULT_DELAY_MS: u64 = 1_000;

/// Environment variable overriding [`RetryConfig::retries`].
pub const ENV_RETRIES: &str = "KEEP_TRYING_RETRIES";

/// Environment variable overriding [`RetryConfig::delay_ms`].
pub const ENV_DELAY_MS: &str = "KEEP_TRYING_DELAY_MS";

/// Immutable parameters for one retry session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Total number of attempts permitted, including the first.
    pub retries: u32,
    /// Delay inserted between a failed attempt and the next attempt (milliseconds).
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl RetryConfig {
    /// Creates a new validated [`RetryConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::InvalidConfig`] if `retries` is zero.
    pub fn new(retries: u32, delay_ms: u64) -> Result<Self, RetryError> {
        let config = Self { retries, delay_ms };
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration can drive at least one attempt.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::InvalidConfig`] if `retries` is zero.
    pub fn validate(&self) -> Result<(), RetryError> {
        if self.retries == 0 {
            return Err(RetryError::InvalidConfig(
                "`retries` must be positive, was 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the inter-attempt delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Returns a copy with the given values replacing the current ones where present.
    #[must_use]
    pub fn with_overrides(self, retries: Option<u32>, delay_ms: Option<u64>) -> Self {
        Self {
            retries: retries.unwrap_or(self.retries),
            delay_ms: delay_ms.unwrap_or(self.delay_ms),
        }
    }

    /// Parses and validates a configuration from a TOML document.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, has unknown fields, or is invalid.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config = Self::parse_toml(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, has unknown fields, or is invalid.
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let config = Self::parse_json(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// Files with a `.json` extension are parsed as JSON, anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are rejected.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file as one layer of a merged configuration.
    ///
    /// The result is not validated, a later layer may still replace its values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read retry config '{}': {e}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::parse_json(&contents)
        } else {
            Self::parse_toml(&contents)
        }
    }

    /// Builds a validated configuration from the defaults overlaid with the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a `KEEP_TRYING_*` variable cannot be read or parsed, or the result
    /// is invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self::default().apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlays the `KEEP_TRYING_*` variables of the process environment.
    ///
    /// The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is not valid unicode or cannot be parsed.
    pub fn apply_env(self) -> anyhow::Result<Self> {
        self.apply_env_with(get_env_var_opt)
    }

    /// Overlays the `KEEP_TRYING_*` variables resolved through `lookup`.
    ///
    /// The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if `lookup` fails or a value cannot be parsed.
    pub fn apply_env_with<F>(self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> anyhow::Result<Option<String>>,
    {
        let retries = lookup(ENV_RETRIES)?
            .map(|v| parse_env_var::<u32>(ENV_RETRIES, &v))
            .transpose()?;
        let delay_ms = lookup(ENV_DELAY_MS)?
            .map(|v| parse_env_var::<u64>(ENV_DELAY_MS, &v))
            .transpose()?;

        Ok(self.with_overrides(retries, delay_ms))
    }

    fn parse_toml(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).map_err(|e| anyhow::anyhow!("Failed to parse retry config TOML: {e}"))
    }

    fn parse_json(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| anyhow::anyhow!("Failed to parse retry config JSON: {e}"))
    }
}
