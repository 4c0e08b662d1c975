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

//! The outcome of a single invocation of a retried operation.

use strum::{AsRefStr, Display, EnumIter};

/// The status of a retry step.
///
/// `Waiting` marks the pause between a failed attempt and the next invocation, it is never
/// the status of an [`Attempt`] itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    /// The operation resolved with a value.
    Succeeded,
    /// The operation resolved with an error.
    Failed,
    /// The executor is sleeping before the next attempt.
    Waiting,
}

/// The settled outcome of one invocation of the operation.
///
/// Exactly one of the value or the error is carried, determined by the variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attempt<T, E> {
    /// The invocation produced a value.
    Succeeded(T),
    /// The invocation produced an error.
    Failed(E),
}

impl<T, E> Attempt<T, E> {
    /// Returns the status of this attempt.
    #[must_use]
    pub const fn status(&self) -> AttemptStatus {
        match self {
            Self::Succeeded(_) => AttemptStatus::Succeeded,
            Self::Failed(_) => AttemptStatus::Failed,
        }
    }

    /// Returns whether the attempt produced a value.
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Returns whether the attempt produced an error.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Consumes the attempt, returning the value if it succeeded.
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Succeeded(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Consumes the attempt, returning the error if it failed.
    #[must_use]
    pub fn error(self) -> Option<E> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed(error) => Some(error),
        }
    }

    /// Converts the attempt back into a [`Result`].
    ///
    /// # Errors
    ///
    /// Returns the carried error if the attempt failed.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Succeeded(value) => Ok(value),
            Self::Failed(error) => Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Attempt<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Succeeded(value),
            Err(error) => Self::Failed(error),
        }
    }
}
