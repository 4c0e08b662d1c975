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

//! Timers used for the wait step between attempts.

use std::{
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

/// Signals once, no earlier than the requested duration.
pub trait Timer: Send + Sync {
    /// Returns a future which completes after at least `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

impl<C: Timer + ?Sized> Timer for &C {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        (**self).sleep(duration)
    }
}

impl<C: Timer + ?Sized> Timer for Arc<C> {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        (**self).sleep(duration)
    }
}

/// Sleeps on the tokio timer wheel.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Records requested durations and completes immediately.
#[derive(Debug, Default)]
pub struct RecordingTimer {
    requested: Mutex<Vec<Duration>>,
}

impl RecordingTimer {
    /// Creates a new [`RecordingTimer`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every duration requested so far, oldest first.
    #[must_use]
    pub fn requested(&self) -> Vec<Duration> {
        self.lock().clone()
    }

    /// Returns the sum of all requested durations.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.lock().iter().sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Duration>> {
        self.requested
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Timer for RecordingTimer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.lock().push(duration);
        std::future::ready(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_waits_at_least_duration() {
        let start = tokio::time::Instant::now();
        TokioTimer.sleep(Duration::from_millis(100)).await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[rstest]
    #[tokio::test]
    async fn test_recording_timer_records_and_completes() {
        let timer = RecordingTimer::new();
        timer.sleep(Duration::from_millis(5)).await;
        timer.sleep(Duration::from_millis(10)).await;

        assert_eq!(
            timer.requested(),
            vec![Duration::from_millis(5), Duration::from_millis(10)]
        );
        assert_eq!(timer.total(), Duration::from_millis(15));
    }

    #[rstest]
    #[tokio::test]
    async fn test_recording_timer_through_arc() {
        let timer = Arc::new(RecordingTimer::new());
        let shared = Arc::clone(&timer);
        shared.sleep(Duration::from_millis(1)).await;

        assert_eq!(timer.requested().len(), 1);
    }
}
