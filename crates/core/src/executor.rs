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

//! Fixed-delay retry execution of asynchronous operations.
//!
//! The executor drives a plain attempt loop: invoke the operation, return the first value,
//! otherwise report the error, spend one unit of the budget and sleep before trying again.
//! No sleep follows a success or the final failed attempt.

use std::{fmt::Display, future::Future};

use tracing::debug;

use crate::{
    attempt::{Attempt, AttemptStatus},
    config::RetryConfig,
    error::RetryError,
    sink::{DiagnosticSink, TracingSink},
    timer::{Timer, TokioTimer},
};

/// Re-invokes an operation until it succeeds or the attempt budget is spent.
///
/// The executor is stateless between calls: each [`RetryExecutor::execute`] owns its own
/// budget counter and timer, so concurrent executions through a shared executor never
/// interfere with each other.
#[derive(Debug)]
pub struct RetryExecutor<S = TracingSink, C = TokioTimer> {
    config: RetryConfig,
    sink: S,
    timer: C,
}

impl RetryExecutor {
    /// Creates a new executor reporting to `tracing` and sleeping on the tokio timer.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: RetryConfig) -> Result<Self, RetryError> {
        config.validate()?;
        Ok(Self {
            config,
            sink: TracingSink,
            timer: TokioTimer,
        })
    }
}

impl<S, C> RetryExecutor<S, C> {
    /// Returns the executor with its diagnostic sink replaced.
    #[must_use]
    pub fn with_sink<S2: DiagnosticSink>(self, sink: S2) -> RetryExecutor<S2, C> {
        RetryExecutor {
            config: self.config,
            sink,
            timer: self.timer,
        }
    }

    /// Returns the executor with its timer replaced.
    #[must_use]
    pub fn with_timer<C2: Timer>(self, timer: C2) -> RetryExecutor<S, C2> {
        RetryExecutor {
            config: self.config,
            sink: self.sink,
            timer,
        }
    }

    /// Returns the configuration of this executor.
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl<S, C> RetryExecutor<S, C>
where
    S: DiagnosticSink,
    C: Timer,
{
    /// Executes `operation` with retry logic.
    ///
    /// The operation is invoked at most `retries` times. Each failure is reported to the
    /// diagnostic sink, and a failure which leaves budget remaining is followed by a sleep of
    /// `delay_ms` before the next invocation.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::Exhausted`] carrying the configured budget if every attempt fails.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let retries = self.config.retries;
        let delay = self.config.delay();
        let mut remaining = retries;
        let mut attempt = 0;

        loop {
            attempt += 1;

            match Attempt::from(operation().await) {
                Attempt::Succeeded(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Operation succeeded after {attempt} attempts");
                    }
                    return Ok(value);
                }
                Attempt::Failed(error) => {
                    self.sink.attempt_failed(attempt, &error);
                }
            }

            remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                break;
            }

            debug!(
                attempt,
                remaining,
                status = %AttemptStatus::Waiting,
                "Retrying in {delay:?}"
            );
            self.timer.sleep(delay).await;
        }

        debug!(retries, "Operation exhausted its attempt budget");
        Err(RetryError::Exhausted { retries })
    }
}

/// Executes `operation` up to `retries` times, sleeping `delay_ms` between failed attempts.
///
/// Failures are reported through [`TracingSink`].
///
/// # Errors
///
/// Returns [`RetryError::InvalidConfig`] if `retries` is zero (the operation is never invoked),
/// or [`RetryError::Exhausted`] if every attempt fails.
pub async fn keep_trying<F, Fut, T, E>(
    operation: F,
    retries: u32,
    delay_ms: u64,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let config = RetryConfig::new(retries, delay_ms)?;
    RetryExecutor::new(config)?.execute(operation).await
}

/// Executes `operation` with the default budget of 3 attempts and a 1 second delay.
///
/// # Errors
///
/// Returns [`RetryError::Exhausted`] if every attempt fails.
pub async fn keep_trying_with_defaults<F, Fut, T, E>(operation: F) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    RetryExecutor::new(RetryConfig::default())?
        .execute(operation)
        .await
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicU32, Ordering},
        },
        time::Duration,
    };

    use rstest::rstest;
    use tokio::time::Instant;

    use super::*;
    use crate::{sink::RecordingSink, timer::RecordingTimer};

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("boom")]
        Boom,
        #[error("attempt {0} failed")]
        Numbered(u32),
    }

    /// Returns an operation failing `failures` times before yielding `value`.
    fn flaky(
        calls: Arc<AtomicU32>,
        failures: u32,
        value: i32,
    ) -> impl FnMut() -> std::future::Ready<Result<i32, TestError>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= failures {
                std::future::ready(Err(TestError::Numbered(n)))
            } else {
                std::future::ready(Ok(value))
            }
        }
    }

    // The paused clock jumps straight to each deadline, give or take timer wheel rounding
    fn assert_elapsed(elapsed: Duration, expected: Duration) {
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(5),
            "expected ~{expected:?}, was {elapsed:?}"
        );
    }

    fn executor(
        retries: u32,
        delay_ms: u64,
        sink: Arc<RecordingSink>,
    ) -> RetryExecutor<Arc<RecordingSink>, TokioTimer> {
        RetryExecutor::new(RetryConfig::new(retries, delay_ms).unwrap())
            .unwrap()
            .with_sink(sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_twice_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let sink = Arc::new(RecordingSink::new());
        let executor = executor(3, 100, Arc::clone(&sink));

        let start = Instant::now();
        let result = executor.execute(flaky(Arc::clone(&calls), 2, 42)).await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(sink.len(), 2);
        assert_elapsed(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_exhausts_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let sink = Arc::new(RecordingSink::new());
        let executor = executor(2, 50, Arc::clone(&sink));

        let start = Instant::now();
        let result = executor
            .execute(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, _>(TestError::Boom) }
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err, RetryError::Exhausted { retries: 2 });
        assert_eq!(err.to_string(), "\"keepTrying\" was not resolved after 2 tries");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(sink.errors(), vec!["boom".to_string(), "boom".to_string()]);
        assert_elapsed(start.elapsed(), Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_with_defaults() {
        let calls = Arc::new(AtomicU32::new(0));
        let sink = Arc::new(RecordingSink::new());
        let executor = RetryExecutor::new(RetryConfig::default())
            .unwrap()
            .with_sink(Arc::clone(&sink));

        let start = Instant::now();
        let result = executor.execute(flaky(Arc::clone(&calls), 0, 7)).await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sink.is_empty());
        assert_elapsed(start.elapsed(), Duration::ZERO);
    }

    #[rstest]
    #[case(1, 0)]
    #[case(1, 1)]
    #[case(3, 0)]
    #[case(3, 2)]
    #[case(3, 5)]
    #[case(5, 4)]
    #[tokio::test]
    async fn test_waits_only_between_attempts(#[case] retries: u32, #[case] failures: u32) {
        let calls = Arc::new(AtomicU32::new(0));
        let sink = Arc::new(RecordingSink::new());
        let timer = Arc::new(RecordingTimer::new());
        let executor = executor(retries, 10, Arc::clone(&sink)).with_timer(Arc::clone(&timer));

        let result = executor.execute(flaky(Arc::clone(&calls), failures, 1)).await;

        let invocations = calls.load(Ordering::SeqCst);
        if failures < retries {
            assert_eq!(result, Ok(1));
            assert_eq!(invocations, failures + 1);
            assert_eq!(sink.len(), failures as usize);
        } else {
            assert_eq!(result, Err(RetryError::Exhausted { retries }));
            assert_eq!(invocations, retries);
            assert_eq!(sink.len(), retries as usize);
        }
        assert_eq!(timer.requested().len(), invocations as usize - 1);
        assert!(timer.requested().iter().all(|d| *d == Duration::from_millis(10)));
    }

    #[rstest]
    #[tokio::test]
    async fn test_each_failure_reported_with_its_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let sink = Arc::new(RecordingSink::new());
        let executor = executor(4, 0, Arc::clone(&sink)).with_timer(RecordingTimer::new());

        let _ = executor.execute(flaky(Arc::clone(&calls), 10, 0)).await;

        let records = sink.records();
        assert_eq!(records.len(), 4);
        for (i, record) in records.iter().enumerate() {
            let attempt = i as u32 + 1;
            assert_eq!(record.attempt, attempt);
            assert_eq!(record.error, format!("attempt {attempt} failed"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_executions_are_independent() {
        let calls_a = Arc::new(AtomicU32::new(0));
        let calls_b = Arc::new(AtomicU32::new(0));
        let sink_a = Arc::new(RecordingSink::new());
        let sink_b = Arc::new(RecordingSink::new());
        let executor_a = executor(3, 100, Arc::clone(&sink_a));
        let executor_b = executor(2, 30, Arc::clone(&sink_b));

        let start = Instant::now();
        let (result_a, result_b) = tokio::join!(
            async {
                let result = executor_a.execute(flaky(Arc::clone(&calls_a), 2, 42)).await;
                (result, start.elapsed())
            },
            async {
                let result = executor_b.execute(flaky(Arc::clone(&calls_b), 5, 0)).await;
                (result, start.elapsed())
            },
        );

        assert_eq!(result_a.0, Ok(42));
        assert_elapsed(result_a.1, Duration::from_millis(200));
        assert_eq!(calls_a.load(Ordering::SeqCst), 3);
        assert_eq!(sink_a.len(), 2);

        assert_eq!(result_b.0, Err(RetryError::Exhausted { retries: 2 }));
        assert_elapsed(result_b.1, Duration::from_millis(30));
        assert_eq!(calls_b.load(Ordering::SeqCst), 2);
        assert_eq!(sink_b.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_executor_runs_concurrently() {
        let sink = Arc::new(RecordingSink::new());
        let executor = executor(2, 100, Arc::clone(&sink));
        let calls_a = Arc::new(AtomicU32::new(0));
        let calls_b = Arc::new(AtomicU32::new(0));

        let start = Instant::now();
        let (a, b) = tokio::join!(
            executor.execute(flaky(Arc::clone(&calls_a), 1, 1)),
            executor.execute(flaky(Arc::clone(&calls_b), 1, 2)),
        );

        assert_eq!((a, b), (Ok(1), Ok(2)));
        assert_eq!(sink.len(), 2);
        // Both waits overlap rather than run back to back
        assert_elapsed(start.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keep_trying_function() {
        let calls = Arc::new(AtomicU32::new(0));

        let start = Instant::now();
        let result = keep_trying(flaky(Arc::clone(&calls), 1, 9), 3, 100).await;

        assert_eq!(result, Ok(9));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_elapsed(start.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keep_trying_with_defaults_exhausts_after_three() {
        let calls = Arc::new(AtomicU32::new(0));

        let start = Instant::now();
        let result = keep_trying_with_defaults(flaky(Arc::clone(&calls), u32::MAX, 0)).await;

        assert_eq!(result, Err(RetryError::Exhausted { retries: 3 }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_elapsed(start.elapsed(), Duration::from_secs(2));
    }

    #[rstest]
    #[tokio::test]
    async fn test_zero_retries_never_invokes() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = keep_trying(flaky(Arc::clone(&calls), 0, 1), 0, 100).await;

        assert!(matches!(result, Err(RetryError::InvalidConfig(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    fn test_new_rejects_invalid_config() {
        let config = RetryConfig {
            retries: 0,
            delay_ms: 0,
        };
        assert!(RetryExecutor::new(config).is_err());
    }

    #[rstest]
    fn test_config_accessor() {
        let config = RetryConfig::new(4, 25).unwrap();
        let executor = RetryExecutor::new(config).unwrap();
        assert_eq!(executor.config(), &config);
    }
}
