//! Admission control for model fits.
//!
//! Fits are CPU-bound and run on the blocking pool. [`FitLimiter`] caps how
//! many run at once, bounds how long a request waits for a slot, and bounds
//! how long the caller waits for the result. A fit that outlives the caller's
//! deadline still runs to completion and keeps its slot until it does; there
//! is no cancellation.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use tokio::sync::Semaphore;

use crate::config::LimitSettings;
use crate::error::{ForecastError, ForecastResult};

/// Bounded executor for blocking fit work.
#[derive(Clone)]
pub struct FitLimiter {
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    admission_timeout: Duration,
    request_timeout: Duration,
}

impl FitLimiter {
    pub fn new(max_concurrent: usize, admission_timeout: Duration, request_timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            admission_timeout,
            request_timeout,
        }
    }

    pub fn from_settings(settings: &LimitSettings) -> Self {
        Self::new(
            settings.max_concurrent_fits,
            Duration::from_millis(settings.admission_timeout_ms),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Slots not currently held by a running fit.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `work` on the blocking pool once a slot is free.
    ///
    /// # Errors
    /// * `Overloaded` if no slot frees up within the admission timeout
    /// * `Timeout` if the work does not finish within the request timeout
    /// * `Internal` if the work panics
    /// * whatever `work` itself returns
    pub async fn run<F, T>(&self, work: F) -> ForecastResult<T>
    where
        F: FnOnce() -> ForecastResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = match tokio::time::timeout(
            self.admission_timeout,
            Arc::clone(&self.permits).acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_closed)) => {
                return Err(ForecastError::internal("fit limiter has been shut down"));
            }
            Err(_elapsed) => {
                warn!(
                    "rejecting fit: all {} slots busy for {:?}",
                    self.max_concurrent, self.admission_timeout
                );
                return Err(ForecastError::overloaded(format!(
                    "all {} forecast slots are busy; retry later",
                    self.max_concurrent
                )));
            }
        };

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            work()
        });

        match tokio::time::timeout(self.request_timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(ForecastError::internal(format!(
                "forecast task failed: {}",
                join_err
            ))),
            Err(_elapsed) => {
                warn!("forecast exceeded {:?}; result will be discarded", self.request_timeout);
                Err(ForecastError::timeout(format!(
                    "forecast did not complete within {} ms",
                    self.request_timeout.as_millis()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[tokio::test]
    async fn test_run_returns_work_result() {
        let limiter = FitLimiter::new(2, Duration::from_millis(100), Duration::from_secs(5));
        let value = limiter.run(|| Ok(41 + 1)).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(limiter.available(), 2);
    }

    #[tokio::test]
    async fn test_work_error_is_propagated() {
        let limiter = FitLimiter::new(1, Duration::from_millis(100), Duration::from_secs(5));
        let err = limiter
            .run(|| Err::<(), _>(ForecastError::model_fit("boom")))
            .await
            .unwrap_err();
        assert_eq!(err.category(), "MODEL_FIT_ERROR");
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let limiter = FitLimiter::new(1, Duration::from_millis(100), Duration::from_secs(5));
        let err = limiter
            .run(|| -> ForecastResult<()> { panic!("fit exploded") })
            .await
            .unwrap_err();
        assert_eq!(err.category(), "INTERNAL_ERROR");
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_admission_limit_rejects_when_busy() {
        let limiter = FitLimiter::new(1, Duration::from_millis(50), Duration::from_secs(5));
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let busy = limiter.clone();
        let first = tokio::spawn(async move {
            busy.run(move || {
                let _ = release_rx.recv();
                Ok(())
            })
            .await
        });

        // Wait until the first fit holds the only slot.
        while limiter.available() > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let err = limiter.run(|| Ok(())).await.unwrap_err();
        assert_eq!(err.category(), "OVERLOADED");

        release_tx.send(()).unwrap();
        first.await.unwrap().unwrap();
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_work_times_out_but_keeps_slot() {
        let limiter = FitLimiter::new(1, Duration::from_millis(50), Duration::from_millis(50));
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let err = limiter
            .run(move || {
                let _ = release_rx.recv();
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(err.category(), "TIMEOUT");
        // The abandoned fit still holds its slot until it finishes.
        assert_eq!(limiter.available(), 0);

        release_tx.send(()).unwrap();
        while limiter.available() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(limiter.available(), 1);
    }
}
