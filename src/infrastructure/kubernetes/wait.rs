// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Poll-with-timeout loop shared by every wait operation.

use crate::infrastructure::constants::{AVAILABILITY_POLL_INTERVAL, CONDITION_POLL_INTERVAL};
use crate::shared::error::{KubeError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Cadence for condition-style and availability-style polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub condition: Duration,
    pub availability: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            condition: CONDITION_POLL_INTERVAL,
            availability: AVAILABILITY_POLL_INTERVAL,
        }
    }
}

/// Drives a probe until it reports completion or the deadline passes.
///
/// The first probe runs immediately. Cancellation is by deadline only: the
/// whole loop, including an in-flight probe, is dropped once `timeout` elapses.
#[derive(Debug, Clone, Copy)]
pub struct WaitDriver {
    interval: Duration,
    timeout: Duration,
}

impl WaitDriver {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `fut` under the driver's deadline.
    ///
    /// `what` only feeds the timeout message.
    pub async fn run<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(KubeError::Timeout(format!(
                "context deadline exceeded after {:?} waiting for {}",
                self.timeout, what
            ))),
        }
    }

    /// Sleeps one interval between probes.
    pub async fn tick(&self) {
        sleep(self.interval).await;
    }

    /// Polls `probe` until it yields `Some`.
    ///
    /// A probe error aborts the wait; probes that should tolerate transient
    /// failures must map them to `Ok(None)` themselves.
    pub async fn poll<T, F, Fut>(&self, what: &str, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        self.run(what, async {
            loop {
                if let Some(value) = probe().await? {
                    return Ok(value);
                }

                self.tick().await;
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_poll_immediate_success() {
        let driver = WaitDriver::new(Duration::from_millis(10), Duration::from_secs(1));
        let value = driver.poll("value", || async { Ok(Some(42)) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_poll_succeeds_after_ticks() {
        let driver = WaitDriver::new(Duration::from_millis(10), Duration::from_secs(1));
        let probes = Arc::new(AtomicUsize::new(0));

        let counter = probes.clone();
        let result = driver
            .poll("third probe", move || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok((n >= 3).then_some(n))
                }
            })
            .await
            .unwrap();

        assert_eq!(result, 3);
        assert_eq!(probes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_times_out() {
        let driver = WaitDriver::new(Duration::from_millis(10), Duration::from_millis(50));
        let err = driver
            .poll::<(), _, _>("never", || async { Ok(None) })
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("context deadline exceeded"));
    }

    #[tokio::test]
    async fn test_poll_probe_error_aborts() {
        let driver = WaitDriver::new(Duration::from_millis(10), Duration::from_secs(1));
        let err = driver
            .poll::<(), _, _>("broken", || async {
                Err(KubeError::KubeError("boom".to_string()))
            })
            .await
            .unwrap_err();

        assert!(!err.is_timeout());
    }
}
