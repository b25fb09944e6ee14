use std::{future::Future, sync::Arc, time::Duration};

use getset::CopyGetters;
use tokio::time;

use crate::{
    config::{DEFAULT_HEALTH_CHECK_INTERVAL, DEFAULT_HEALTH_CHECK_TIMEOUT},
    runtime::ContainerRuntime,
    StackrunError, StackrunResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Progress of a single health poll.
#[derive(Debug, Clone, PartialEq, Eq, CopyGetters)]
pub struct HealthPollState {
    /// Time waited so far, counted in whole intervals.
    #[getset(get_copy = "pub with_prefix")]
    elapsed: Duration,

    /// Time between two listings.
    #[getset(get_copy = "pub with_prefix")]
    interval: Duration,

    /// Time after which the container is declared unhealthy.
    #[getset(get_copy = "pub with_prefix")]
    timeout: Duration,

    /// Whether the container has been seen in a listing.
    #[getset(get_copy = "pub with_prefix")]
    observed: bool,
}

/// Polls the runtime's container listing until a container shows up.
pub struct HealthPoller {
    runtime: Arc<dyn ContainerRuntime>,
    container_name: String,
    state: HealthPollState,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl HealthPollState {
    /// Creates a fresh state.
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            interval,
            timeout,
            observed: false,
        }
    }

    /// Returns true once the timeout has been reached.
    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.timeout
    }

    fn tick(&mut self) {
        self.elapsed += self.interval;
    }
}

impl HealthPoller {
    /// Creates a poller for `container_name` with the default interval and timeout.
    pub fn new(runtime: Arc<dyn ContainerRuntime>, container_name: impl Into<String>) -> Self {
        Self {
            runtime,
            container_name: container_name.into(),
            state: HealthPollState::new(
                DEFAULT_HEALTH_CHECK_INTERVAL,
                DEFAULT_HEALTH_CHECK_TIMEOUT,
            ),
        }
    }

    /// Overrides the polling interval and timeout.
    pub fn with_timing(mut self, interval: Duration, timeout: Duration) -> Self {
        self.state = HealthPollState::new(interval, timeout);
        self
    }

    /// Returns the progress of the poll.
    pub fn state(&self) -> &HealthPollState {
        &self.state
    }

    /// Waits until the container appears in the runtime's listing.
    ///
    /// Every interval the listing is checked, racing against `run_finished`, which resolves
    /// when the run that should produce the container ends. The run ending first is an error:
    /// its own error is returned when it has one. A listing failure is also returned as is.
    pub async fn wait_until_healthy<F>(&mut self, run_finished: F) -> StackrunResult<()>
    where
        F: Future<Output = StackrunResult<()>>,
    {
        tokio::pin!(run_finished);

        while !self.state.is_expired() {
            tokio::select! {
                result = &mut run_finished => {
                    tracing::error!("stackrun run failed");
                    return Err(match result {
                        Err(e) => e,
                        Ok(()) => StackrunError::RunExitedEarly(format!(
                            "container {} was never listed",
                            self.container_name
                        )),
                    });
                }
                _ = time::sleep(self.state.interval) => {
                    self.state.tick();

                    let listing = self.runtime.list().await.inspect_err(|e| {
                        tracing::error!("failed to list containers: {}", e);
                    })?;

                    if listing.contains(&self.container_name) {
                        tracing::info!("container listing contains {}", self.container_name);
                        self.state.observed = true;
                        return Ok(());
                    }

                    tracing::info!(
                        "container listing doesn't contain {} yet ({}s of {}s)",
                        self.container_name,
                        self.state.elapsed.as_secs(),
                        self.state.timeout.as_secs()
                    );
                }
            }
        }

        tracing::error!("container listing never found {}", self.container_name);
        Err(StackrunError::NeverHealthy {
            name: self.container_name.clone(),
            waited_secs: self.state.elapsed.as_secs(),
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
