use std::{sync::Arc, time::Duration};

use stackutils::InterruptWatcher;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    runtime::{is_user_interrupt, ContainerRuntime, ExitReason},
    StackrunError, StackrunResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The lifecycle of a supervised development container.
///
/// `Starting → Running → {Interrupted, Failed, Completed}`. `Interrupted` moves on to
/// `Completed` once the grace period has passed; `Failed` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisionStatus {
    /// The runtime client has not been started yet.
    Starting,

    /// The runtime client is running.
    Running,

    /// The container was interrupted by the user.
    Interrupted,

    /// The container exited with an unexpected status.
    Failed,

    /// The container finished.
    Completed,
}

/// How a development container session ended, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevOutcome {
    /// The session ended normally, including a user interrupt observed through the exit status.
    Completed,

    /// An interrupt signal arrived, the container was stopped and the program should exit
    /// with a non-zero status.
    Interrupted,
}

/// Starts a development container through the runtime and supervises it until it ends.
pub struct Supervisor {
    /// The runtime the container is started with.
    runtime: Arc<dyn ContainerRuntime>,

    /// The container name, used to stop it on interrupt.
    container_name: String,

    /// The mode the container runs in, for diagnostics.
    mode: String,

    /// How long to wait after a user-interrupted exit.
    grace_period: Duration,

    /// Where the session is in its lifecycle.
    status: SupervisionStatus,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Supervisor {
    /// Creates a new supervisor for the container called `container_name`.
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        container_name: impl Into<String>,
        mode: impl Into<String>,
        grace_period: Duration,
    ) -> Self {
        Self {
            runtime,
            container_name: container_name.into(),
            mode: mode.into(),
            grace_period,
            status: SupervisionStatus::Starting,
        }
    }

    /// Returns where the session is in its lifecycle.
    pub fn status(&self) -> SupervisionStatus {
        self.status
    }

    /// Runs the container with `args` while watching for SIGINT and SIGTERM.
    ///
    /// On a signal the container is stopped by name and [`DevOutcome::Interrupted`] is
    /// returned, whatever the runtime client exits with meanwhile. The stop is always awaited
    /// before returning. Removal is left to the runtime since containers are started with `--rm`.
    pub async fn run(&mut self, args: &[String]) -> StackrunResult<DevOutcome> {
        let watcher = InterruptWatcher::new();
        let runtime = self.runtime.clone();
        let container_name = self.container_name.clone();
        let watcher_handle = watcher.spawn(move || async move {
            if let Err(e) = runtime.stop(&container_name).await {
                tracing::error!("failed to stop container {}: {}", container_name, e);
            }
        })?;

        let result = self.run_until(args, watcher.signalled()).await;

        // Shuts the watcher down if no signal came. A teardown already under way keeps going.
        watcher.handled().cancel();
        watcher_handle.await?;

        result
    }

    /// Runs the container with `args` until it exits or `interrupted` is cancelled.
    ///
    /// A cancelled token always wins. It is checked again after the container exits, so an
    /// exit caused by stopping the container still counts as an interrupt.
    pub async fn run_until(
        &mut self,
        args: &[String],
        interrupted: CancellationToken,
    ) -> StackrunResult<DevOutcome> {
        self.status = SupervisionStatus::Starting;
        let mut process = match self.runtime.spawn(args).await {
            Ok(process) => process,
            Err(e) => {
                self.status = SupervisionStatus::Failed;
                return Err(e);
            }
        };
        self.status = SupervisionStatus::Running;

        let reason = tokio::select! {
            biased;
            _ = interrupted.cancelled() => return Ok(self.interrupt()),
            reason = process.wait() => reason,
        };

        if interrupted.is_cancelled() {
            tracing::debug!("container {} exited after an interrupt", self.container_name);
            return Ok(self.interrupt());
        }

        let reason = match reason {
            Ok(reason) => reason,
            Err(e) => {
                self.status = SupervisionStatus::Failed;
                return Err(StackrunError::DevRunFailed {
                    mode: self.mode.clone(),
                    reason: e.to_string(),
                });
            }
        };

        self.handle_exit(reason, interrupted).await
    }

    fn interrupt(&mut self) -> DevOutcome {
        self.status = SupervisionStatus::Interrupted;
        DevOutcome::Interrupted
    }

    async fn handle_exit(
        &mut self,
        reason: ExitReason,
        interrupted: CancellationToken,
    ) -> StackrunResult<DevOutcome> {
        if reason.is_success() {
            tracing::debug!("container {} exited normally", self.container_name);
            self.status = SupervisionStatus::Completed;
            return Ok(DevOutcome::Completed);
        }

        if !is_user_interrupt(&reason) {
            tracing::error!("error waiting in 'stackrun {}': {}", self.mode, reason);
            self.status = SupervisionStatus::Failed;
            return Err(StackrunError::DevRunFailed {
                mode: self.mode.clone(),
                reason: reason.to_string(),
            });
        }

        self.status = SupervisionStatus::Interrupted;
        tracing::info!(
            "closing down development environment, sleeping {} seconds: {}",
            self.grace_period.as_secs(),
            reason
        );

        tokio::select! {
            biased;
            _ = interrupted.cancelled() => Ok(self.interrupt()),
            _ = time::sleep(self.grace_period) => {
                self.status = SupervisionStatus::Completed;
                Ok(DevOutcome::Completed)
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
