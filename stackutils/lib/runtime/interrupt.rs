use std::future::Future;

use tokio::{
    signal::unix::{signal, SignalKind},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::{StackutilsError, StackutilsResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Watches for an interrupt and turns it into a cancellation.
///
/// The watcher never ends the process itself. As soon as the interrupt arrives it cancels
/// its `signalled` token, then runs the configured teardown and finally cancels its
/// `handled` token. The exit decision is left to whoever observes the tokens.
#[derive(Debug, Clone, Default)]
pub struct InterruptWatcher {
    /// Cancelled the moment an interrupt is received, before any teardown runs.
    signalled: CancellationToken,

    /// Cancelled once the teardown has finished.
    handled: CancellationToken,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl InterruptWatcher {
    /// Creates a new watcher with fresh cancellation tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the token cancelled as soon as an interrupt is received.
    pub fn signalled(&self) -> CancellationToken {
        self.signalled.clone()
    }

    /// Returns the token cancelled once an interrupt has been handled.
    ///
    /// Cancelling it before any interrupt arrives shuts the watcher down without a teardown.
    pub fn handled(&self) -> CancellationToken {
        self.handled.clone()
    }

    /// Installs SIGINT and SIGTERM handlers and spawns the watcher task.
    ///
    /// `on_interrupt` runs to completion before the `handled` token is cancelled.
    pub fn spawn<F, Fut>(&self, on_interrupt: F) -> StackutilsResult<JoinHandle<()>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut sigint = signal(SignalKind::interrupt()).map_err(StackutilsError::SignalHandler)?;
        let mut sigterm =
            signal(SignalKind::terminate()).map_err(StackutilsError::SignalHandler)?;

        let trigger = async move {
            tokio::select! {
                _ = sigint.recv() => tracing::info!("received SIGINT signal"),
                _ = sigterm.recv() => tracing::info!("received SIGTERM signal"),
            }
        };

        Ok(self.spawn_with(trigger, on_interrupt))
    }

    /// Spawns the watcher task with a custom trigger in place of the OS signals.
    ///
    /// The task exits silently if the `handled` token is cancelled before the trigger fires.
    /// Once the trigger has fired the teardown always runs to completion.
    pub fn spawn_with<T, F, Fut>(&self, trigger: T, on_interrupt: F) -> JoinHandle<()>
    where
        T: Future<Output = ()> + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let signalled = self.signalled.clone();
        let handled = self.handled.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = trigger => {
                    signalled.cancel();
                    on_interrupt().await;
                    handled.cancel();
                }
                _ = handled.cancelled() => {}
            }
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
