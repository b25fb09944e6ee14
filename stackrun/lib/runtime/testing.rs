//! In-memory runtime used by unit tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::{
    runtime::{ContainerProcess, ContainerRuntime, ExitReason, ImageConfig},
    StackrunError, StackrunResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A runtime that records every call and plays back scripted results.
#[derive(Debug, Default)]
pub(crate) struct FakeRuntime {
    /// Returned by `inspect_image`.
    pub image_config: ImageConfig,

    /// How long a spawned process runs. `None` runs forever.
    pub exit_after: Option<Duration>,

    /// How a spawned process ends.
    pub exit_reason: Option<ExitReason>,

    /// Makes `spawn` fail.
    pub spawn_fails: bool,

    /// Makes `stop` fail.
    pub stop_fails: bool,

    /// How a running process ends once `stop` is called. `None` leaves it running.
    pub exit_on_stop: Option<ExitReason>,

    /// How long `stop` takes to return. When set, its completion is recorded too.
    pub stop_delay: Option<Duration>,

    /// Woken by `stop` so the running process can exit.
    pub stopped: Arc<Notify>,

    /// Successive `list` outputs. The last one repeats once the queue is drained.
    pub listings: Mutex<VecDeque<String>>,

    /// Every call made, rendered as text.
    pub log: Mutex<Vec<String>>,
}

struct FakeProcess {
    exit_after: Option<Duration>,
    exit_reason: ExitReason,
    exit_on_stop: Option<ExitReason>,
    stopped: Arc<Notify>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl FakeRuntime {
    /// A runtime whose containers exit with `reason` after `after`.
    pub fn exiting(after: Duration, reason: ExitReason) -> Self {
        Self {
            exit_after: Some(after),
            exit_reason: Some(reason),
            ..Default::default()
        }
    }

    /// A runtime whose containers never exit by themselves.
    pub fn running_forever() -> Self {
        Self::default()
    }

    /// Makes a running process exit with `reason` once `stop` is called. `stop` itself
    /// returns `delay` later.
    pub fn exiting_on_stop(mut self, reason: ExitReason, delay: Duration) -> Self {
        self.exit_on_stop = Some(reason);
        self.stop_delay = Some(delay);
        self
    }

    /// Replaces the scripted `list` outputs.
    pub fn with_listings<I, S>(self, listings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.listings.lock().unwrap() = listings.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the image configuration returned by `inspect_image`.
    pub fn with_image_config(mut self, image_config: ImageConfig) -> Self {
        self.image_config = image_config;
        self
    }

    /// Returns the calls made so far.
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.log.lock().unwrap().push(call);
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    fn describe(&self, args: &[String]) -> String {
        format!("fake {}", args.join(" "))
    }

    async fn pull(&self, image: &str) -> StackrunResult<()> {
        self.record(format!("pull {}", image));
        Ok(())
    }

    async fn inspect_image(&self, image: &str) -> StackrunResult<ImageConfig> {
        self.record(format!("inspect {}", image));
        Ok(self.image_config.clone())
    }

    async fn spawn(&self, args: &[String]) -> StackrunResult<Box<dyn ContainerProcess>> {
        self.record(format!("spawn {}", args.join(" ")));
        if self.spawn_fails {
            return Err(StackrunError::runtime_command("fake run", "spawn refused"));
        }

        Ok(Box::new(FakeProcess {
            exit_after: self.exit_after,
            exit_reason: self.exit_reason.unwrap_or(ExitReason::Success),
            exit_on_stop: self.exit_on_stop,
            stopped: self.stopped.clone(),
        }))
    }

    async fn stop(&self, name: &str) -> StackrunResult<()> {
        self.record(format!("stop {}", name));
        if self.stop_fails {
            return Err(StackrunError::runtime_command("fake stop", "no such container"));
        }

        self.stopped.notify_one();
        if let Some(delay) = self.stop_delay {
            tokio::time::sleep(delay).await;
            self.record(format!("stopped {}", name));
        }

        Ok(())
    }

    async fn list(&self) -> StackrunResult<String> {
        self.record("list".to_string());
        let mut listings = self.listings.lock().unwrap();
        let listing = if listings.len() > 1 {
            listings.pop_front().unwrap_or_default()
        } else {
            listings.front().cloned().unwrap_or_default()
        };

        Ok(listing)
    }
}

#[async_trait]
impl ContainerProcess for FakeProcess {
    async fn wait(&mut self) -> StackrunResult<ExitReason> {
        let (exit_after, exit_reason) = (self.exit_after, self.exit_reason);
        let natural_exit = async move {
            match exit_after {
                Some(after) => {
                    tokio::time::sleep(after).await;
                    exit_reason
                }
                None => std::future::pending().await,
            }
        };

        let (exit_on_stop, stopped) = (self.exit_on_stop, self.stopped.clone());
        let stopped_exit = async move {
            match exit_on_stop {
                Some(reason) => {
                    stopped.notified().await;
                    reason
                }
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            reason = natural_exit => Ok(reason),
            reason = stopped_exit => Ok(reason),
        }
    }
}
