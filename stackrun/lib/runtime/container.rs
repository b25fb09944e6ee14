use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{config::StackEnv, runtime::ExitReason, StackrunResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A container process started through a [`ContainerRuntime`].
#[async_trait]
pub trait ContainerProcess: Send {
    /// Waits for the process to end and reports how it ended.
    async fn wait(&mut self) -> StackrunResult<ExitReason>;
}

/// The external container runtime that stackrun drives.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Returns the command line the runtime would execute for `args`.
    fn describe(&self, args: &[String]) -> String;

    /// Checks that the runtime's tooling is available on this host.
    fn check_prerequisites(&self) -> StackrunResult<()> {
        Ok(())
    }

    /// Makes sure `image` is available locally.
    async fn pull(&self, image: &str) -> StackrunResult<()>;

    /// Returns the configuration `image` declares for its containers.
    async fn inspect_image(&self, image: &str) -> StackrunResult<ImageConfig>;

    /// Starts the runtime with `args`, streaming its output to the caller.
    async fn spawn(&self, args: &[String]) -> StackrunResult<Box<dyn ContainerProcess>>;

    /// Asks the runtime to stop the container called `name`.
    async fn stop(&self, name: &str) -> StackrunResult<()>;

    /// Returns the runtime's textual listing of running containers.
    async fn list(&self) -> StackrunResult<String>;
}

/// What an image declares about the containers created from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageConfig {
    /// The container ports the image exposes, without protocol suffix.
    pub exposed_ports: Vec<String>,

    /// The environment the image declares.
    pub env: StackEnv,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawImageConfig {
    #[serde(default)]
    exposed_ports: Option<HashMap<String, serde_json::Value>>,

    #[serde(default)]
    env: Option<Vec<String>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ImageConfig {
    /// Parses the JSON image configuration printed by `inspect --format {{json .Config}}`.
    ///
    /// Exposed ports like `8080/tcp` are reduced to `8080` and sorted numerically.
    pub fn from_inspect_json(json: &str) -> StackrunResult<Self> {
        let raw: RawImageConfig = serde_json::from_str(json.trim())?;

        let mut exposed_ports: Vec<String> = raw
            .exposed_ports
            .unwrap_or_default()
            .into_keys()
            .map(|key| match key.split_once('/') {
                Some((port, _protocol)) => port.to_string(),
                None => key,
            })
            .collect();
        exposed_ports.sort_by_key(|port| (port.parse::<u32>().unwrap_or(u32::MAX), port.clone()));
        exposed_ports.dedup();

        Ok(Self {
            exposed_ports,
            env: StackEnv::from_entries(raw.env.unwrap_or_default()),
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
