use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::{
    config::DEFAULT_RUNTIME_EXE,
    runtime::{ContainerProcess, ContainerRuntime, ExitReason, ImageConfig},
    StackrunError, StackrunResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Drives the Docker command line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    /// The docker executable.
    exe: PathBuf,
}

/// A `docker run` client process.
#[derive(Debug)]
pub struct DockerProcess {
    child: Child,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DockerCli {
    /// Creates a client for the `docker` executable found on `PATH`.
    pub fn new() -> Self {
        Self::with_exe(DEFAULT_RUNTIME_EXE)
    }

    /// Creates a client for a specific docker executable.
    pub fn with_exe(exe: impl AsRef<Path>) -> Self {
        Self {
            exe: exe.as_ref().to_path_buf(),
        }
    }

    /// Checks that the docker executable can be found.
    pub fn check_installed(&self) -> StackrunResult<PathBuf> {
        which::which(&self.exe).map_err(|e| {
            StackrunError::runtime_command(
                self.exe.display().to_string(),
                format!("{}. is docker installed and on your PATH?", e),
            )
        })
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.exe.display().to_string())
            .chain(args.iter().map(|arg| arg.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs docker to completion and returns its stdout.
    async fn output(&self, args: &[&str]) -> StackrunResult<String> {
        let command = self.command_line(args);
        tracing::debug!("running {}", command);

        let output = Command::new(&self.exe)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| StackrunError::runtime_command(&command, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StackrunError::runtime_command(
                &command,
                format!("{}: {}", ExitReason::from(output.status), stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    fn describe(&self, args: &[String]) -> String {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.command_line(&args)
    }

    fn check_prerequisites(&self) -> StackrunResult<()> {
        let path = self.check_installed()?;
        tracing::debug!("found docker at {}", path.display());
        Ok(())
    }

    async fn pull(&self, image: &str) -> StackrunResult<()> {
        tracing::info!("pulling docker image {}", image);
        let status = Command::new(&self.exe)
            .args(["pull", image])
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| StackrunError::runtime_command(self.command_line(&["pull", image]), e))?;

        if !status.success() {
            // A locally built or cached image is still usable without the registry.
            tracing::warn!(
                "docker image pull failed for {} ({}), using the local image if present",
                image,
                ExitReason::from(status)
            );
        }

        Ok(())
    }

    async fn inspect_image(&self, image: &str) -> StackrunResult<ImageConfig> {
        let json = self
            .output(&["image", "inspect", "--format", "{{json .Config}}", image])
            .await?;
        ImageConfig::from_inspect_json(&json)
    }

    async fn spawn(&self, args: &[String]) -> StackrunResult<Box<dyn ContainerProcess>> {
        let child = Command::new(&self.exe)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| StackrunError::runtime_command(self.describe(args), e))?;

        tracing::debug!("started runtime client with pid {:?}", child.id());
        Ok(Box::new(DockerProcess { child }))
    }

    async fn stop(&self, name: &str) -> StackrunResult<()> {
        tracing::info!("stopping container {}", name);
        self.output(&["stop", name]).await?;
        Ok(())
    }

    async fn list(&self) -> StackrunResult<String> {
        self.output(&["ps"]).await
    }
}

#[async_trait]
impl ContainerProcess for DockerProcess {
    async fn wait(&mut self) -> StackrunResult<ExitReason> {
        let status = self.child.wait().await?;
        Ok(status.into())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
