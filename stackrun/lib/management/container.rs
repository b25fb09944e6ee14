//! Stopping and listing containers.

use crate::{runtime::ContainerRuntime, StackrunResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Stops the container called `name`.
pub async fn stop(runtime: &dyn ContainerRuntime, name: &str) -> StackrunResult<()> {
    runtime.stop(name).await.inspect_err(|e| {
        tracing::error!("failed to stop container {}: {}", name, e);
    })?;

    tracing::info!("stopped container {}", name);
    Ok(())
}

/// Returns the runtime's listing of running containers.
pub async fn ps(runtime: &dyn ContainerRuntime) -> StackrunResult<String> {
    runtime.list().await
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{runtime::testing::FakeRuntime, StackrunError};

    #[tokio::test]
    async fn test_stop_and_ps() -> anyhow::Result<()> {
        let runtime = FakeRuntime::running_forever().with_listings(["NAMES\nmy-app-dev\n"]);

        stop(&runtime, "my-app-dev").await?;
        assert_eq!(ps(&runtime).await?, "NAMES\nmy-app-dev\n");
        assert_eq!(runtime.calls(), vec!["stop my-app-dev", "list"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_stop_failure() {
        let runtime = FakeRuntime {
            stop_fails: true,
            ..Default::default()
        };

        assert!(matches!(
            stop(&runtime, "my-app-dev").await,
            Err(StackrunError::RuntimeCommand { .. })
        ));
    }
}
