//! Checking that a stack's development container comes up.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::Arc,
};

use async_trait::async_trait;
use tokio::process::Command;

use crate::{
    config::VERIFY_CONTAINER_NAME,
    runtime::{ContainerRuntime, ExitReason, HealthPoller},
    StackrunError, StackrunResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Starts the development run whose container is being verified.
#[async_trait]
pub trait DevLauncher: Send + Sync {
    /// Runs the project in `project_dir` as a container called `container_name`, resolving
    /// when the run ends. Dropping the returned future ends the run.
    async fn launch(&self, project_dir: &Path, container_name: &str) -> StackrunResult<()>;
}

/// Launches the run by invoking the stackrun executable again.
#[derive(Debug, Clone, Default)]
pub struct ExecutableLauncher {
    /// The executable to invoke. Defaults to the running executable.
    exe: Option<PathBuf>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ExecutableLauncher {
    /// Creates a launcher that invokes `exe` instead of the running executable.
    pub fn with_exe(exe: impl Into<PathBuf>) -> Self {
        Self {
            exe: Some(exe.into()),
        }
    }

    fn exe(&self) -> StackrunResult<PathBuf> {
        match &self.exe {
            Some(exe) => Ok(exe.clone()),
            None => std::env::current_exe()
                .map_err(|e| StackrunError::ExecutableLocation(e.to_string())),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Verifies that the project in `project_dir` starts a container.
///
/// The run is started through `launcher` under [`VERIFY_CONTAINER_NAME`] and the runtime's
/// listing is polled until that container appears. Once it does the container is stopped.
/// Failing to stop it is only logged.
pub async fn run(
    project_dir: impl AsRef<Path>,
    runtime: Arc<dyn ContainerRuntime>,
    launcher: &dyn DevLauncher,
) -> StackrunResult<()> {
    let project_dir = project_dir.as_ref();
    tracing::info!(
        "verifying that {} starts a container",
        project_dir.display()
    );

    let mut poller = HealthPoller::new(runtime.clone(), VERIFY_CONTAINER_NAME);
    poller
        .wait_until_healthy(launcher.launch(project_dir, VERIFY_CONTAINER_NAME))
        .await?;

    if let Err(e) = runtime.stop(VERIFY_CONTAINER_NAME).await {
        tracing::error!("failed to stop {}: {}", VERIFY_CONTAINER_NAME, e);
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl DevLauncher for ExecutableLauncher {
    async fn launch(&self, project_dir: &Path, container_name: &str) -> StackrunResult<()> {
        let exe = self.exe()?;
        let command = format!("{} run --name {}", exe.display(), container_name);
        tracing::debug!("running {} in {}", command, project_dir.display());

        let status = Command::new(&exe)
            .args(["run", "--name", container_name])
            .current_dir(project_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| StackrunError::runtime_command(&command, e))?;

        let reason = ExitReason::from(status);
        if !reason.is_success() {
            return Err(StackrunError::runtime_command(command, reason));
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::{fs::Permissions, os::unix::fs::PermissionsExt, time::Duration};

    use super::*;
    use crate::runtime::testing::FakeRuntime;

    const LISTING: &str =
        "CONTAINER ID   IMAGE   NAMES\n4f2c   stacks/nodejs   stackrun-verify-container\n";

    /// Runs for `runs_for`, or forever when it is `None`.
    struct FakeLauncher {
        runs_for: Option<Duration>,
        fails: bool,
    }

    #[async_trait]
    impl DevLauncher for FakeLauncher {
        async fn launch(&self, _: &Path, container_name: &str) -> StackrunResult<()> {
            let Some(runs_for) = self.runs_for else {
                return std::future::pending().await;
            };

            tokio::time::sleep(runs_for).await;
            if self.fails {
                return Err(StackrunError::runtime_command(
                    format!("stackrun run --name {}", container_name),
                    "exit status 1",
                ));
            }

            Ok(())
        }
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_verify_stops_container_once_listed() -> anyhow::Result<()> {
        let runtime = Arc::new(FakeRuntime::running_forever().with_listings(["", LISTING]));
        let launcher = FakeLauncher {
            runs_for: None,
            fails: false,
        };

        run("/work/my-app", runtime.clone(), &launcher).await?;

        assert_eq!(
            runtime.calls(),
            vec!["list", "list", "stop stackrun-verify-container"]
        );
        Ok(())
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_verify_ignores_stop_failure() -> anyhow::Result<()> {
        let runtime = FakeRuntime {
            stop_fails: true,
            ..Default::default()
        };
        let runtime = Arc::new(runtime.with_listings([LISTING]));
        let launcher = FakeLauncher {
            runs_for: None,
            fails: false,
        };

        run("/work/my-app", runtime.clone(), &launcher).await?;
        assert_eq!(
            runtime.calls().last().map(String::as_str),
            Some("stop stackrun-verify-container")
        );
        Ok(())
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_verify_propagates_launch_failure() {
        let runtime = Arc::new(FakeRuntime::running_forever().with_listings([""]));
        let launcher = FakeLauncher {
            runs_for: Some(Duration::from_secs(3)),
            fails: true,
        };

        let result = run("/work/my-app", runtime.clone(), &launcher).await;

        assert!(matches!(result, Err(StackrunError::RuntimeCommand { .. })));
        assert!(!runtime.calls().iter().any(|call| call.starts_with("stop")));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_verify_times_out() {
        let runtime = Arc::new(FakeRuntime::running_forever().with_listings([""]));
        let launcher = FakeLauncher {
            runs_for: None,
            fails: false,
        };

        let result = run("/work/my-app", runtime, &launcher).await;

        assert!(matches!(
            result,
            Err(StackrunError::NeverHealthy { waited_secs: 60, .. })
        ));
    }

    #[tokio::test]
    async fn test_executable_launcher_reports_failure() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let launcher = ExecutableLauncher::with_exe("false");

        let result = launcher.launch(dir.path(), VERIFY_CONTAINER_NAME).await;
        assert!(matches!(result, Err(StackrunError::RuntimeCommand { .. })));
        Ok(())
    }

    /// Returns whether `pid` has exited, counting a zombie awaiting its reaper as exited.
    fn has_exited(pid: u32) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => stat
                .rsplit_once(") ")
                .is_some_and(|(_, rest)| rest.starts_with('Z')),
            Err(_) => true,
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_executable_launcher_kills_run_when_dropped() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let exe = dir.path().join("stackrun-fake");
        std::fs::write(&exe, "#!/bin/sh\necho $$ > launched.pid\nexec sleep 30\n")?;
        std::fs::set_permissions(&exe, Permissions::from_mode(0o755))?;

        let launcher = ExecutableLauncher::with_exe(&exe);
        let pid_file = dir.path().join("launched.pid");
        let pid = {
            let launch = launcher.launch(dir.path(), VERIFY_CONTAINER_NAME);
            tokio::pin!(launch);

            let started = async {
                loop {
                    let pid = std::fs::read_to_string(&pid_file).unwrap_or_default();
                    if let Ok(pid) = pid.trim().parse::<u32>() {
                        return pid;
                    }
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
            };

            tokio::select! {
                result = &mut launch => panic!("run ended early: {:?}", result),
                pid = tokio::time::timeout(Duration::from_secs(5), started) => pid?,
            }
        };

        tokio::time::timeout(Duration::from_secs(5), async {
            while !has_exited(pid) {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await?;
        Ok(())
    }
}
