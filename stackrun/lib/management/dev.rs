//! Running a stack's development container.
//!
//! A run loads the project's stack image, works out which ports to publish and what to mount,
//! stages the controller binary and then supervises the container until it exits or the user
//! interrupts it.

use std::sync::Arc;

use crate::{
    config::{parse_port_pairs, DevOptions, EnvAccessor, ProjectConfig, STACK_PORT_ENV},
    launch::{resolve_ports, ControllerProvisioner, Identity, LaunchSpec, MountPlanner},
    runtime::{ContainerRuntime, DevOutcome, Supervisor},
    StackrunResult,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Runs the project's development container in `mode`.
///
/// ## Arguments
///
/// * `mode` - The mode passed to the controller, e.g. "run", "debug" or "test"
/// * `options` - The options for this invocation
/// * `runtime` - The container runtime to launch with
///
/// ## Returns
///
/// Returns [`DevOutcome::Completed`] when the container exits normally, or after the grace
/// period when it was stopped with Ctrl-C, and [`DevOutcome::Interrupted`] when stackrun itself
/// received SIGINT or SIGTERM. Errors are returned if:
/// - The project configuration is missing or has no stack
/// - A `--publish` mapping is malformed
/// - The controller binary cannot be staged
/// - The container fails to start or exits with an unexpected status
///
/// With `dry_run` set the command is logged and never executed.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use stackrun::{config::DevOptions, management::dev, runtime::DockerCli};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let options = DevOptions::builder()
///         .project_dir("/work/my-app")
///         .name("my-app-dev")
///         .deps_volume("my-app-deps")
///         .build();
///
///     dev::run("run", &options, Arc::new(DockerCli::new())).await?;
///     Ok(())
/// }
/// ```
pub async fn run(
    mode: &str,
    options: &DevOptions,
    runtime: Arc<dyn ContainerRuntime>,
) -> StackrunResult<DevOutcome> {
    let spec = prepare(mode, options, runtime.as_ref()).await?;
    let args = spec.to_args();

    if *options.get_dry_run() {
        tracing::info!("dry run: {}", runtime.describe(&args));
        return Ok(DevOutcome::Completed);
    }

    tracing::info!("running: {}", runtime.describe(&args));
    let mut supervisor = Supervisor::new(
        runtime,
        spec.name(),
        spec.mode(),
        *options.get_grace_period(),
    );

    supervisor.run(&args).await
}

/// Works out the complete launch for the project's development container without starting it.
///
/// The stack image is pulled unless this is a dry run, then inspected for its exposed ports
/// and environment. User port mappings are validated before the image is touched.
pub async fn prepare(
    mode: &str,
    options: &DevOptions,
    runtime: &dyn ContainerRuntime,
) -> StackrunResult<LaunchSpec> {
    let project = ProjectConfig::load(options.get_project_dir()).await?;
    tracing::debug!("project stack image is {}", project.stack);

    if let Err(e) = runtime.check_prerequisites() {
        tracing::warn!("{}", e);
    }

    let overrides = parse_port_pairs(options.get_publish())?;

    if *options.get_dry_run() {
        tracing::info!("dry run, skipping pull of {}", project.stack);
    } else {
        runtime.pull(&project.stack).await?;
    }

    let image = runtime.inspect_image(&project.stack).await?;
    let ports = resolve_ports(
        &image.exposed_ports,
        image.env.var(STACK_PORT_ENV),
        &overrides,
        *options.get_publish_all(),
    );

    let controller = ControllerProvisioner::new(options)?.provision().await?;
    let mounts = MountPlanner::new(options.get_project_dir(), options.get_deps_volume())
        .plan(&image.env, &controller)?;

    Ok(LaunchSpec::builder()
        .name(options.get_name())
        .network(options.get_network().clone())
        .identity(Identity::requested_by(&image.env))
        .ports(ports)
        .mounts(mounts)
        .image(project.stack)
        .mode(mode)
        .build())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serial_test::serial;
    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::{
        config::{StackEnv, PROJECT_CONFIG_FILENAME},
        runtime::{testing::FakeRuntime, ExitReason, ImageConfig},
        StackrunError,
    };

    fn project(stack: &str) -> anyhow::Result<TempDir> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILENAME),
            format!("stack: {}\n", stack),
        )?;
        Ok(dir)
    }

    fn options(dir: &TempDir, publish: &[&str], dry_run: bool) -> DevOptions {
        DevOptions::builder()
            .project_dir(dir.path())
            .name("my-app-dev")
            .deps_volume("my-app-deps")
            .publish(publish.iter().map(|p| p.to_string()).collect())
            .dry_run(dry_run)
            .controller_override("/opt/stack-controller")
            .grace_period(Duration::from_secs(1))
            .build()
    }

    fn node_image() -> ImageConfig {
        ImageConfig {
            exposed_ports: vec!["3000".to_string(), "9229".to_string()],
            env: StackEnv::from_entries(["PORT=3000", "STACK_DEPS=/project/user-app/node_modules"]),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_prepare_composes_launch() -> anyhow::Result<()> {
        let dir = project("stacks/nodejs:0.3")?;
        let runtime = FakeRuntime::running_forever().with_image_config(node_image());

        let spec = prepare("debug", &options(&dir, &["3001:3000"], false), &runtime).await?;
        let args = spec.to_args().join(" ");

        assert_eq!(
            args,
            "run --rm --name my-app-dev \
             -v my-app-deps:/project/user-app/node_modules \
             -v /opt/stack-controller:/stack/stack-controller \
             -p 3001:3000 -p 9229:9229 \
             -t --entrypoint /stack/stack-controller stacks/nodejs:0.3 --mode=debug"
        );
        assert_eq!(
            runtime.calls(),
            vec!["pull stacks/nodejs:0.3", "inspect stacks/nodejs:0.3"]
        );
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_prepare_rejects_bad_ports_before_pulling() -> anyhow::Result<()> {
        let dir = project("stacks/nodejs:0.3")?;
        let runtime = FakeRuntime::running_forever().with_image_config(node_image());

        let result = prepare("run", &options(&dir, &["3000"], false), &runtime).await;
        assert!(matches!(result, Err(StackrunError::MissingPortSeparator(_))));

        let result = prepare("run", &options(&dir, &["70000:3000"], false), &runtime).await;
        assert!(matches!(result, Err(StackrunError::InvalidPortNumber(_))));

        assert!(runtime.calls().is_empty());
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_prepare_requires_project_config() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let runtime = FakeRuntime::running_forever();

        let result = prepare("run", &options(&dir, &[], false), &runtime).await;
        assert!(matches!(result, Err(StackrunError::ProjectConfig(_))));
        assert!(runtime.calls().is_empty());
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_run_dry_run_never_spawns() -> anyhow::Result<()> {
        let dir = project("stacks/nodejs:0.3")?;
        let runtime = Arc::new(FakeRuntime::running_forever().with_image_config(node_image()));

        let outcome = run("run", &options(&dir, &[], true), runtime.clone()).await?;

        assert_eq!(outcome, DevOutcome::Completed);
        assert_eq!(runtime.calls(), vec!["inspect stacks/nodejs:0.3"]);
        Ok(())
    }

    #[test_log::test(tokio::test)]
    #[serial]
    async fn test_run_supervises_container() -> anyhow::Result<()> {
        let dir = project("stacks/nodejs:0.3")?;
        let runtime = Arc::new(
            FakeRuntime::exiting(Duration::from_millis(10), ExitReason::Success)
                .with_image_config(node_image()),
        );

        let outcome = run("test", &options(&dir, &[], false), runtime.clone()).await?;

        assert_eq!(outcome, DevOutcome::Completed);
        let calls = runtime.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[2].starts_with("spawn run --rm --name my-app-dev"));
        assert!(calls[2].ends_with("--mode=test"));
        Ok(())
    }

    #[test_log::test(tokio::test)]
    #[serial]
    async fn test_run_reports_failed_mode() -> anyhow::Result<()> {
        let dir = project("stacks/nodejs:0.3")?;
        let runtime = Arc::new(
            FakeRuntime::exiting(Duration::from_millis(10), ExitReason::Code(1))
                .with_image_config(node_image()),
        );

        let result = run("run", &options(&dir, &[], false), runtime).await;
        match result {
            Err(StackrunError::DevRunFailed { mode, reason }) => {
                assert_eq!(mode, "run");
                assert_eq!(reason, "exit status 1");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }
}
