use std::{path::PathBuf, sync::LazyLock, time::Duration};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The sub directory of the user's home where stackrun keeps its artifacts.
pub const STACKRUN_HOME_DIR: &str = ".stackrun";

/// The file name of the controller binary, both next to the stackrun executable and in
/// [`STACKRUN_HOME_DIR`].
pub const CONTROLLER_FILENAME: &str = "stack-controller";

/// Where the controller binary is mounted inside the container. It is also the entrypoint.
pub const CONTROLLER_CONTAINER_PATH: &str = "/stack/stack-controller";

/// Host environment variable that overrides the controller binary location.
pub const CONTROLLER_OVERRIDE_ENV: &str = "STACKRUN_MOUNT_CONTROLLER";

/// Stack environment variable naming the dependency cache directory in the container.
pub const STACK_DEPS_ENV: &str = "STACK_DEPS";

/// Stack environment variable naming the primary application port.
pub const STACK_PORT_ENV: &str = "PORT";

/// Stack environment variable requesting the container run as the local user.
pub const STACK_RUN_AS_LOCAL_ENV: &str = "STACK_USER_RUN_AS_LOCAL";

/// Stack environment variable listing extra project mounts, separated by `;`.
pub const STACK_MOUNTS_ENV: &str = "STACK_MOUNTS";

/// Container environment variable carrying the local user id.
pub const STACK_USER_ENV: &str = "STACK_USER";

/// Container environment variable carrying the local group id.
pub const STACK_GROUP_ENV: &str = "STACK_GROUP";

/// The project configuration file name.
pub const PROJECT_CONFIG_FILENAME: &str = ".stackrun-config.yaml";

/// Suffix appended to the project directory name to form the default container name.
pub const CONTAINER_NAME_SUFFIX: &str = "-dev";

/// Suffix appended to the project directory name to form the default dependency volume.
pub const DEPS_VOLUME_SUFFIX: &str = "-deps";

/// The container name used while verifying that a stack runs.
pub const VERIFY_CONTAINER_NAME: &str = "stackrun-verify-container";

/// The container runtime executable.
pub const DEFAULT_RUNTIME_EXE: &str = "docker";

/// How long to wait after a user-interrupted exit before reporting success.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(60);

/// How often the health poller lists containers.
pub const DEFAULT_HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// How long the health poller waits for the container to appear.
pub const DEFAULT_HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(60);

/// The location the controller binary is staged to when no override is given.
pub static DEFAULT_CONTROLLER_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    dirs::home_dir().map(|home| home.join(STACKRUN_HOME_DIR).join(CONTROLLER_FILENAME))
});
