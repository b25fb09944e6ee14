use std::fmt;

use typed_builder::TypedBuilder;

use crate::config::{
    EnvAccessor, VolumeMount, CONTROLLER_CONTAINER_PATH, STACK_GROUP_ENV, STACK_RUN_AS_LOCAL_ENV,
    STACK_USER_ENV,
};

use super::{mount_args, PortResolution};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The local user and group a container runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// The user id.
    pub uid: u32,

    /// The group id.
    pub gid: u32,
}

/// Everything needed to start a development container.
///
/// A spec is built once per invocation and does not change after the container starts.
///
/// ## Examples
///
/// ```
/// use stackrun::launch::LaunchSpec;
///
/// let spec = LaunchSpec::builder()
///     .name("my-app-dev")
///     .image("stacks/nodejs:0.3")
///     .mode("run")
///     .build();
///
/// assert_eq!(
///     spec.to_args(),
///     vec![
///         "run", "--rm", "--name", "my-app-dev",
///         "-t", "--entrypoint", "/stack/stack-controller", "stacks/nodejs:0.3", "--mode=run",
///     ]
/// );
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct LaunchSpec {
    /// The container name.
    #[builder(setter(into))]
    name: String,

    /// The network the container joins.
    #[builder(default, setter(into))]
    network: Option<String>,

    /// The identity the container runs as.
    #[builder(default)]
    identity: Option<Identity>,

    /// The ports to publish.
    #[builder(default)]
    ports: PortResolution,

    /// The volumes to mount, controller last.
    #[builder(default)]
    mounts: Vec<VolumeMount>,

    /// The stack image.
    #[builder(setter(into))]
    image: String,

    /// The mode passed to the controller.
    #[builder(setter(into))]
    mode: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Identity {
    /// Returns the identity of the user running stackrun.
    pub fn current() -> Self {
        Self {
            uid: nix::unistd::getuid().as_raw(),
            gid: nix::unistd::getgid().as_raw(),
        }
    }

    /// Returns the local identity if the stack asks to run as the local user.
    pub fn requested_by(env: &impl EnvAccessor) -> Option<Self> {
        env.var_bool(STACK_RUN_AS_LOCAL_ENV).then(Self::current)
    }

    /// Returns the runtime arguments that run the container as this identity.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "-u".to_string(),
            self.to_string(),
            "-e".to_string(),
            format!("{}={}", STACK_USER_ENV, self.uid),
            "-e".to_string(),
            format!("{}={}", STACK_GROUP_ENV, self.gid),
        ]
    }
}

impl LaunchSpec {
    /// Returns the container name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the mode passed to the controller.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Returns the full argument list for the runtime, starting with the `run` subcommand.
    ///
    /// The entrypoint, image and mode always come last.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            self.name.clone(),
        ];

        if let Some(network) = &self.network {
            args.extend(["--network".to_string(), network.clone()]);
        }

        if let Some(identity) = &self.identity {
            args.extend(identity.to_args());
        }

        args.extend(mount_args(&self.mounts));
        args.extend(self.ports.to_args());
        args.extend([
            "-t".to_string(),
            "--entrypoint".to_string(),
            CONTROLLER_CONTAINER_PATH.to_string(),
            self.image.clone(),
            format!("--mode={}", self.mode),
        ]);

        args
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uid, self.gid)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
