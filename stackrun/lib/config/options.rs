use std::{
    path::{Component, Path, PathBuf},
    time::Duration,
};

use getset::Getters;
use typed_builder::TypedBuilder;

use crate::{
    cli::DevArgs,
    config::{
        CONTAINER_NAME_SUFFIX, CONTROLLER_OVERRIDE_ENV, DEFAULT_GRACE_PERIOD, DEPS_VOLUME_SUFFIX,
    },
    StackrunError, StackrunResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Options for a single development container invocation.
///
/// Built once per command and passed down explicitly; nothing here changes after the
/// container has been started.
#[derive(Debug, Clone, Getters, TypedBuilder)]
#[getset(get = "pub with_prefix")]
pub struct DevOptions {
    /// The project directory.
    #[builder(setter(into))]
    project_dir: PathBuf,

    /// The container name.
    #[builder(setter(into))]
    name: String,

    /// The volume that holds the stack's dependency cache.
    #[builder(setter(into))]
    deps_volume: String,

    /// The network the container joins.
    #[builder(default, setter(strip_option, into))]
    network: Option<String>,

    /// Raw `host:container` publish mappings supplied by the user.
    #[builder(default)]
    publish: Vec<String>,

    /// Whether every exposed port is published to a random host port.
    #[builder(default)]
    publish_all: bool,

    /// Whether to compute and report the launch without executing it.
    #[builder(default)]
    dry_run: bool,

    /// A controller binary to mount instead of the staged one.
    #[builder(default, setter(strip_option, into))]
    controller_override: Option<PathBuf>,

    /// How long to wait after a user-interrupted exit before reporting success.
    #[builder(default = DEFAULT_GRACE_PERIOD)]
    grace_period: Duration,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DevOptions {
    /// Resolves the options for a command from its arguments and the host environment.
    ///
    /// The project directory defaults to the current directory and is made absolute. The
    /// container name and dependency volume default to names derived from it.
    pub fn from_args(args: DevArgs, dry_run: bool) -> StackrunResult<Self> {
        let project_dir = resolve_project_dir(args.project_dir)?;

        let project_name = project_name(&project_dir)?;
        let controller_override = std::env::var_os(CONTROLLER_OVERRIDE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            name: args
                .name
                .unwrap_or_else(|| format!("{}{}", project_name, CONTAINER_NAME_SUFFIX)),
            deps_volume: args
                .deps_volume
                .unwrap_or_else(|| format!("{}{}", project_name, DEPS_VOLUME_SUFFIX)),
            project_dir,
            network: args.network.filter(|network| !network.is_empty()),
            publish: args.publish,
            publish_all: args.publish_all,
            dry_run,
            controller_override,
            grace_period: DEFAULT_GRACE_PERIOD,
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns `project_dir` as an absolute path, defaulting to the current directory.
///
/// Relative paths are joined onto the current directory and `.` and `..` components are
/// folded away without touching the filesystem.
pub fn resolve_project_dir(project_dir: Option<PathBuf>) -> StackrunResult<PathBuf> {
    let current_dir = std::env::current_dir()?;
    let joined = match project_dir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => current_dir.join(dir),
        None => return Ok(current_dir),
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }

    Ok(resolved)
}

/// Returns the name of the development container for the project in `project_dir`.
pub fn default_container_name(project_dir: impl AsRef<Path>) -> StackrunResult<String> {
    Ok(format!("{}{}", project_name(project_dir)?, CONTAINER_NAME_SUFFIX))
}

/// Returns the final component of `project_dir`, which names the project.
pub fn project_name(project_dir: impl AsRef<Path>) -> StackrunResult<String> {
    let project_dir = project_dir.as_ref();
    project_dir
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| StackrunError::InvalidPath(project_dir.to_path_buf()))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
