use std::path::{Path, PathBuf};

use crate::{
    config::{EnvAccessor, VolumeMount, CONTROLLER_CONTAINER_PATH, STACK_DEPS_ENV, STACK_MOUNTS_ENV},
    StackrunError, StackrunResult,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Runtime flag attaching a volume mount.
pub const VOLUME_FLAG: &str = "-v";

/// Separator between entries of [`STACK_MOUNTS_ENV`].
pub const STACK_MOUNTS_SEPARATOR: char = ';';

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Plans the volume mounts of a development container.
#[derive(Debug, Clone)]
pub struct MountPlanner {
    project_dir: PathBuf,
    deps_volume: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MountPlanner {
    /// Creates a planner for the project at `project_dir`, caching dependencies in `deps_volume`.
    pub fn new(project_dir: impl Into<PathBuf>, deps_volume: impl Into<String>) -> Self {
        Self {
            project_dir: project_dir.into(),
            deps_volume: deps_volume.into(),
        }
    }

    /// Returns the mounts for a container of a stack with environment `env`.
    ///
    /// The stack's own project mounts come first, then the dependency volume if the stack
    /// declares a dependency directory. The controller binary is always mounted last.
    pub fn plan(
        &self,
        env: &impl EnvAccessor,
        controller_path: impl AsRef<Path>,
    ) -> StackrunResult<Vec<VolumeMount>> {
        let mut mounts = self.project_mounts(env)?;

        if let Some(deps_dir) = env.var(STACK_DEPS_ENV) {
            mounts.push(VolumeMount::new(self.deps_volume.as_str(), deps_dir)?);
        } else {
            tracing::debug!("{} is not set, skipping the dependency volume", STACK_DEPS_ENV);
        }

        let controller_path = controller_path.as_ref();
        let host = controller_path
            .to_str()
            .ok_or_else(|| StackrunError::InvalidPath(controller_path.to_path_buf()))?;
        mounts.push(VolumeMount::new(host, CONTROLLER_CONTAINER_PATH)?);

        Ok(mounts)
    }

    fn project_mounts(&self, env: &impl EnvAccessor) -> StackrunResult<Vec<VolumeMount>> {
        let Some(entries) = env.var(STACK_MOUNTS_ENV) else {
            return Ok(Vec::new());
        };

        entries
            .split(STACK_MOUNTS_SEPARATOR)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let mount = entry.parse::<VolumeMount>()?;
                let host = self.resolve_host(mount.host())?;
                VolumeMount::new(host, mount.container().clone())
            })
            .collect()
    }

    fn resolve_host(&self, host: &str) -> StackrunResult<String> {
        let path = Path::new(host);
        let resolved = if host == "." {
            self.project_dir.clone()
        } else if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path.strip_prefix(".").unwrap_or(path))
        };

        resolved
            .into_os_string()
            .into_string()
            .map_err(|path| StackrunError::InvalidPath(path.into()))
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the runtime arguments for `mounts`, in order.
pub fn mount_args(mounts: &[VolumeMount]) -> Vec<String> {
    mounts
        .iter()
        .flat_map(|mount| [VOLUME_FLAG.to_string(), mount.to_string()])
        .collect()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
