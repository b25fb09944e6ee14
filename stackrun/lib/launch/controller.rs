use std::path::{Path, PathBuf};

use crate::{
    config::{DevOptions, CONTROLLER_FILENAME, DEFAULT_CONTROLLER_PATH},
    StackrunError, StackrunResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Makes sure the controller binary the container uses as its entrypoint exists on the host.
///
/// The controller ships next to the stackrun executable and is staged once into the user's
/// home directory, so the mounted path stays the same across stackrun upgrades and reinstalls.
#[derive(Debug, Clone)]
pub struct ControllerProvisioner {
    /// A controller supplied by the user, mounted as-is.
    override_path: Option<PathBuf>,

    /// Where the controller is staged.
    staged_path: PathBuf,

    /// The directory the controller is copied from. Defaults to the stackrun executable's
    /// directory.
    install_dir: Option<PathBuf>,

    /// Whether to skip staging.
    dry_run: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ControllerProvisioner {
    /// Creates a provisioner for the given options, staging into the user's home directory.
    pub fn new(options: &DevOptions) -> StackrunResult<Self> {
        let staged_path = DEFAULT_CONTROLLER_PATH.clone().ok_or_else(|| {
            StackrunError::custom(anyhow::anyhow!(
                "cannot determine the home directory to stage {}",
                CONTROLLER_FILENAME
            ))
        })?;

        Ok(Self {
            override_path: options.get_controller_override().clone(),
            staged_path,
            install_dir: None,
            dry_run: *options.get_dry_run(),
        })
    }

    /// Creates a provisioner that stages from `install_dir` into `staged_path`.
    pub fn with_paths(staged_path: impl Into<PathBuf>, install_dir: impl Into<PathBuf>) -> Self {
        Self {
            override_path: None,
            staged_path: staged_path.into(),
            install_dir: Some(install_dir.into()),
            dry_run: false,
        }
    }

    /// Mounts `path` instead of staging a controller.
    pub fn with_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    /// Skips staging, only reporting the path the controller would be mounted from.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the host path of an executable controller, staging it if it is missing.
    pub async fn provision(&self) -> StackrunResult<PathBuf> {
        if let Some(path) = &self.override_path {
            tracing::debug!("using controller override {}", path.display());
            return Ok(path.clone());
        }

        if self.dry_run {
            tracing::info!(
                "dry run, skipping controller staging to {}",
                self.staged_path.display()
            );
            return Ok(self.staged_path.clone());
        }

        if tokio::fs::try_exists(&self.staged_path).await? {
            tracing::debug!("controller already staged at {}", self.staged_path.display());
            return Ok(self.staged_path.clone());
        }

        let source = self.install_dir()?.join(CONTROLLER_FILENAME);
        tracing::info!(
            "staging controller from {} to {}",
            source.display(),
            self.staged_path.display()
        );

        stackutils::copy_file(&source, &self.staged_path)
            .await
            .map_err(StackrunError::ControllerCopy)?;
        stackutils::make_executable(&self.staged_path)
            .await
            .map_err(StackrunError::ControllerPermissions)?;

        Ok(self.staged_path.clone())
    }

    fn install_dir(&self) -> StackrunResult<PathBuf> {
        if let Some(dir) = &self.install_dir {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe()
            .map_err(|e| StackrunError::ExecutableLocation(e.to_string()))?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| StackrunError::ExecutableLocation(exe.display().to_string()))
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
