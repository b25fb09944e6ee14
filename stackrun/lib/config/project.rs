use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{config::PROJECT_CONFIG_FILENAME, StackrunError, StackrunResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The per-project configuration stored in [`PROJECT_CONFIG_FILENAME`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// The stack image the project develops against.
    pub stack: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ProjectConfig {
    /// Returns the path of the configuration file inside `project_dir`.
    pub fn path(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join(PROJECT_CONFIG_FILENAME)
    }

    /// Loads the configuration of the project in `project_dir`.
    pub async fn load(project_dir: impl AsRef<Path>) -> StackrunResult<Self> {
        let path = Self::path(&project_dir);
        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            StackrunError::ProjectConfig(format!(
                "cannot read {}: {}. run this command from a stackrun project directory",
                path.display(),
                e
            ))
        })?;

        let config: ProjectConfig = serde_yaml::from_str(&contents)?;
        if config.stack.trim().is_empty() {
            return Err(StackrunError::ProjectConfig(format!(
                "{} does not name a stack image",
                path.display()
            )));
        }

        tracing::debug!("project config loaded from {}", path.display());
        Ok(config)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
