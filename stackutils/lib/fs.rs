//! `stackutils::fs` is a module containing filesystem helpers for the stackrun project.

use std::{os::unix::fs::PermissionsExt, path::Path};

use tokio::fs;

use crate::{StackutilsError, StackutilsResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Permission bits for a file executable by owner, group and others (rwxr-xr-x).
pub const EXECUTABLE_MODE: u32 = 0o755;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Copies `from` to `to`, creating the parent directories of `to` when they are missing.
///
/// An existing file at `to` is overwritten.
pub async fn copy_file(from: impl AsRef<Path>, to: impl AsRef<Path>) -> StackutilsResult<()> {
    let from = from.as_ref();
    let to = to.as_ref();

    let copy_failed = |source| StackutilsError::CopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).await.map_err(copy_failed)?;
    }

    let bytes = fs::copy(from, to).await.map_err(copy_failed)?;
    tracing::debug!(
        "copied {} bytes from {} to {}",
        bytes,
        from.display(),
        to.display()
    );

    Ok(())
}

/// Sets the permission bits of `path` to `mode`.
pub async fn set_mode(path: impl AsRef<Path>, mode: u32) -> StackutilsResult<()> {
    let path = path.as_ref();
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(|source| StackutilsError::PermissionsFailed {
            path: path.to_path_buf(),
            mode,
            source,
        })
}

/// Marks `path` as executable by owner, group and others.
pub async fn make_executable(path: impl AsRef<Path>) -> StackutilsResult<()> {
    set_mode(path, EXECUTABLE_MODE).await
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
