//! `stackutils::error` is a module containing error utilities for the stackrun project.

use std::{
    error::Error,
    fmt::{self, Display},
    path::PathBuf,
};

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a stackutils-related operation.
pub type StackutilsResult<T> = Result<T, StackutilsError>;

/// An error that occurred while running a stackutils helper.
#[derive(pretty_error_debug::Debug, Error)]
pub enum StackutilsError {
    /// An error that occurred when copying a file
    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    CopyFailed {
        /// The file being copied.
        from: PathBuf,

        /// The destination of the copy.
        to: PathBuf,

        /// The underlying io error.
        source: std::io::Error,
    },

    /// An error that occurred when changing the permissions of a file
    #[error("failed to set permissions {mode:o} on {}: {source}", .path.display())]
    PermissionsFailed {
        /// The file whose permissions were being changed.
        path: PathBuf,

        /// The requested mode.
        mode: u32,

        /// The underlying io error.
        source: std::io::Error,
    },

    /// An error that occurred when installing a signal handler
    #[error("failed to install signal handler: {0}")]
    SignalHandler(std::io::Error),

    /// An error that occurred when performing an IO operation
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// Custom error.
    #[error("Custom error: {0}")]
    Custom(#[from] AnyError),
}

/// An error that can represent any error.
#[derive(Debug)]
pub struct AnyError {
    error: anyhow::Error,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StackutilsError {
    /// Creates a new `Err` result.
    pub fn custom(error: impl Into<anyhow::Error>) -> StackutilsError {
        StackutilsError::Custom(AnyError {
            error: error.into(),
        })
    }
}

impl AnyError {
    /// Downcasts the error to a `T`.
    pub fn downcast<T>(&self) -> Option<&T>
    where
        T: Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref::<T>()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for AnyError {
    fn eq(&self, other: &Self) -> bool {
        self.error.to_string() == other.error.to_string()
    }
}

impl Display for AnyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Error for AnyError {}
