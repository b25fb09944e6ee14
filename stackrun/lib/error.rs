use std::{
    error::Error,
    fmt::{self, Display},
    path::PathBuf,
};
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a stackrun-related operation.
pub type StackrunResult<T> = Result<T, StackrunError>;

/// An error that occurred while launching or supervising a development container.
#[derive(pretty_error_debug::Debug, Error)]
pub enum StackrunError {
    /// An I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that can represent any error.
    #[error(transparent)]
    Custom(#[from] AnyError),

    /// An error that occurred in a stackutils helper.
    #[error(transparent)]
    Utils(#[from] stackutils::StackutilsError),

    /// An error that occurred when decoding JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error that occurred when decoding YAML.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A published port mapping had no `:` separator.
    #[error("the port input: {0} is not valid as the : separator is missing")]
    MissingPortSeparator(String),

    /// A published port mapping had a component that is not a port number.
    #[error("the numeric port input: {0} is not valid")]
    InvalidPortNumber(String),

    /// A volume mount was malformed.
    #[error("invalid volume mount: {0}")]
    InvalidVolumeMount(String),

    /// The project configuration could not be found or read.
    #[error("project configuration error: {0}")]
    ProjectConfig(String),

    /// The directory of the running executable could not be determined.
    #[error("cannot retrieve the binary path: {0}")]
    ExecutableLocation(String),

    /// The controller binary could not be staged on the host.
    #[error("cannot retrieve controller: {0}")]
    ControllerCopy(#[source] stackutils::StackutilsError),

    /// The staged controller binary could not be made executable.
    #[error("cannot make the controller executable: {0}")]
    ControllerPermissions(#[source] stackutils::StackutilsError),

    /// A container runtime command failed to run or reported a failure.
    #[error("error running `{command}`: {reason}")]
    RuntimeCommand {
        /// The runtime command that failed.
        command: String,

        /// Why it failed.
        reason: String,
    },

    /// The development container exited with an unexpected status.
    #[error("error waiting in 'stackrun {mode}': {reason}")]
    DevRunFailed {
        /// The mode the container was running in.
        mode: String,

        /// The exit reason reported for the container.
        reason: String,
    },

    /// The development run ended before the container was ever observed.
    #[error("stackrun run exited before the container became healthy: {0}")]
    RunExitedEarly(String),

    /// The container never appeared in the runtime's listing.
    #[error("container listing never found the container {name} within {waited_secs}s")]
    NeverHealthy {
        /// The name that was polled for.
        name: String,

        /// How long the poller waited, in seconds.
        waited_secs: u64,
    },

    /// A path was not valid UTF-8 or had no final component.
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A join handle returned an error.
    #[error("join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

/// An error that can represent any error.
#[derive(Debug)]
pub struct AnyError {
    error: anyhow::Error,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StackrunError {
    /// Creates a new `Err` result.
    pub fn custom(error: impl Into<anyhow::Error>) -> StackrunError {
        StackrunError::Custom(AnyError {
            error: error.into(),
        })
    }

    /// Creates a [`StackrunError::RuntimeCommand`] for `command`.
    pub fn runtime_command(command: impl Into<String>, reason: impl Display) -> StackrunError {
        StackrunError::RuntimeCommand {
            command: command.into(),
            reason: reason.to_string(),
        }
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
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `StackrunResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> StackrunResult<T> {
    Result::Ok(value)
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
