use std::{fmt, str::FromStr};

use typed_path::Utf8UnixPathBuf;

use crate::StackrunError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A volume mount from the host into a container, following Docker's `-v` convention.
///
/// ## Format
/// The mount is written as `host:container`. The host side is either a host path or the name of
/// a runtime-managed volume. The container side must be an absolute path.
///
/// ## Examples
///
/// ```
/// use stackrun::config::VolumeMount;
///
/// let mount = "my-app-deps:/project/deps".parse::<VolumeMount>().unwrap();
/// assert_eq!(mount.host(), "my-app-deps");
/// assert_eq!(mount.container().as_str(), "/project/deps");
///
/// assert!("/data".parse::<VolumeMount>().is_err());
/// assert!("/data:relative".parse::<VolumeMount>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    /// The host path or volume name.
    host: String,

    /// The path inside the container.
    container: Utf8UnixPathBuf,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl VolumeMount {
    /// Creates a new mount, checking that the container side is absolute.
    pub fn new(
        host: impl Into<String>,
        container: impl Into<Utf8UnixPathBuf>,
    ) -> Result<Self, StackrunError> {
        let host = host.into();
        let container = container.into();
        if host.is_empty() || !container.is_absolute() {
            return Err(StackrunError::InvalidVolumeMount(format!(
                "{}:{}",
                host, container
            )));
        }

        Ok(Self { host, container })
    }

    /// Returns the host path or volume name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the path inside the container.
    pub fn container(&self) -> &Utf8UnixPathBuf {
        &self.container
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for VolumeMount {
    type Err = StackrunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, container) = s
            .split_once(':')
            .ok_or_else(|| StackrunError::InvalidVolumeMount(s.to_string()))?;

        Self::new(host, container).map_err(|_| StackrunError::InvalidVolumeMount(s.to_string()))
    }
}

impl fmt::Display for VolumeMount {
    /// Formats the mount following the format "host:container".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.container)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_mount_from_str() {
        let mount = "/home/me/app:/project/user-app".parse::<VolumeMount>().unwrap();
        assert_eq!(mount.host(), "/home/me/app");
        assert_eq!(mount.container().as_str(), "/project/user-app");
        assert_eq!(mount.to_string(), "/home/me/app:/project/user-app");

        assert!("".parse::<VolumeMount>().is_err());
        assert!(":".parse::<VolumeMount>().is_err());
        assert!(":/data".parse::<VolumeMount>().is_err());
        assert!("/data:".parse::<VolumeMount>().is_err());
        assert!("/data:data".parse::<VolumeMount>().is_err());
    }

    #[test]
    fn test_volume_mount_new() {
        let mount = VolumeMount::new("app-deps", "/root/.m2").unwrap();
        assert_eq!(mount.to_string(), "app-deps:/root/.m2");

        assert!(matches!(
            VolumeMount::new("", "/root/.m2"),
            Err(StackrunError::InvalidVolumeMount(_))
        ));
    }
}
