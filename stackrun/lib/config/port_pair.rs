use std::{fmt, str::FromStr};

use crate::StackrunError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A port publish mapping between the host and a container, following Docker's `-p` convention.
///
/// ## Format
/// The mapping is always written as `host:container` (e.g., "9000:8080"). Both components must
/// be port numbers in `0..=65535`. The components are kept exactly as written so that a mapping
/// supplied by the user is passed to the runtime verbatim.
///
/// ## Examples
///
/// ```
/// use stackrun::config::PortPair;
///
/// let pair = "9000:8080".parse::<PortPair>().unwrap();
/// assert_eq!(pair.host(), "9000");
/// assert_eq!(pair.container(), "8080");
/// assert_eq!(pair.to_string(), "9000:8080");
///
/// // Same port on host and container
/// assert_eq!(PortPair::with_same("8080").to_string(), "8080:8080");
///
/// assert!("8080".parse::<PortPair>().is_err());
/// assert!("70000:8080".parse::<PortPair>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortPair {
    /// The host port.
    host: String,

    /// The container port.
    container: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PortPair {
    /// Creates a mapping that publishes `port` on the same host port.
    pub fn with_same(port: impl Into<String>) -> Self {
        let port = port.into();
        Self {
            host: port.clone(),
            container: port,
        }
    }

    /// Returns the host port.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the container port.
    pub fn container(&self) -> &str {
        &self.container
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns true if `s` is a port number in `0..=65535`.
///
/// Up to four digits are accepted with leading zeros; five-digit ports may not start with `0`.
pub fn is_valid_port(s: &str) -> bool {
    if s.is_empty() || s.len() > 5 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    if s.len() == 5 && s.starts_with('0') {
        return false;
    }

    s.parse::<u16>().is_ok()
}

/// Validates every raw `host:container` string, stopping at the first invalid one.
pub fn parse_port_pairs<S: AsRef<str>>(raw: &[S]) -> Result<Vec<PortPair>, StackrunError> {
    raw.iter().map(|s| s.as_ref().parse()).collect()
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for PortPair {
    type Err = StackrunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((host, container)) = s.split_once(':') else {
            return Err(StackrunError::MissingPortSeparator(s.to_string()));
        };

        if !is_valid_port(host) || !is_valid_port(container) {
            return Err(StackrunError::InvalidPortNumber(s.to_string()));
        }

        Ok(Self {
            host: host.to_string(),
            container: container.to_string(),
        })
    }
}

impl fmt::Display for PortPair {
    /// Formats the port pair following the format "host:container".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.container)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
