use crate::config::PortPair;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Runtime flag publishing a single port mapping.
pub const PUBLISH_FLAG: &str = "-p";

/// Runtime flag publishing every exposed port to a random host port.
pub const PUBLISH_ALL_FLAG: &str = "-P";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The final set of port publish instructions for a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortResolution {
    /// Whether the runtime publishes every exposed port itself.
    pub publish_all: bool,

    /// Explicit mappings, user overrides first.
    pub mappings: Vec<PortPair>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PortResolution {
    /// Returns the runtime arguments for this resolution.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.mappings.len() * 2 + 1);
        if self.publish_all {
            args.push(PUBLISH_ALL_FLAG.to_string());
        }

        for mapping in &self.mappings {
            args.push(PUBLISH_FLAG.to_string());
            args.push(mapping.to_string());
        }

        args
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Merges the image's exposed ports, the application port and the user's overrides.
///
/// - `app_port` joins the exposed set when the image does not already expose it.
/// - With `publish_all` the runtime publishes the exposed set itself, so only an `app_port`
///   that the image did not expose still needs an explicit mapping.
/// - Every override is kept, in order.
/// - Each remaining exposed port without an override for its container port is published on
///   the same host port.
pub fn resolve_ports(
    exposed_ports: &[String],
    app_port: Option<&str>,
    overrides: &[PortPair],
    publish_all: bool,
) -> PortResolution {
    let mut exposed = exposed_ports.to_vec();
    let app_port_is_exposed = app_port.is_some_and(|port| exposed.iter().any(|p| p == port));

    if let Some(port) = app_port {
        if !app_port_is_exposed {
            tracing::debug!("adding application port {} to the exposed ports", port);
            exposed.push(port.to_string());
        }
    }

    if publish_all {
        exposed.clear();
        if let Some(port) = app_port.filter(|_| !app_port_is_exposed) {
            exposed.push(port.to_string());
        }
    }

    let mut mappings = overrides.to_vec();
    for port in exposed {
        let overridden = overrides.iter().any(|pair| pair.container() == port);
        if !overridden {
            mappings.push(PortPair::with_same(port));
        }
    }

    tracing::debug!("resolved port mappings: {:?}", mappings);
    PortResolution {
        publish_all,
        mappings,
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
