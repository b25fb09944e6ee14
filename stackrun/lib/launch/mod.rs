//! Composition of the container launch: ports, mounts, the controller binary and the final
//! runtime arguments.

mod controller;
mod mounts;
mod ports;
mod spec;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use controller::*;
pub use mounts::*;
pub use ports::*;
pub use spec::*;
