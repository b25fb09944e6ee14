//! Container runtime access, process supervision and health polling.

mod container;
mod docker;
mod exit;
mod health;
mod supervisor;

#[cfg(test)]
pub(crate) mod testing;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use container::*;
pub use docker::*;
pub use exit::*;
pub use health::*;
pub use supervisor::*;
