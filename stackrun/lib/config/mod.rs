//! Configuration types and helpers.

mod defaults;
mod options;
mod port_pair;
mod project;
mod stack_env;
mod volume_mount;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use defaults::*;
pub use options::*;
pub use port_pair::*;
pub use project::*;
pub use stack_env::*;
pub use volume_mount::*;
