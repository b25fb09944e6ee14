//! Entry points for the stackrun commands.

pub mod container;
pub mod dev;
pub mod verify;
