//! `stackutils` is a library containing process, terminal and filesystem utilities for the
//! stackrun project.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

pub mod error;
pub mod fs;
pub mod runtime;
pub mod term;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use error::*;
pub use fs::*;
pub use runtime::*;
