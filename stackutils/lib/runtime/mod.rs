//! `stackutils::runtime` is a module containing process supervision utilities for the stackrun
//! project.

mod interrupt;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use interrupt::*;
