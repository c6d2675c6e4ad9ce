//! `codeplay-utils` is a library containing shared constants and helpers for the codeplay project.

#![warn(missing_docs)]

pub mod defaults;
pub mod env;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use defaults::*;
pub use env::*;
