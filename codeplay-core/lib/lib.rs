//! `codeplay` runs user-edited code snippets against a remote execution sandbox.
//!
//! # Overview
//!
//! An interactive code block on a documentation page lets a reader edit a snippet and run it.
//! This crate holds everything behind the "Run" button:
//! - Mapping a language id to the runtime expected by the remote sandbox
//! - Sending one execution request with a hard timeout
//! - Folding every failure mode into a single [`ExecutionResult`]
//! - A per-block session that serializes runs and enforces a cooldown
//! - The view model the output panel renders from
//!
//! # Modules
//!
//! - [`language`] - Supported languages and their runtime table
//! - [`payload`] - Wire payloads of the execution protocol
//! - [`client`] - The remote execution client
//! - [`session`] - The per-block execution session controller
//! - [`store`] - Local persistence of edited snippet text
//! - [`view`] - Output panel view and the interactive code block model
//! - [`config`] - Client and session configuration

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod client;
pub mod config;
pub mod language;
pub mod payload;
pub mod result;
pub mod session;
pub mod store;
pub mod view;

pub use client::*;
pub use config::*;
pub use error::*;
pub use language::*;
pub use payload::*;
pub use result::*;
pub use session::*;
pub use store::*;
pub use view::*;
