//! `stackrun` runs a project inside the development container of its stack.
//!
//! # Overview
//!
//! A stack is a container image that knows how to build, run, debug and test a kind of
//! project. stackrun reads the project's stack image from `.stackrun-config.yaml`, asks the
//! container runtime what the image exposes and declares, and then starts a container that:
//! - Publishes the stack's ports, merged with any `-p host:container` mappings the user gave
//! - Mounts the project, the stack's dependency cache volume and the controller binary
//! - Optionally runs as the local user so files written to the project keep their owner
//! - Uses the controller binary as its entrypoint, told which mode to run in
//!
//! While the container runs, stackrun forwards Ctrl-C by stopping the container and waits for
//! the runtime to clean up.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stackrun::{config::DevOptions, management::dev, runtime::DockerCli};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = DevOptions::builder()
//!         .project_dir("/work/my-app")
//!         .name("my-app-dev")
//!         .deps_volume("my-app-deps")
//!         .publish(vec!["3001:3000".to_string()])
//!         .build();
//!
//!     dev::run("debug", &options, Arc::new(DockerCli::new())).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Options, project configuration and the values they are built from
//! - [`launch`] - Port resolution, mount planning, controller staging and the runtime arguments
//! - [`management`] - The `run`, `verify`, `stop` and `ps` entry points
//! - [`runtime`] - The container runtime, process supervision and health polling

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod cli;
pub mod config;
pub mod launch;
pub mod management;
pub mod runtime;

pub use error::*;
