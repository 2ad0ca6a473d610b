// src/exec/mod.rs

//! Concrete [`crate::dag::Node`] implementations.
//!
//! - [`command`] runs a shell command with `tokio::process`.

pub mod command;

pub use command::CommandNode;
