// src/config/mod.rs

//! Pipeline file loading for the `dagexec` binary.
//!
//! - [`model`] is the TOML data model.
//! - [`loader`] reads a file from disk.
//! - [`validate`] checks file-level invariants; graph-level ones are left
//!   to [`crate::dag::Graph::build`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigSection, NodeConfig, RawConfigFile};
