// src/errors.rs

//! Crate-wide error types.
//!
//! - [`DagError`] is what every public entry point returns.
//! - [`ProcessError`] wraps the first fatal node failure of a run.
//! - [`IgnorableError`] marks a node failure as non-fatal.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DagError {
    #[error("nothing to do")]
    NothingToDo,

    #[error("duplicate node ID: {0}")]
    DuplicateId(String),

    #[error("node '{node}' references non-existing node '{parent}'")]
    UnresolvedDependency { node: String, parent: String },

    #[error("graph is not acyclic: cycle involves node '{0}'")]
    Cycle(String),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("run cancelled before all nodes were processed")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}


/// Fatal failure of a single node, with the context it was observed in.
#[derive(Error, Debug)]
#[error("node '{node_id}' failed on worker {worker_id} at {at}: {source:#}")]
pub struct ProcessError {
    pub node_id: String,
    pub worker_id: usize,
    pub at: DateTime<Utc>,
    #[source]
    pub source: anyhow::Error,
}

impl ProcessError {
    pub fn new(node_id: impl Into<String>, worker_id: usize, source: anyhow::Error) -> Self {
        Self {
            node_id: node_id.into(),
            worker_id,
            at: Utc::now(),
            source,
        }
    }
}

/// Marker error: a node that fails with this is logged and treated as done.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct IgnorableError(String);

impl IgnorableError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Whether `err`, or anything in its cause chain, is an [`IgnorableError`].
pub fn is_ignorable(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<IgnorableError>())
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DagError>;
