// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Pipeline file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// workers = 4
///
/// [node.fetch]
/// cmd = "sleep 1"
///
/// [node.build]
/// cmd = "make"
/// after = ["fetch"]
/// ignore_failure = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// Keys are the node IDs.
    #[serde(default)]
    pub node: BTreeMap<String, NodeConfig>,
}

/// Validated pipeline file. Only constructed through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub node: BTreeMap<String, NodeConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, node: BTreeMap<String, NodeConfig>) -> Self {
        Self { config, node }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Size of the worker pool. Values below 1 are treated as 1.
    #[serde(default = "default_workers")]
    pub workers: i64,
}

fn default_workers() -> i64 {
    1
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

/// `[node.<id>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Shell command to run.
    pub cmd: String,

    /// IDs of nodes that must finish first.
    #[serde(default)]
    pub after: Vec<String>,

    /// Treat a non-zero exit as an ignorable failure: it is logged and
    /// dependents still run.
    #[serde(default)]
    pub ignore_failure: bool,
}
