use std::sync::Arc;

use dagexec::dag::Node;

use crate::fake_node::{ExecutionLog, FakeNode};

/// Builder for a batch of [`FakeNode`]s sharing one [`ExecutionLog`].
pub struct NodeSetBuilder {
    log: ExecutionLog,
    nodes: Vec<Arc<dyn Node>>,
}

impl NodeSetBuilder {
    pub fn new(log: &ExecutionLog) -> Self {
        Self {
            log: log.clone(),
            nodes: Vec::new(),
        }
    }

    /// Add a node that succeeds immediately.
    pub fn node(self, id: &str, parents: &[&str]) -> Self {
        self.node_with(id, parents, |n| n)
    }

    /// Add a node, letting `configure` adjust its outcome or delay.
    pub fn node_with(
        mut self,
        id: &str,
        parents: &[&str],
        configure: impl FnOnce(FakeNode) -> FakeNode,
    ) -> Self {
        let node = configure(FakeNode::new(id, parents, &self.log));
        self.nodes.push(Arc::new(node));
        self
    }

    pub fn build(self) -> Vec<Arc<dyn Node>> {
        self.nodes
    }
}
