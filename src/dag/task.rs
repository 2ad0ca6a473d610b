// src/dag/task.rs

//! Runtime record for one node during a single run.

use std::fmt;
use std::sync::Arc;

use crate::dag::latch::DependencyLatch;
use crate::dag::node::Node;

/// A node plus its dependency state.
///
/// Tasks are created by [`crate::dag::Graph::build`] and live for exactly
/// one run. `children` is fixed after construction.
pub struct Task {
    node: Arc<dyn Node>,
    latch: DependencyLatch,
    children: Vec<Arc<Task>>,
}

impl Task {
    pub(crate) fn new(node: Arc<dyn Node>, children: Vec<Arc<Task>>) -> Self {
        let latch = DependencyLatch::new(node.parent_ids().len());
        Self {
            node,
            latch,
            children,
        }
    }

    pub fn id(&self) -> &str {
        self.node.id()
    }

    pub fn node(&self) -> &Arc<dyn Node> {
        &self.node
    }

    pub fn latch(&self) -> &DependencyLatch {
        &self.latch
    }

    pub fn children(&self) -> &[Arc<Task>] {
        &self.children
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<_> = self.children.iter().map(|c| c.id()).collect();
        f.debug_struct("Task")
            .field("id", &self.id())
            .field("remaining", &self.latch.remaining())
            .field("children", &children)
            .finish()
    }
}
