// src/dag/graph.rs

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::dag::node::Node;
use crate::dag::task::Task;
use crate::errors::{DagError, Result};

/// Validated DAG of tasks, stored in dispatch (topological) order.
///
/// Either fully valid or never constructed: [`Graph::build`] rejects
/// duplicate IDs, unresolved parents and cycles before any task exists.
#[derive(Debug)]
pub struct Graph {
    tasks: Vec<Arc<Task>>,
}

impl Graph {
    /// Validate `nodes` and build the task set.
    ///
    /// Edge direction: parent -> child. For a node `B` with
    /// `parent_ids = ["A"]` we add edge `A -> B`, so every task in the
    /// resulting order appears after all of its ancestors.
    pub fn build(nodes: &[Arc<dyn Node>]) -> Result<Self> {
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(nodes.len());
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(nodes.len(), 0);

        for (i, node) in nodes.iter().enumerate() {
            let ix = graph.add_node(i);
            if index.insert(node.id(), ix).is_some() {
                return Err(DagError::DuplicateId(node.id().to_string()));
            }
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for (i, node) in nodes.iter().enumerate() {
            for parent in node.parent_ids() {
                let parent_ix = index.get(parent.as_str()).copied().ok_or_else(|| {
                    DagError::UnresolvedDependency {
                        node: node.id().to_string(),
                        parent: parent.clone(),
                    }
                })?;
                graph.add_edge(parent_ix, NodeIndex::new(i), ());
                children[graph[parent_ix]].push(i);
            }
            debug!(
                node = %node.id(),
                parents = node.parent_ids().len(),
                "set parent count"
            );
        }

        let order: Vec<usize> = match toposort(&graph, None) {
            Ok(order) => order.into_iter().map(|ix| graph[ix]).collect(),
            Err(cycle) => {
                let id = nodes[graph[cycle.node_id()]].id();
                return Err(DagError::Cycle(id.to_string()));
            }
        };

        // Children always sit later in the order, so building back to front
        // means every child task exists before its parents need it.
        let mut built: Vec<Option<Arc<Task>>> = vec![None; nodes.len()];
        for &i in order.iter().rev() {
            let kids = children[i]
                .iter()
                .filter_map(|&c| built[c].clone())
                .collect();
            built[i] = Some(Arc::new(Task::new(Arc::clone(&nodes[i]), kids)));
        }

        let tasks: Vec<Arc<Task>> = order.iter().filter_map(|&i| built[i].take()).collect();

        debug!(
            order = ?tasks.iter().map(|t| t.id()).collect::<Vec<_>>(),
            "computed dispatch order"
        );

        Ok(Self { tasks })
    }

    /// Node IDs in dispatch order.
    pub fn order(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.id()).collect()
    }

    /// Node IDs without parents.
    pub fn roots(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|t| t.node().parent_ids().is_empty())
            .map(|t| t.id())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    pub(crate) fn into_tasks(self) -> Vec<Arc<Task>> {
        self.tasks
    }
}
