//! Structure snapshot for solver integration.
//!
//! Maps graph nodes to contiguous solver positions `0..N` in topological
//! order (parents before children), with parent/children lookups and the
//! source domain of every node.

use std::collections::VecDeque;

use pf_core::NodeId;

use crate::graph::PowerGraph;

/// Frozen topological view of a [`PowerGraph`].
///
/// Positions are breadth-first from each root, roots in insertion order,
/// so a forward sweep over `0..len()` always sees a node's parent first
/// and a reverse sweep always sees its children first.
#[derive(Debug, Clone)]
pub struct Topology {
    order: Vec<NodeId>,
    roots: Vec<usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    domains: Vec<String>,
}

impl Topology {
    pub fn from_graph(graph: &PowerGraph) -> Self {
        let mut order = Vec::with_capacity(graph.len());
        let mut roots = Vec::new();
        let mut parents = Vec::with_capacity(graph.len());
        let mut domains = Vec::with_capacity(graph.len());

        for root in graph.roots() {
            roots.push(order.len());
            let domain = graph
                .node(root)
                .map(|n| n.component.name().to_string())
                .unwrap_or_default();

            let mut queue = VecDeque::from([(root, None)]);
            while let Some((id, parent_pos)) = queue.pop_front() {
                let pos = order.len();
                order.push(id);
                parents.push(parent_pos);
                domains.push(domain.clone());
                for child in graph.children_of(id) {
                    queue.push_back((child, Some(pos)));
                }
            }
        }

        let mut children = vec![Vec::new(); order.len()];
        for (pos, parent) in parents.iter().enumerate() {
            if let Some(p) = *parent {
                children[p].push(pos);
            }
        }

        Self {
            order,
            roots,
            parents,
            children,
            domains,
        }
    }

    /// Number of nodes in the snapshot.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node ids in topological order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Node id at a solver position.
    pub fn node_id(&self, pos: usize) -> NodeId {
        self.order[pos]
    }

    /// Positions of the roots, in insertion order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Parent position of a node (None for roots).
    pub fn parent(&self, pos: usize) -> Option<usize> {
        self.parents[pos]
    }

    /// Child positions of a node, in insertion order.
    pub fn children(&self, pos: usize) -> &[usize] {
        &self.children[pos]
    }

    pub fn is_leaf(&self, pos: usize) -> bool {
        self.children[pos].is_empty()
    }

    /// Name of the source feeding this node.
    pub fn domain(&self, pos: usize) -> &str {
        &self.domains[pos]
    }
}
