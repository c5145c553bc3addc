//! The power-graph data structure and its mutation operations.

use std::collections::{BTreeMap, HashMap, VecDeque};

use pf_components::{Component, ComponentKind, Limits, Source};
use pf_core::{NodeId, Real};

use crate::error::{GraphError, GraphResult};
use crate::topology::Topology;

/// A node in the power tree: a component and its parent link.
///
/// Children are derived by scanning, keeping mutation simple; the solver
/// works from a [`Topology`] snapshot instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub component: Component,
    pub parent: Option<NodeId>,
}

/// One row of the parameter report.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRow {
    pub component: String,
    pub kind: ComponentKind,
    pub params: Vec<(&'static str, Real)>,
    pub limits: Option<Limits>,
}

/// A named forest of source-rooted power trees.
///
/// Deleted slots leave holes so node ids stay stable; names are globally
/// unique and the sole handle the mutation API accepts. Invariants upheld
/// by every mutation:
///
/// - sources only at roots, loads only at leaves (via the kind rule table);
/// - every non-root has exactly one parent;
/// - at least one source present at all times.
///
/// Failed mutations leave the graph untouched.
#[derive(Debug, Clone)]
pub struct PowerGraph {
    pub name: String,
    slots: Vec<Option<Node>>,
    index: HashMap<String, NodeId>,
    phases: BTreeMap<String, Real>,
}

impl PowerGraph {
    /// Create a graph with a single root source.
    pub fn new(name: impl Into<String>, root: Source) -> Self {
        let mut graph = Self {
            name: name.into(),
            slots: Vec::new(),
            index: HashMap::new(),
            phases: BTreeMap::new(),
        };
        graph.insert(Node {
            component: root.into(),
            parent: None,
        });
        graph
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.slots.len() as u32);
        self.index.insert(node.component.name().to_string(), id);
        self.slots.push(Some(node));
        id
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get a node by id (None for holes and out-of-range ids).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index() as usize)?.as_ref()
    }

    /// Look up a node id by component name.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Live node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| NodeId::from_index(i as u32))
    }

    /// Root node ids in insertion order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&id| self.node(id).is_some_and(|n| n.parent.is_none()))
            .collect()
    }

    /// Children of a node, in insertion order.
    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&c| self.node(c).is_some_and(|n| n.parent == Some(id)))
            .collect()
    }

    fn source_count(&self) -> usize {
        self.node_ids()
            .filter(|&id| {
                self.node(id)
                    .is_some_and(|n| n.component.kind() == ComponentKind::Source)
            })
            .count()
    }

    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(n) = queue.pop_front() {
            out.push(n);
            queue.extend(self.children_of(n));
        }
        out
    }

    /// Add another root source.
    pub fn add_source(&mut self, comp: impl Into<Component>) -> GraphResult<NodeId> {
        let comp = comp.into();
        if comp.kind() != ComponentKind::Source {
            return Err(GraphError::NotASource(comp.name().to_string()));
        }
        if self.index.contains_key(comp.name()) {
            return Err(GraphError::DuplicateName(comp.name().to_string()));
        }
        Ok(self.insert(Node {
            component: comp,
            parent: None,
        }))
    }

    /// Add a component under the named parent.
    pub fn add_comp(&mut self, parent: &str, comp: impl Into<Component>) -> GraphResult<NodeId> {
        let comp = comp.into();
        let parent_id = self
            .lookup(parent)
            .ok_or_else(|| GraphError::UnknownParent(parent.to_string()))?;
        if self.index.contains_key(comp.name()) {
            return Err(GraphError::DuplicateName(comp.name().to_string()));
        }
        let parent_kind = self.node(parent_id).map(|n| n.component.kind());
        match parent_kind {
            Some(pk) if pk.allows_child(comp.kind()) => {}
            Some(pk) => {
                return Err(GraphError::ChildNotAllowed {
                    parent: parent.to_string(),
                    parent_kind: pk.tag(),
                    child_kind: comp.kind().tag(),
                });
            }
            None => return Err(GraphError::UnknownParent(parent.to_string())),
        }
        Ok(self.insert(Node {
            component: comp,
            parent: Some(parent_id),
        }))
    }

    /// Replace the named component in place, keeping its position in the
    /// tree. The replacement may carry a new name as long as it is fresh.
    pub fn replace_comp(&mut self, name: &str, comp: impl Into<Component>) -> GraphResult<()> {
        let comp = comp.into();
        let id = self
            .lookup(name)
            .ok_or_else(|| GraphError::UnknownComponent(name.to_string()))?;
        let new_name = comp.name().to_string();
        if new_name != name && self.index.contains_key(&new_name) {
            return Err(GraphError::DuplicateName(new_name));
        }

        let parent = self.node(id).and_then(|n| n.parent);
        match parent {
            None => {
                if comp.kind() != ComponentKind::Source {
                    return Err(GraphError::RootMustBeSource(name.to_string()));
                }
            }
            Some(pid) => {
                let (pname, pkind) = self
                    .node(pid)
                    .map(|n| (n.component.name().to_string(), n.component.kind()))
                    .ok_or_else(|| GraphError::UnknownComponent(name.to_string()))?;
                if !pkind.allows_child(comp.kind()) {
                    return Err(GraphError::ChildNotAllowed {
                        parent: pname,
                        parent_kind: pkind.tag(),
                        child_kind: comp.kind().tag(),
                    });
                }
            }
        }
        for child in self.children_of(id) {
            if let Some(ck) = self.node(child).map(|n| n.component.kind()) {
                if !comp.kind().allows_child(ck) {
                    return Err(GraphError::ChildNotAllowed {
                        parent: new_name,
                        parent_kind: comp.kind().tag(),
                        child_kind: ck.tag(),
                    });
                }
            }
        }

        self.index.remove(name);
        self.index.insert(new_name, id);
        if let Some(slot) = self.slots.get_mut(id.index() as usize) {
            if let Some(node) = slot.as_mut() {
                node.component = comp;
            }
        }
        Ok(())
    }

    /// Delete the named component.
    ///
    /// With `reattach_children` the node's children move up to its parent;
    /// without it the whole subtree goes. Roots cannot reattach, and the
    /// last remaining source cannot be deleted.
    pub fn del_comp(&mut self, name: &str, reattach_children: bool) -> GraphResult<()> {
        let id = self
            .lookup(name)
            .ok_or_else(|| GraphError::UnknownComponent(name.to_string()))?;
        let parent = self.node(id).and_then(|n| n.parent);

        if parent.is_none() {
            if reattach_children {
                return Err(GraphError::RootReattach(name.to_string()));
            }
            if self.source_count() == 1 {
                return Err(GraphError::LastSource(name.to_string()));
            }
        }

        if reattach_children {
            for child in self.children_of(id) {
                if let Some(slot) = self.slots.get_mut(child.index() as usize) {
                    if let Some(node) = slot.as_mut() {
                        node.parent = parent;
                    }
                }
            }
            self.remove_slot(id);
        } else {
            for n in self.subtree(id) {
                self.remove_slot(n);
            }
        }
        Ok(())
    }

    fn remove_slot(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.get_mut(id.index() as usize) {
            if let Some(node) = slot.take() {
                self.index.remove(node.component.name());
            }
        }
    }

    /// Declare the operating phases and their durations.
    ///
    /// `"All"` is reserved for the averaged result row, and every phase
    /// name referenced by a component must be declared.
    pub fn set_phases(&mut self, phases: BTreeMap<String, Real>) -> GraphResult<()> {
        if phases.contains_key("All") {
            return Err(GraphError::ReservedPhase);
        }
        for id in self.node_ids() {
            if let Some(node) = self.node(id) {
                for phase in node.component.referenced_phases() {
                    if !phases.contains_key(phase) {
                        return Err(GraphError::UnknownPhase {
                            phase: phase.to_string(),
                            component: node.component.name().to_string(),
                        });
                    }
                }
            }
        }
        self.phases = phases;
        Ok(())
    }

    /// Declared phase durations (empty when phases are unused).
    pub fn phases(&self) -> &BTreeMap<String, Real> {
        &self.phases
    }

    /// Snapshot the structure for the solver.
    pub fn topology(&self) -> Topology {
        Topology::from_graph(self)
    }

    /// Parameter report, one row per node in topological order.
    pub fn params(&self, include_limits: bool) -> Vec<ParamRow> {
        self.topology()
            .node_ids()
            .iter()
            .filter_map(|&id| self.node(id))
            .map(|n| ParamRow {
                component: n.component.name().to_string(),
                kind: n.component.kind(),
                params: n.component.params(),
                limits: include_limits.then(|| n.component.limits().clone()),
            })
            .collect()
    }
}
