//! Dependency tree of a view, stored as an index arena.
//!
//! Nodes own their children through an ordered list of indices and refer to
//! their parent by index, so the parent back-reference never owns anything.
//! Child order is the order in which references appeared in the parent's
//! query text.

use crate::catalog::CatalogObject;
use crate::error::{CoreError, CoreResult};
use crate::identifier::ObjectRef;
use std::collections::VecDeque;
use std::fmt::Write;

/// Index of a node inside its [`DependencyTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One object in the tree.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    object: CatalogObject,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
}

impl DependencyNode {
    pub fn object(&self) -> &CatalogObject {
        &self.object
    }

    pub fn reference(&self) -> &ObjectRef {
        self.object.reference()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Distance from the root (the root has depth 0).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// A parent/child pair, `child` being a dependency of `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub child: NodeId,
    pub parent: NodeId,
}

/// The dependency tree rooted at an analyzed view.
#[derive(Debug, Clone)]
pub struct DependencyTree {
    nodes: Vec<DependencyNode>,
}

impl DependencyTree {
    /// Start a tree at `root`, which must be a view.
    pub fn new(root: CatalogObject) -> CoreResult<Self> {
        if !root.is_view() {
            return Err(CoreError::RootNotView {
                object: root.reference().to_string(),
            });
        }
        Ok(Self {
            nodes: vec![DependencyNode {
                object: root,
                parent: None,
                children: Vec::new(),
                depth: 0,
            }],
        })
    }

    /// Append `object` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, object: CatalogObject) -> CoreResult<NodeId> {
        let parent_node = self.get(parent)?;
        if !parent_node.object.is_view() {
            return Err(CoreError::ChildOfTable {
                parent: parent_node.reference().to_string(),
                child: object.reference().to_string(),
            });
        }
        let depth = parent_node.depth + 1;
        let id = NodeId(self.nodes.len());
        self.nodes.push(DependencyNode {
            object,
            parent: Some(parent),
            children: Vec::new(),
            depth,
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Look up a node, failing for ids from another tree.
    pub fn get(&self, id: NodeId) -> CoreResult<&DependencyNode> {
        self.nodes
            .get(id.0)
            .ok_or(CoreError::UnknownNode { index: id.0 })
    }

    /// Look up a node by an id handed out by this tree.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &DependencyNode {
        &self.nodes[id.0]
    }

    pub fn object(&self, id: NodeId) -> &CatalogObject {
        &self.node(id).object
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids breadth-first from the root, siblings in query order.
    pub fn level_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([self.root()]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.children(id).iter().copied());
        }
        order
    }

    /// Node ids in pre-order (parent before its children), as rendered.
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Every parent/child edge, children visited in level order.
    pub fn edges(&self) -> Vec<Edge> {
        self.level_order()
            .into_iter()
            .filter_map(|child| self.parent(child).map(|parent| Edge { child, parent }))
            .collect()
    }

    /// `None` for the root, otherwise whether the node shares its parent's
    /// `(project, dataset)`.
    pub fn shares_dataset_with_parent(&self, id: NodeId) -> Option<bool> {
        let parent = self.parent(id)?;
        Some(
            self.object(id)
                .reference()
                .same_dataset(self.object(parent).reference()),
        )
    }

    /// Whether `reference` is `id` itself or one of its ancestors.
    pub fn has_ancestor(&self, id: NodeId, reference: &ObjectRef) -> bool {
        self.ancestry(id).iter().any(|n| self.object(*n).reference() == reference)
    }

    /// The path from the root down to `id`, inclusive.
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Render the tree as a Graphviz digraph, edges pointing from a view to
    /// the objects it reads.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph dependencies {\n  rankdir=LR;\n  node [shape=box];\n\n");

        for (index, node) in self.nodes.iter().enumerate() {
            let style = if node.object.is_view() {
                "style=rounded"
            } else {
                "style=filled, fillcolor=lightgrey"
            };
            let _ = writeln!(
                dot,
                "  n{} [label=\"{}\", {}];",
                index,
                node.reference(),
                style
            );
        }

        dot.push('\n');

        for edge in self.edges() {
            let _ = writeln!(dot, "  n{} -> n{};", edge.parent.0, edge.child.0);
        }

        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tests;
