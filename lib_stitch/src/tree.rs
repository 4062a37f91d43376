//! Binary trees with branch lengths, stored as an arena of nodes.
//!
//! Leaves carry the index of the item they were built from, for example the position of a sequence in the input of the tree builder.
//! Every node carries a value of the generic payload type, which for branches is often just a default value.
//!
//! Traversals are available on [`Subtree`], a view of a node together with everything below it.
//! The methods of the same name on [`Tree`] traverse from the root.

use std::fmt::Display;

use crate::error::{Error, Result};

mod render;
mod reroot;

/// Index of a node in the arena of a [`Tree`].
pub type NodeIndex = usize;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tree<Value> {
    root: NodeIndex,
    nodes: Vec<Node<Value>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<Value> {
    pub value: Value,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Leaf {
        /// The index of the item this leaf was created for.
        index: usize,
    },
    Branch {
        left: Edge,
        right: Edge,
    },
}

/// The connection from a branch to one of its children.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub length: f64,
    pub child: NodeIndex,
}

/// Builds a tree bottom-up: children have to be added before their parent.
#[derive(Debug, Clone)]
pub struct TreeBuilder<Value> {
    nodes: Vec<Node<Value>>,
}

/// A node of a tree together with all its descendants.
#[derive(Debug)]
pub struct Subtree<'tree, Value> {
    tree: &'tree Tree<Value>,
    index: NodeIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Edge {
    pub fn new(length: f64, child: NodeIndex) -> Self {
        Self { length, child }
    }
}

impl<Value> TreeBuilder<Value> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Reserves space for a binary tree with `leaf_count` leaves.
    pub fn with_leaf_capacity(leaf_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity((2 * leaf_count).saturating_sub(1)),
        }
    }

    pub fn add_leaf(&mut self, index: usize, value: Value) -> NodeIndex {
        self.push(Node {
            value,
            kind: NodeKind::Leaf { index },
        })
    }

    pub fn add_branch(&mut self, value: Value, left: Edge, right: Edge) -> NodeIndex {
        debug_assert!(left.child < self.nodes.len());
        debug_assert!(right.child < self.nodes.len());

        self.push(Node {
            value,
            kind: NodeKind::Branch { left, right },
        })
    }

    /// Finishes the tree with the given node as root.
    ///
    /// Nodes that are not reachable from the root stay in the arena but are never visited.
    pub fn build(self, root: NodeIndex) -> Tree<Value> {
        debug_assert!(root < self.nodes.len());

        Tree {
            nodes: self.nodes,
            root,
        }
    }

    fn push(&mut self, node: Node<Value>) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(node);
        index
    }
}

impl<Value> Default for TreeBuilder<Value> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Value> Tree<Value> {
    /// A tree consisting of a single leaf.
    pub fn leaf(index: usize, value: Value) -> Self {
        let mut builder = TreeBuilder::new();
        let root = builder.add_leaf(index, value);
        builder.build(root)
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node(&self, index: NodeIndex) -> &Node<Value> {
        &self.nodes[index]
    }

    pub fn as_subtree(&self) -> Subtree<'_, Value> {
        self.subtree(self.root)
    }

    pub fn subtree(&self, index: NodeIndex) -> Subtree<'_, Value> {
        debug_assert!(index < self.nodes.len());
        Subtree { tree: self, index }
    }

    pub fn leaf_count(&self) -> usize {
        self.as_subtree().leaf_count()
    }

    pub fn branch_count(&self) -> usize {
        self.fold(0, |count, subtree| count + usize::from(!subtree.is_leaf()))
    }

    /// Returns the node of the leaf with the given item index.
    pub fn find_leaf(&self, leaf_index: usize) -> Result<NodeIndex> {
        self.as_subtree()
            .find_leaf(leaf_index)
            .map(|subtree| subtree.index)
            .ok_or(Error::NoSuchLeaf(leaf_index))
    }

    /// Returns the value of the leaf with the given item index.
    pub fn leaf_value(&self, leaf_index: usize) -> Result<&Value> {
        Ok(&self.nodes[self.find_leaf(leaf_index)?].value)
    }

    /// The leaf indices in depth-first order, left before right.
    pub fn leaf_indices(&self) -> Vec<usize> {
        self.fold(Vec::new(), |mut indices, subtree| {
            indices.extend(subtree.leaf_index());
            indices
        })
    }

    pub fn fold<Acc>(
        &self,
        seed: Acc,
        f: impl FnMut(Acc, Subtree<'_, Value>) -> Acc,
    ) -> Acc {
        self.as_subtree().fold(seed, f)
    }

    pub fn fold_combine<Acc>(
        &self,
        branch: impl FnMut(Acc, Acc) -> Acc,
        leaf: impl FnMut(usize, &Value) -> Acc,
    ) -> Acc {
        self.as_subtree().fold_combine(branch, leaf)
    }

    pub fn fold_with_lengths<Acc>(
        &self,
        branch: impl FnMut(&Value, f64, Acc, f64, Acc) -> Acc,
        leaf: impl FnMut(usize, &Value) -> Acc,
    ) -> Acc {
        self.as_subtree().fold_with_lengths(branch, leaf)
    }

    pub fn apply(&self, f: impl FnMut(Subtree<'_, Value>)) {
        self.as_subtree().apply(f)
    }

    pub fn apply_split(
        &self,
        branch: impl FnMut(Subtree<'_, Value>),
        leaf: impl FnMut(usize, &Value),
    ) {
        self.as_subtree().apply_split(branch, leaf)
    }

    pub fn reverse_apply(
        &self,
        branch: impl FnMut(Subtree<'_, Value>),
        leaf: impl FnMut(usize, &Value),
    ) {
        self.as_subtree().reverse_apply(branch, leaf)
    }

    /// Creates a tree of the same shape and branch lengths with every value replaced by `f` applied to its node.
    ///
    /// `f` is called in pre-order, so a branch is visited before its children.
    pub fn remodel<Out>(&self, mut f: impl FnMut(Subtree<'_, Value>) -> Out) -> Tree<Out> {
        self.remodel_with_depth(|subtree, _| f(subtree))
    }

    /// Like [`Self::remodel`], but `f` also receives the depth of the node, which is zero for the root.
    pub fn remodel_with_depth<Out>(
        &self,
        mut f: impl FnMut(Subtree<'_, Value>, usize) -> Out,
    ) -> Tree<Out> {
        let mut builder = TreeBuilder::with_leaf_capacity(self.leaf_count());
        let root = self.remodel_node(self.root, 0, &mut f, &mut builder);
        builder.build(root)
    }

    fn remodel_node<Out, F: FnMut(Subtree<'_, Value>, usize) -> Out>(
        &self,
        index: NodeIndex,
        depth: usize,
        f: &mut F,
        builder: &mut TreeBuilder<Out>,
    ) -> NodeIndex {
        let value = f(self.subtree(index), depth);

        match self.nodes[index].kind {
            NodeKind::Leaf { index } => builder.add_leaf(index, value),
            NodeKind::Branch { left, right } => {
                let left_child = self.remodel_node(left.child, depth + 1, f, builder);
                let right_child = self.remodel_node(right.child, depth + 1, f, builder);
                builder.add_branch(
                    value,
                    Edge::new(left.length, left_child),
                    Edge::new(right.length, right_child),
                )
            }
        }
    }

    /// Creates a tree of the same shape and branch lengths by computing new values bottom-up.
    ///
    /// `branch` receives the old value of the branch and the lengths and new values of both children.
    pub fn reverse_remodel<Out>(
        &self,
        mut branch: impl FnMut(&Value, (f64, &Out), (f64, &Out)) -> Out,
        mut leaf: impl FnMut(usize, &Value) -> Out,
    ) -> Tree<Out> {
        let mut builder = TreeBuilder::with_leaf_capacity(self.leaf_count());
        let root = self.reverse_remodel_node(self.root, &mut branch, &mut leaf, &mut builder);
        builder.build(root)
    }

    fn reverse_remodel_node<
        Out,
        B: FnMut(&Value, (f64, &Out), (f64, &Out)) -> Out,
        L: FnMut(usize, &Value) -> Out,
    >(
        &self,
        index: NodeIndex,
        branch: &mut B,
        leaf: &mut L,
        builder: &mut TreeBuilder<Out>,
    ) -> NodeIndex {
        let node = &self.nodes[index];
        match node.kind {
            NodeKind::Leaf { index } => builder.add_leaf(index, leaf(index, &node.value)),
            NodeKind::Branch { left, right } => {
                let left_child = self.reverse_remodel_node(left.child, branch, leaf, builder);
                let right_child = self.reverse_remodel_node(right.child, branch, leaf, builder);
                let value = branch(
                    &node.value,
                    (left.length, &builder.nodes[left_child].value),
                    (right.length, &builder.nodes[right_child].value),
                );
                builder.add_branch(
                    value,
                    Edge::new(left.length, left_child),
                    Edge::new(right.length, right_child),
                )
            }
        }
    }

    /// Moves negative branch lengths out of the tree.
    ///
    /// Working from the root downwards, a negative length of a child edge is set to zero.
    /// Its absolute value is added to the sibling edge and to the edge leading into the branch, if the branch is not the root.
    /// Since lengths only ever grow afterwards, no edge stays negative.
    pub fn remove_negative_distances(&mut self) {
        let mut stack = vec![(self.root, None)];

        while let Some((index, incoming)) = stack.pop() {
            let NodeKind::Branch { left, right } = &mut self.nodes[index].kind else {
                continue;
            };

            let mut raise = 0.0;
            if left.length < 0.0 {
                raise -= left.length;
                right.length -= left.length;
                left.length = 0.0;
            }
            if right.length < 0.0 {
                raise -= right.length;
                left.length -= right.length;
                right.length = 0.0;
            }
            let (left_child, right_child) = (left.child, right.child);

            if raise > 0.0 {
                if let Some(edge) = incoming.and_then(|(parent, side)| self.edge_mut(parent, side)) {
                    edge.length += raise;
                }
            }

            stack.push((right_child, Some((index, Side::Right))));
            stack.push((left_child, Some((index, Side::Left))));
        }
    }

    fn edge_mut(&mut self, parent: NodeIndex, side: Side) -> Option<&mut Edge> {
        match (&mut self.nodes[parent].kind, side) {
            (NodeKind::Branch { left, .. }, Side::Left) => Some(left),
            (NodeKind::Branch { right, .. }, Side::Right) => Some(right),
            (NodeKind::Leaf { .. }, _) => None,
        }
    }
}

impl<Value: Display> Tree<Value> {
    /// Renders the tree with nested parentheses and the leaf values, e.g. `((A, B), C)`.
    pub fn brackets_notation(&self) -> String {
        self.as_subtree().brackets_notation()
    }
}

impl<'tree, Value> Subtree<'tree, Value> {
    pub fn tree(&self) -> &'tree Tree<Value> {
        self.tree
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn node(&self) -> &'tree Node<Value> {
        &self.tree.nodes[self.index]
    }

    pub fn value(&self) -> &'tree Value {
        &self.node().value
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node().kind, NodeKind::Leaf { .. })
    }

    /// The item index if this is a leaf.
    pub fn leaf_index(&self) -> Option<usize> {
        match self.node().kind {
            NodeKind::Leaf { index } => Some(index),
            NodeKind::Branch { .. } => None,
        }
    }

    /// The lengths and subtrees of both children if this is a branch.
    pub fn children(&self) -> Option<[(f64, Self); 2]> {
        match self.node().kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Branch { left, right } => Some([
                (left.length, self.tree.subtree(left.child)),
                (right.length, self.tree.subtree(right.child)),
            ]),
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.fold_combine(|left, right| left + right, |_, _| 1)
    }

    pub fn find_leaf(&self, leaf_index: usize) -> Option<Self> {
        let mut stack = vec![*self];
        while let Some(subtree) = stack.pop() {
            match subtree.children() {
                None if subtree.leaf_index() == Some(leaf_index) => return Some(subtree),
                None => {}
                Some([(_, left), (_, right)]) => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        None
    }

    /// Accumulates over all nodes in pre-order, i.e. a branch before its children and left before right.
    pub fn fold<Acc>(&self, seed: Acc, mut f: impl FnMut(Acc, Self) -> Acc) -> Acc {
        let mut accumulator = seed;
        let mut stack = vec![*self];

        while let Some(subtree) = stack.pop() {
            accumulator = f(accumulator, subtree);
            if let Some([(_, left), (_, right)]) = subtree.children() {
                stack.push(right);
                stack.push(left);
            }
        }

        accumulator
    }

    /// Computes a value for each leaf and combines the values of both children at each branch.
    pub fn fold_combine<Acc>(
        &self,
        mut branch: impl FnMut(Acc, Acc) -> Acc,
        mut leaf: impl FnMut(usize, &'tree Value) -> Acc,
    ) -> Acc {
        self.fold_with_lengths(
            |_, _, left, _, right| branch(left, right),
            |index, value| leaf(index, value),
        )
    }

    /// Like [`Self::fold_combine`], but `branch` also receives the branch value and the lengths of both child edges.
    pub fn fold_with_lengths<Acc>(
        &self,
        mut branch: impl FnMut(&'tree Value, f64, Acc, f64, Acc) -> Acc,
        mut leaf: impl FnMut(usize, &'tree Value) -> Acc,
    ) -> Acc {
        self.fold_with_lengths_inner(&mut branch, &mut leaf)
    }

    fn fold_with_lengths_inner<
        Acc,
        B: FnMut(&'tree Value, f64, Acc, f64, Acc) -> Acc,
        L: FnMut(usize, &'tree Value) -> Acc,
    >(
        &self,
        branch: &mut B,
        leaf: &mut L,
    ) -> Acc {
        match self.node().kind {
            NodeKind::Leaf { index } => leaf(index, self.value()),
            NodeKind::Branch { left, right } => {
                let left_result = self
                    .tree
                    .subtree(left.child)
                    .fold_with_lengths_inner(branch, leaf);
                let right_result = self
                    .tree
                    .subtree(right.child)
                    .fold_with_lengths_inner(branch, leaf);
                branch(
                    self.value(),
                    left.length,
                    left_result,
                    right.length,
                    right_result,
                )
            }
        }
    }

    /// Calls `f` on every node in pre-order.
    pub fn apply(&self, mut f: impl FnMut(Self)) {
        self.fold((), |(), subtree| f(subtree))
    }

    /// Calls `branch` on every branch and `leaf` on every leaf, in pre-order.
    pub fn apply_split(&self, mut branch: impl FnMut(Self), mut leaf: impl FnMut(usize, &'tree Value)) {
        self.apply(|subtree| match subtree.leaf_index() {
            Some(index) => leaf(index, subtree.value()),
            None => branch(subtree),
        })
    }

    /// Calls `branch` on every branch and `leaf` on every leaf, in post-order.
    pub fn reverse_apply(
        &self,
        mut branch: impl FnMut(Self),
        mut leaf: impl FnMut(usize, &'tree Value),
    ) {
        self.reverse_apply_inner(&mut branch, &mut leaf)
    }

    fn reverse_apply_inner<B: FnMut(Self), L: FnMut(usize, &'tree Value)>(
        &self,
        branch: &mut B,
        leaf: &mut L,
    ) {
        match self.node().kind {
            NodeKind::Leaf { index } => leaf(index, self.value()),
            NodeKind::Branch { left, right } => {
                self.tree.subtree(left.child).reverse_apply_inner(branch, leaf);
                self.tree.subtree(right.child).reverse_apply_inner(branch, leaf);
                branch(*self);
            }
        }
    }
}

impl<Value: Display> Subtree<'_, Value> {
    pub fn brackets_notation(&self) -> String {
        self.fold_combine(
            |left, right| format!("({left}, {right})"),
            |_, value| value.to_string(),
        )
    }
}

impl<Value> Clone for Subtree<'_, Value> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Value> Copy for Subtree<'_, Value> {}
