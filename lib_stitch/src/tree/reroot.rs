use log::trace;

use crate::error::{Error, Result};

use super::{Edge, NodeIndex, NodeKind, Tree, TreeBuilder};

/// One step on the way from the root to a leaf.
#[derive(Debug, Clone, Copy)]
struct PathStep {
    taken: Edge,
    other: Edge,
}

impl<Value: Clone + Default> Tree<Value> {
    /// Roots the tree on the edge leading into the given leaf.
    ///
    /// The new root splits that edge in half and has the rest of the tree as left and the leaf as right child.
    /// The old root is dissolved by merging its two edges, so the resulting tree has as many branches as before.
    /// Branches that get new children on the way are given a default value.
    pub fn reroot(&self, leaf_index: usize) -> Result<Self> {
        let steps = self.steps_to_leaf(leaf_index)?;
        let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
            return Ok(self.clone());
        };
        trace!("Rerooting at leaf {leaf_index} over {} edges", steps.len());

        let mut builder = TreeBuilder::with_leaf_capacity(self.leaf_count());
        let mut upwards = Edge::new(
            first.other.length + first.taken.length,
            self.copy_into(first.other.child, &mut builder),
        );

        for step in &steps[1..] {
            let sibling = Edge::new(
                step.other.length,
                self.copy_into(step.other.child, &mut builder),
            );
            let branch = builder.add_branch(Value::default(), upwards, sibling);
            upwards = Edge::new(step.taken.length, branch);
        }

        let half = last.taken.length / 2.0;
        let leaf = self.copy_into(last.taken.child, &mut builder);
        let root = builder.add_branch(
            Value::default(),
            Edge::new(upwards.length - half, upwards.child),
            Edge::new(half, leaf),
        );

        Ok(builder.build(root))
    }

    /// Copies the subtree at `index` into `builder` and returns its new index.
    fn copy_into(&self, index: NodeIndex, builder: &mut TreeBuilder<Value>) -> NodeIndex {
        let node = &self.nodes[index];
        match node.kind {
            NodeKind::Leaf { index } => builder.add_leaf(index, node.value.clone()),
            NodeKind::Branch { left, right } => {
                let left_child = self.copy_into(left.child, builder);
                let right_child = self.copy_into(right.child, builder);
                builder.add_branch(
                    node.value.clone(),
                    Edge::new(left.length, left_child),
                    Edge::new(right.length, right_child),
                )
            }
        }
    }
}

impl<Value> Tree<Value> {
    fn steps_to_leaf(&self, leaf_index: usize) -> Result<Vec<PathStep>> {
        let mut stack: Vec<(NodeIndex, usize, Option<PathStep>)> = vec![(self.root, 0, None)];
        let mut steps = Vec::new();

        while let Some((index, depth, step)) = stack.pop() {
            steps.truncate(depth.saturating_sub(1));
            steps.extend(step);

            match self.nodes[index].kind {
                NodeKind::Leaf { index } if index == leaf_index => return Ok(steps),
                NodeKind::Leaf { .. } => {}
                NodeKind::Branch { left, right } => {
                    stack.push((
                        right.child,
                        depth + 1,
                        Some(PathStep {
                            taken: right,
                            other: left,
                        }),
                    ));
                    stack.push((
                        left.child,
                        depth + 1,
                        Some(PathStep {
                            taken: left,
                            other: right,
                        }),
                    ));
                }
            }
        }

        Err(Error::NoSuchLeaf(leaf_index))
    }
}
