use std::collections::VecDeque;
use std::ops::Index;

use super::State;

pub type NodeId = usize;

/// The goal always lives in slot 0. It is never inserted into the spatial index, so it stays a leaf.
pub const GOAL: NodeId = 0;
/// The start (tree root) always lives in slot 1.
pub const START: NodeId = 1;

#[derive(Clone, Debug)]
pub struct TreeNode {
    pub state: State,
    pub cost_from_start: f64,
    pub cost_from_parent: f64,
    parent: Option<NodeId>,
    // Unordered; removal swaps with the last child
    children: Vec<NodeId>,
}

impl TreeNode {
    fn empty() -> Self {
        Self {
            state: State::origin(),
            cost_from_start: f64::INFINITY,
            cost_from_parent: 0.0,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Fixed-capacity arena owning every tree node. Parent and child links are plain slot indices.
#[derive(Clone, Debug)]
pub struct NodePool {
    nodes: Vec<TreeNode>,
    valid_count: usize,
}

impl NodePool {
    /// Allocates `capacity` slots up front. Storage is reused by every [`NodePool::reset`].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            nodes: (0..capacity).map(|_| TreeNode::empty()).collect(),
            valid_count: 2,
        }
    }

    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.valid_count
    }

    pub fn is_full(&self) -> bool {
        self.valid_count == self.nodes.len()
    }

    /// Clears every live relation and re-seeds the start and goal slots.
    pub fn reset(&mut self, start: State, goal: State) {
        for node in &mut self.nodes[..self.valid_count] {
            node.parent = None;
            node.children.clear();
        }
        self.valid_count = 2;

        let start_node = &mut self.nodes[START];
        start_node.state = start;
        start_node.cost_from_start = 0.0;
        start_node.cost_from_parent = 0.0;

        let goal_node = &mut self.nodes[GOAL];
        goal_node.state = goal;
        goal_node.cost_from_start = f64::INFINITY;
        goal_node.cost_from_parent = 0.0;
    }

    // None once the pool is full
    pub fn allocate(
        &mut self,
        parent: NodeId,
        state: State,
        cost_from_start: f64,
        cost_from_parent: f64,
    ) -> Option<NodeId> {
        if self.is_full() {
            return None;
        }
        let id = self.valid_count;
        self.valid_count += 1;

        let node = &mut self.nodes[id];
        node.state = state;
        node.cost_from_start = cost_from_start;
        node.cost_from_parent = cost_from_parent;
        node.parent = Some(parent);
        node.children.clear();
        self.nodes[parent].children.push(id);
        Some(id)
    }

    /// Moves `node` under `new_parent` and refreshes `cost_from_start` across its whole subtree.
    ///
    /// The caller must guarantee that `new_parent` is not a descendant of `node`; doing otherwise
    /// would close a cycle. This is only verified in debug builds.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId, cost_from_parent: f64) {
        debug_assert!(
            !self.is_ancestor(node, new_parent),
            "node {node} is an ancestor of its new parent {new_parent}"
        );
        if let Some(old_parent) = self.nodes[node].parent {
            let siblings = &mut self.nodes[old_parent].children;
            if let Some(position) = siblings.iter().position(|&child| child == node) {
                siblings.swap_remove(position);
            }
        }

        let parent_cost = self.nodes[new_parent].cost_from_start;
        let moved = &mut self.nodes[node];
        moved.parent = Some(new_parent);
        moved.cost_from_parent = cost_from_parent;
        moved.cost_from_start = parent_cost + cost_from_parent;
        self.nodes[new_parent].children.push(node);

        let mut queue = VecDeque::from([node]);
        while let Some(current) = queue.pop_front() {
            let current_cost = self.nodes[current].cost_from_start;
            for i in 0..self.nodes[current].children.len() {
                let child = self.nodes[current].children[i];
                let child_node = &mut self.nodes[child];
                child_node.cost_from_start = current_cost + child_node.cost_from_parent;
                queue.push_back(child);
            }
        }
    }

    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        let mut steps = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if steps > self.valid_count {
                // Already cyclic; the caller's contract was broken earlier
                return false;
            }
            steps += 1;
            current = self.nodes[id].parent;
        }
        false
    }

    // Goal first
    pub fn live_ids(&self) -> std::ops::Range<NodeId> {
        0..self.valid_count
    }
}

impl Index<NodeId> for NodePool {
    type Output = TreeNode;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index]
    }
}
