use super::node::{NodeId, NodePool};
use super::State;

/// States from the tree root to `node`, following parent links.
///
/// The walk is bounded by the number of live nodes, so a corrupted (cyclic) tree yields a
/// truncated path rather than looping forever.
pub fn extract_path(pool: &NodePool, node: NodeId) -> Vec<State> {
    let mut path = vec![pool[node].state];
    let mut current = node;
    while let Some(parent) = pool[current].parent() {
        if path.len() > pool.len() {
            break;
        }
        path.push(pool[parent].state);
        current = parent;
    }
    path.reverse();
    path
}

pub fn path_length(path: &[State]) -> f64 {
    path.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}
