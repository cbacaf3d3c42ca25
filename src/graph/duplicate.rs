use super::{Graph, NodeId};
use crate::error::GraphError;
use ahash::AHashMap;
use tracing::debug;

/// Replaces `old` by `new` under `root` without mutating any existing node.
///
/// Every ancestor of `old` on a path from `root` is duplicated exactly once and
/// rewired to the copies; all other nodes keep their identity and stay shared.
/// Returns the root of the new version.
pub fn duplicate_subgraph(
    graph: &mut Graph,
    root: NodeId,
    old: NodeId,
    new: NodeId,
) -> Result<NodeId, GraphError> {
    let order = graph.topological_order(root, false);
    if !order.contains(&old) {
        return Err(GraphError::NotReachable { root, old });
    }

    let mut replaced: AHashMap<NodeId, NodeId> = AHashMap::new();
    replaced.insert(old, new);

    // Children precede parents, so each parent sees its children's final mapping.
    for id in order {
        if id == old {
            continue;
        }
        let rewired: Vec<(String, NodeId)> = graph
            .node(id)
            .inputs()
            .iter()
            .filter_map(|(slot, child)| replaced.get(child).map(|n| (slot.clone(), *n)))
            .collect();
        if rewired.is_empty() {
            continue;
        }
        let copy = graph.duplicate_node(id);
        for (slot, child) in rewired {
            graph.connect(copy, &slot, child);
        }
        replaced.insert(id, copy);
    }

    let new_root = replaced.get(&root).copied().unwrap_or(new);
    debug!(%root, %old, %new, %new_root, copies = replaced.len() - 1, "spliced subgraph");
    Ok(new_root)
}
