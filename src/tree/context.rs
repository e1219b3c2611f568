//! Context builder: ancestry chains and sibling context for prompting.
//!
//! Both walks are O(depth) against the node map, which is acceptable here;
//! context building never sits on a hot path.

use super::{QuestTree, QuestTreeNode};
use crate::error::{EngineError, EngineResult};

/// Ordered ancestors of a node, from its generation-1 ancestor down to its
/// immediate parent, so prompts read top-down.
///
/// Excludes the vision node and the focus node itself; empty for a
/// generation-1 focus node. Fails with [`EngineError::NodeNotFound`] when
/// the focus id is absent from the tree.
pub fn ancestry_chain<'a>(
    tree: &'a QuestTree,
    node_id: &str,
) -> EngineResult<Vec<&'a QuestTreeNode>> {
    let mut current = tree.node(node_id).ok_or_else(|| EngineError::NodeNotFound {
        node_id: node_id.to_string(),
    })?;

    let mut ancestry = Vec::new();
    while let Some(parent_id) = &current.parent_id {
        let Some(parent) = tree.node(parent_id) else {
            break;
        };
        if parent.generation == 0 {
            break;
        }
        ancestry.push(parent);
        current = parent;
    }

    ancestry.reverse();
    Ok(ancestry)
}

/// Nodes sharing the focus node's parent, excluding the focus node itself,
/// in `generation_index` order.
///
/// Fails with [`EngineError::NodeNotFound`] when the focus id is absent.
pub fn sibling_context<'a>(
    tree: &'a QuestTree,
    node_id: &str,
) -> EngineResult<Vec<&'a QuestTreeNode>> {
    let node = tree.node(node_id).ok_or_else(|| EngineError::NodeNotFound {
        node_id: node_id.to_string(),
    })?;

    let Some(parent_id) = &node.parent_id else {
        return Ok(Vec::new());
    };
    let Some(parent) = tree.node(parent_id) else {
        return Ok(Vec::new());
    };

    let mut siblings: Vec<&QuestTreeNode> = parent
        .child_ids
        .iter()
        .filter(|id| id.as_str() != node_id)
        .filter_map(|id| tree.node(id))
        .collect();
    siblings.sort_by_key(|s| s.generation_index);

    Ok(siblings)
}
