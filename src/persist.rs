//! Outbound persistence seam.
//!
//! The surrounding application owns durable storage; the engine only
//! promises that every node it hands over has a globally unique id and
//! internally consistent parent/child links. [`MemoryQuestSink`] is the
//! in-crate implementation used by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::EngineResult;
use crate::tree::QuestTreeNode;

/// Collaborator that receives freshly attached quest nodes.
#[async_trait]
pub trait QuestSink: Send + Sync {
    /// Persist a batch of nodes that were just attached to `tree_id`.
    async fn persist_nodes(&self, tree_id: &str, nodes: &[QuestTreeNode]) -> EngineResult<()>;
}

/// In-memory sink collecting nodes per tree
#[derive(Default)]
pub struct MemoryQuestSink {
    trees: Mutex<HashMap<String, Vec<QuestTreeNode>>>,
}

impl MemoryQuestSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All nodes persisted so far for a tree, in arrival order
    pub async fn persisted(&self, tree_id: &str) -> Vec<QuestTreeNode> {
        self.trees
            .lock()
            .await
            .get(tree_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuestSink for MemoryQuestSink {
    async fn persist_nodes(&self, tree_id: &str, nodes: &[QuestTreeNode]) -> EngineResult<()> {
        self.trees
            .lock()
            .await
            .entry(tree_id.to_string())
            .or_default()
            .extend_from_slice(nodes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::QuestDescriptor;

    #[tokio::test]
    async fn test_memory_sink_accumulates_batches() {
        let sink = MemoryQuestSink::new();
        let node = QuestTreeNode::from_descriptor(
            &QuestDescriptor {
                title: "A".to_string(),
                ..Default::default()
            },
            "parent".to_string(),
            1,
            0,
            "Advisor",
        );

        sink.persist_nodes("tree-1", &[node.clone()]).await.unwrap();
        sink.persist_nodes("tree-1", &[node.clone()]).await.unwrap();
        sink.persist_nodes("tree-2", &[node]).await.unwrap();

        assert_eq!(sink.persisted("tree-1").await.len(), 2);
        assert_eq!(sink.persisted("tree-2").await.len(), 1);
        assert!(sink.persisted("tree-3").await.is_empty());
    }
}
