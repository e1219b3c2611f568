//! Quest tree data model.
//!
//! The tree is a strict forest rooted at exactly one generation-0 vision
//! node. Seed quests (generation 1) hang off the vision node; deeper
//! generations are produced by repeated expansion. Nodes are never deleted
//! or re-parented; the tree only grows.

mod context;

pub use context::{ancestry_chain, sibling_context};

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parser::QuestDescriptor;

/// Node identifier. Globally unique, generated at creation time.
pub type NodeId = String;

/// Execution status of a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

/// One node in the recursive quest tree.
///
/// Each node is both a whole (it carries its own inquiry loop of
/// assumptions, questions and actions) and a part (it sits under a parent
/// and beside siblings at the same generation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestTreeNode {
    pub id: NodeId,
    pub title: String,
    pub description: String,

    /// Owning node id. None only for the generation-0 vision node.
    pub parent_id: Option<NodeId>,
    /// Direct children, in creation order. Append-only.
    pub child_ids: Vec<NodeId>,

    /// Depth: 0 = vision, 1 = seed quests, N = recursive descendants.
    pub generation: u32,
    /// Position among siblings at creation time. Stable, not re-derived.
    pub generation_index: usize,

    pub status: QuestStatus,
    /// Cross-branch links, distinct from the tree edge.
    pub dependencies: Vec<NodeId>,

    /// Backcasting inquiry loop produced by the LLM.
    pub assumptions: Vec<String>,
    pub questions: Vec<String>,
    pub actions: Vec<String>,
    /// What success looks like for this quest.
    pub future_state: Option<String>,

    pub created: DateTime<Utc>,
    pub created_by: String,
    pub last_modified: DateTime<Utc>,
    pub facilitating_advisor: Option<String>,
}

/// The generation-0 content: root statement, principles and indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vision {
    pub statement: String,
    #[serde(default)]
    pub principles: Vec<String>,
    #[serde(default)]
    pub target_date: Option<String>,
    #[serde(default)]
    pub success_indicators: Vec<String>,
}

impl Vision {
    /// Create a vision from just a statement
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            principles: Vec::new(),
            target_date: None,
            success_indicators: Vec::new(),
        }
    }

    /// Set the principles
    pub fn with_principles(mut self, principles: Vec<String>) -> Self {
        self.principles = principles;
        self
    }

    /// Set the success indicators
    pub fn with_success_indicators(mut self, indicators: Vec<String>) -> Self {
        self.success_indicators = indicators;
        self
    }

    /// Set the target date
    pub fn with_target_date(mut self, date: impl Into<String>) -> Self {
        self.target_date = Some(date.into());
        self
    }
}

/// The quest tree aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestTree {
    pub id: String,
    pub vision: Vision,

    /// All nodes by id, including the synthetic vision node.
    pub nodes: HashMap<NodeId, QuestTreeNode>,
    /// Id of the generation-0 vision node.
    pub vision_node_id: NodeId,
    /// Ids of generation-1 nodes (seed quests), in creation order.
    pub root_node_ids: Vec<NodeId>,

    /// Upper bound on tree depth, configured per session (typically 3-7).
    pub max_generations: u32,
    /// Target number of children per expansion (typically 3). The LLM may
    /// return a different count, which is tolerated rather than rejected.
    pub branching_factor: usize,

    /// Advisor facilitating every prompt for this tree unless overridden.
    pub head_advisor: String,

    pub created: DateTime<Utc>,
    pub created_by: String,
    pub last_modified: DateTime<Utc>,
}

impl QuestTree {
    /// Create a new tree shell with a synthetic vision node and no quests
    pub fn new(
        vision: Vision,
        head_advisor: impl Into<String>,
        max_generations: u32,
        branching_factor: usize,
    ) -> Self {
        let now = Utc::now();
        let head_advisor = head_advisor.into();
        let vision_node_id = format!("vision-{}", Uuid::new_v4());

        let vision_node = QuestTreeNode {
            id: vision_node_id.clone(),
            title: vision.statement.clone(),
            description: String::new(),
            parent_id: None,
            child_ids: Vec::new(),
            generation: 0,
            generation_index: 0,
            status: QuestStatus::Pending,
            dependencies: Vec::new(),
            assumptions: Vec::new(),
            questions: Vec::new(),
            actions: Vec::new(),
            future_state: None,
            created: now,
            created_by: "backcasting_session".to_string(),
            last_modified: now,
            facilitating_advisor: Some(head_advisor.clone()),
        };

        let mut nodes = HashMap::new();
        nodes.insert(vision_node_id.clone(), vision_node);

        Self {
            id: format!("tree-{}", Uuid::new_v4()),
            vision,
            nodes,
            vision_node_id,
            root_node_ids: Vec::new(),
            max_generations,
            branching_factor,
            head_advisor,
            created: now,
            created_by: "backcasting_session".to_string(),
            last_modified: now,
        }
    }

    /// Look up a node by id
    pub fn node(&self, node_id: &str) -> Option<&QuestTreeNode> {
        self.nodes.get(node_id)
    }

    /// Number of nodes, excluding the synthetic vision node
    pub fn quest_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Per-generation node counts, excluding the vision node
    pub fn nodes_by_generation(&self) -> HashMap<u32, usize> {
        let mut counts = HashMap::new();
        for node in self.nodes.values() {
            if node.generation > 0 {
                *counts.entry(node.generation).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Validate structural invariants, returning every violation found.
    ///
    /// Checks: parent/child agreement, referenced ids exist, generation of
    /// each child is its parent's generation plus one, no node claimed by
    /// two parents, root ids present in the node map.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for node in self.nodes.values() {
            if let Some(parent_id) = &node.parent_id {
                match self.nodes.get(parent_id) {
                    Some(parent) => {
                        if parent.generation + 1 != node.generation {
                            errors.push(format!(
                                "Node {} generation {} inconsistent with parent generation {}",
                                node.id, node.generation, parent.generation
                            ));
                        }
                        if !parent.child_ids.contains(&node.id) {
                            errors.push(format!(
                                "Node {} not listed in child_ids of parent {}",
                                node.id, parent_id
                            ));
                        }
                    }
                    None => errors.push(format!(
                        "Node {} references non-existent parent {}",
                        node.id, parent_id
                    )),
                }
            } else if node.id != self.vision_node_id {
                errors.push(format!("Node {} has no parent but is not the vision node", node.id));
            }

            for child_id in &node.child_ids {
                match self.nodes.get(child_id) {
                    Some(child) => {
                        if child.parent_id.as_deref() != Some(node.id.as_str()) {
                            errors.push(format!(
                                "Child {} of node {} has mismatched parent_id",
                                child_id, node.id
                            ));
                        }
                    }
                    None => errors.push(format!(
                        "Node {} references non-existent child {}",
                        node.id, child_id
                    )),
                }
            }

            for dep_id in &node.dependencies {
                if !self.nodes.contains_key(dep_id) {
                    errors.push(format!(
                        "Node {} has dependency on non-existent node {}",
                        node.id, dep_id
                    ));
                }
            }
        }

        for root_id in &self.root_node_ids {
            if !self.nodes.contains_key(root_id) {
                errors.push(format!("Root node {} not found in tree nodes", root_id));
            }
        }

        errors
    }
}

impl QuestTreeNode {
    /// Build a node from a validated LLM quest descriptor.
    ///
    /// The new node starts with no children and pending status; dependency
    /// ids from the descriptor are carried over verbatim.
    pub fn from_descriptor(
        descriptor: &QuestDescriptor,
        parent_id: NodeId,
        generation: u32,
        generation_index: usize,
        facilitating_advisor: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: format!("gen{}-{}-{}", generation, generation_index, Uuid::new_v4()),
            title: descriptor.title.clone(),
            description: descriptor.description.clone(),
            parent_id: Some(parent_id),
            child_ids: Vec::new(),
            generation,
            generation_index,
            status: QuestStatus::Pending,
            dependencies: descriptor.dependencies.clone(),
            assumptions: descriptor.assumptions.clone(),
            questions: descriptor.questions.clone(),
            actions: descriptor.actions.clone(),
            future_state: descriptor.future_state.clone(),
            created: now,
            created_by: "holonic_llm".to_string(),
            last_modified: now,
            facilitating_advisor: Some(facilitating_advisor.to_string()),
        }
    }
}
