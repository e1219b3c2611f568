//! Tree mutator and orchestrator.
//!
//! Drives the two symmetric generation operations: seeding (generation
//! 0 to 1) and expansion (generation N to N+1). The tree is mutated only
//! after the full parsed batch validates, so a failed step leaves the
//! tree exactly as it was. The `&mut QuestTree` receivers give each
//! in-flight operation exclusive access; callers sharing a tree across
//! tasks serialize through a mutex of their own.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::advisor::{resolve_facilitator, Advisor};
use crate::error::{EngineError, EngineResult};
use crate::llm::{ChatMessage, LlmChat};
use crate::parser::parse_quest_response;
use crate::persist::QuestSink;
use crate::prompts::{
    render_holonic_prompt, HolonicPromptInput, RequestType, BACKCASTING_SYSTEM_PROMPT,
};
use crate::tree::{ancestry_chain, sibling_context, NodeId, QuestTree, QuestTreeNode};

/// Orchestrates LLM-driven quest tree growth.
pub struct BackcastingEngine {
    llm: Arc<dyn LlmChat>,
    sink: Option<Arc<dyn QuestSink>>,
}

impl BackcastingEngine {
    /// Create an engine over an LLM chat collaborator
    pub fn new(llm: Arc<dyn LlmChat>) -> Self {
        Self { llm, sink: None }
    }

    /// Attach a persistence collaborator, invoked after each successful
    /// generation step with the freshly attached nodes.
    pub fn with_sink(mut self, sink: Arc<dyn QuestSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Generate the seed quests (generation 1) for a tree.
    ///
    /// Repeated calls append additional seeds rather than replacing them;
    /// callers that do not want re-generation must guard against it.
    pub async fn generate_seed_quests(
        &self,
        tree: &mut QuestTree,
        advisors: &[Advisor],
    ) -> EngineResult<Vec<NodeId>> {
        let start = Instant::now();
        let facilitator = resolve_facilitator(advisors, &tree.head_advisor)?;

        let prompt = render_holonic_prompt(&HolonicPromptInput {
            vision: &tree.vision,
            advisor: facilitator,
            focus: None,
            ancestry: Vec::new(),
            siblings: Vec::new(),
            target_generation: 1,
            branching_factor: tree.branching_factor,
            request_type: RequestType::SeedGeneration,
        });

        debug!(tree_id = %tree.id, "Requesting seed quests");
        let descriptors = self.request_and_parse(&prompt).await?;

        if descriptors.len() != tree.branching_factor {
            warn!(
                tree_id = %tree.id,
                expected = tree.branching_factor,
                got = descriptors.len(),
                "LLM returned a different seed count than requested"
            );
        }

        let vision_node_id = tree.vision_node_id.clone();
        let existing = tree.root_node_ids.len();
        let nodes: Vec<QuestTreeNode> = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| {
                QuestTreeNode::from_descriptor(
                    d,
                    vision_node_id.clone(),
                    1,
                    existing + i,
                    &facilitator.name,
                )
            })
            .collect();

        let ids = self.attach(tree, &vision_node_id, nodes, true).await?;

        info!(
            tree_id = %tree.id,
            seeds = ids.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Seed generation completed"
        );
        Ok(ids)
    }

    /// Expand an existing node with a new generation of child quests.
    ///
    /// Fails with [`EngineError::NodeNotFound`] for an unknown node and
    /// [`EngineError::DepthExceeded`] when the children would pass the
    /// tree's generation limit. Repeated calls append further children.
    pub async fn expand_quest_node(
        &self,
        tree: &mut QuestTree,
        node_id: &str,
        advisors: &[Advisor],
    ) -> EngineResult<Vec<NodeId>> {
        let start = Instant::now();
        let facilitator = resolve_facilitator(advisors, &tree.head_advisor)?;

        let focus = tree.node(node_id).ok_or_else(|| EngineError::NodeNotFound {
            node_id: node_id.to_string(),
        })?;

        let target_generation = focus.generation + 1;
        if target_generation > tree.max_generations {
            return Err(EngineError::DepthExceeded {
                requested: target_generation,
                max_generations: tree.max_generations,
            });
        }

        let ancestry = ancestry_chain(tree, node_id)?;
        let siblings = sibling_context(tree, node_id)?;

        let prompt = render_holonic_prompt(&HolonicPromptInput {
            vision: &tree.vision,
            advisor: facilitator,
            focus: Some(focus),
            ancestry,
            siblings,
            target_generation,
            branching_factor: tree.branching_factor,
            request_type: RequestType::ChildExpansion,
        });

        debug!(
            tree_id = %tree.id,
            node_id = %node_id,
            target_generation,
            "Requesting child quests"
        );
        let existing = focus.child_ids.len();
        let descriptors = self.request_and_parse(&prompt).await?;

        if descriptors.len() != tree.branching_factor {
            warn!(
                tree_id = %tree.id,
                node_id = %node_id,
                expected = tree.branching_factor,
                got = descriptors.len(),
                "LLM returned a different child count than requested"
            );
        }

        let nodes: Vec<QuestTreeNode> = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| {
                QuestTreeNode::from_descriptor(
                    d,
                    node_id.to_string(),
                    target_generation,
                    existing + i,
                    &facilitator.name,
                )
            })
            .collect();

        let ids = self.attach(tree, node_id, nodes, false).await?;

        info!(
            tree_id = %tree.id,
            node_id = %node_id,
            children = ids.len(),
            target_generation,
            latency_ms = start.elapsed().as_millis() as u64,
            "Node expansion completed"
        );
        Ok(ids)
    }

    /// Send one system + user exchange and parse the reply.
    ///
    /// Transport and parse failures propagate before any tree mutation.
    async fn request_and_parse(
        &self,
        prompt: &str,
    ) -> EngineResult<Vec<crate::parser::QuestDescriptor>> {
        let messages = [
            ChatMessage::system(BACKCASTING_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ];
        let reply = self.llm.send_message(&messages).await?;
        let parsed = parse_quest_response(&reply.content)?;
        if parsed.metadata.skipped > 0 {
            warn!(
                skipped = parsed.metadata.skipped,
                kept = parsed.descriptors.len(),
                "Dropped malformed quest descriptors from response"
            );
        }
        Ok(parsed.descriptors)
    }

    /// Insert a validated batch under its parent and hand it to the sink.
    async fn attach(
        &self,
        tree: &mut QuestTree,
        parent_id: &str,
        nodes: Vec<QuestTreeNode>,
        as_roots: bool,
    ) -> EngineResult<Vec<NodeId>> {
        let now = Utc::now();
        let ids: Vec<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();

        let parent = tree
            .nodes
            .get_mut(parent_id)
            .ok_or_else(|| EngineError::NodeNotFound {
                node_id: parent_id.to_string(),
            })?;
        parent.child_ids.extend(ids.iter().cloned());
        parent.last_modified = now;

        if as_roots {
            tree.root_node_ids.extend(ids.iter().cloned());
        }
        for node in &nodes {
            tree.nodes.insert(node.id.clone(), node.clone());
        }
        tree.last_modified = now;

        if let Some(sink) = &self.sink {
            sink.persist_nodes(&tree.id, &nodes).await?;
        }

        Ok(ids)
    }
}
