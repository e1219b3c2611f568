//! # Holonic Backcasting
//!
//! A recursive quest-tree generation engine for backcasting: start from a
//! desired future state (the vision) and work backward to present-day
//! actions by repeatedly asking an LLM to break quests into child quests.
//!
//! ## Features
//!
//! - **Quest Tree**: strict forest of generation-bounded quest nodes with
//!   append-only growth and structural validation
//! - **Context Building**: ancestry chains and sibling context so prompts
//!   stay coherent at any depth
//! - **Holonic Prompting**: one self-similar template for seed generation
//!   and child expansion, scaled by a generation-wisdom table
//! - **Response Parsing**: balanced-JSON extraction from prose-wrapped
//!   completions with structured, verbose failure
//! - **Orchestration**: all-or-nothing node attachment, explicit depth
//!   and facilitator errors, optional persistence collaborator
//!
//! ## Architecture
//!
//! ```text
//! Engine → Context Builder (reads tree)
//!        → Prompt Constructor (vision + advisor + context)
//!        → LLM chat (HTTP)
//!        → Response Parser
//!        → Engine (attaches children) → QuestSink
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use holonic_backcasting::{BackcastingEngine, ChatClient, Config, QuestTree, Vision};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let llm = Arc::new(ChatClient::new(&config.llm, config.request.clone())?);
//!     let engine = BackcastingEngine::new(llm);
//!
//!     let mut tree = QuestTree::new(
//!         Vision::new("Regenerate the village commons"),
//!         "The Alchemist",
//!         config.session.max_generations,
//!         config.session.branching_factor,
//!     );
//!     let seeds = engine.generate_seed_quests(&mut tree, &advisors).await?;
//!     engine.expand_quest_node(&mut tree, &seeds[0], &advisors).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Advisor personas and facilitator resolution.
pub mod advisor;
/// Configuration management loaded from the environment.
pub mod config;
/// Orchestration of seed generation and node expansion.
pub mod engine;
/// Error types and result aliases.
pub mod error;
/// LLM chat interface and HTTP client.
pub mod llm;
/// Quest descriptor parsing from raw LLM completions.
pub mod parser;
/// Outbound persistence collaborator seam.
pub mod persist;
/// Holonic prompt construction and generation wisdom.
pub mod prompts;
/// Quest tree data model and context building.
pub mod tree;

pub use advisor::{Advisor, AdvisorSpec};
pub use config::Config;
pub use engine::BackcastingEngine;
pub use error::{EngineError, EngineResult};
pub use llm::{ChatClient, ChatMessage, LlmChat};
pub use persist::{MemoryQuestSink, QuestSink};
pub use tree::{QuestTree, QuestTreeNode, Vision};
