//! Holonic prompt construction.
//!
//! One rendering path serves both seed generation and child expansion; the
//! same template scales across generations, with the generation-wisdom
//! table shifting the framing from strategic domains at generation 1 to
//! immediately executable steps deeper down. Rendering is a pure function
//! of its input: identical inputs produce byte-identical prompts.

use crate::advisor::Advisor;
use crate::tree::{QuestTreeNode, Vision};

/// System message sent with every quest generation request.
pub const BACKCASTING_SYSTEM_PROMPT: &str =
    "You are a recursive backcasting facilitator helping to create quest trees.";

/// Output contract appended to every prompt.
///
/// The strict JSON-array requirement is what the response parser relies
/// on; prose outside the array is tolerated but nothing else is usable.
const RESPONSE_CONTRACT: &str = r#"**CRITICAL**: Return ONLY a valid JSON array of quest descriptors, in this exact format:
```json
[
  {
    "title": "Example Quest Title",
    "description": "What this quest accomplishes",
    "assumptions": ["What we are assuming to be true"],
    "questions": ["Questions that arise from the assumptions"],
    "actions": ["Specific actionable steps"],
    "dependencies": []
  }
]
```
Do not include any other JSON value before the array."#;

/// The two entry modes of quest generation.
///
/// The rendering logic is otherwise identical; generation depth and the
/// presence of ancestry context are the only differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    /// Generation 1 from the vision; no ancestry or siblings.
    SeedGeneration,
    /// Generation N+1 under an existing node.
    ChildExpansion,
}

/// Everything the prompt renderer needs, assembled by the engine.
#[derive(Debug, Clone)]
pub struct HolonicPromptInput<'a> {
    pub vision: &'a Vision,
    pub advisor: &'a Advisor,
    /// The node being expanded. None for seed generation, where the focus
    /// is the vision itself.
    pub focus: Option<&'a QuestTreeNode>,
    /// Generation-1 ancestor down to the focus node's parent.
    pub ancestry: Vec<&'a QuestTreeNode>,
    /// Nodes sharing the focus node's parent, in generation-index order.
    pub siblings: Vec<&'a QuestTreeNode>,
    pub target_generation: u32,
    pub branching_factor: usize,
    pub request_type: RequestType,
}

/// Generation-specific framing for quest scale and actionability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationWisdom {
    pub guidance: &'static str,
    pub examples: &'static str,
    pub actionability: &'static str,
}

const GENERATION_GUIDANCE: [&str; 6] = [
    "foundational domains that everything builds upon",
    "major phases or components needed to complete the parent quest",
    "concrete work streams with clear deliverables",
    "specific tasks or milestones that can be completed in days/weeks",
    "granular action items with clear next steps",
    "immediate, actionable steps that can be started today",
];

const GENERATION_EXAMPLES: [&str; 6] = [
    "'Establish Supply Chain', 'Build Community Support', 'Create Technical Infrastructure'",
    "'Research Suppliers', 'Design Partnership Framework', 'Develop Pilot Program'",
    "'Contact 5 Local Suppliers', 'Draft Partnership Agreement', 'Recruit 10 Beta Users'",
    "'Call Johnson Lumber Co.', 'Write Partnership MOU Section 1', 'Post Recruitment on NextDoor'",
    "'Find Johnson Lumber phone number', 'Research partnership legal requirements', 'Create NextDoor account'",
    "'Google Johnson Lumber contact info', 'Download partnership template', 'Sign up at nextdoor.com'",
];

/// Look up framing for a target generation.
///
/// Generations beyond the table fall back to the most concrete framing.
pub fn generation_wisdom(generation: u32) -> GenerationWisdom {
    let index = generation.saturating_sub(1) as usize;
    GenerationWisdom {
        guidance: GENERATION_GUIDANCE
            .get(index)
            .copied()
            .unwrap_or("specific, actionable steps that move the parent quest forward"),
        examples: GENERATION_EXAMPLES.get(index).copied().unwrap_or("concrete actions"),
        actionability: if generation >= 4 {
            "concrete and immediately actionable"
        } else {
            "more specific than higher-level strategic planning"
        },
    }
}

/// Render the holonic prompt for one generation step.
///
/// No side effects; same input, byte-identical output.
pub fn render_holonic_prompt(input: &HolonicPromptInput<'_>) -> String {
    let wisdom = generation_wisdom(input.target_generation);
    let mut sections: Vec<String> = Vec::new();

    sections.push(format!(
        "**Holonic Quest Generation - Generation {}**\n\nYou are {}, facilitating regenerative backcasting using holonic principles.",
        input.target_generation, input.advisor.name
    ));

    sections.push(input.advisor.persona_context());

    sections.push(render_vision(input.vision));

    if !input.ancestry.is_empty() {
        sections.push(render_ancestry(&input.ancestry));
    }

    if let Some(focus) = input.focus {
        sections.push(render_focus(focus));
    }

    if !input.siblings.is_empty() {
        let titles: Vec<&str> = input.siblings.iter().map(|s| s.title.as_str()).collect();
        sections.push(format!(
            "**Existing sibling quests** (complement these; avoid duplicate themes): {}",
            titles.join(", ")
        ));
    }

    sections.push(render_task(input, &wisdom));

    sections.push(RESPONSE_CONTRACT.to_string());

    sections.join("\n\n")
}

fn render_vision(vision: &Vision) -> String {
    let mut lines = vec![format!("**Vision**: \"{}\"", vision.statement)];
    if !vision.principles.is_empty() {
        lines.push(format!("**Principles**: {}", vision.principles.join(", ")));
    }
    if !vision.success_indicators.is_empty() {
        lines.push(format!(
            "**Success Indicators**: {}",
            vision.success_indicators.join(", ")
        ));
    }
    if let Some(date) = &vision.target_date {
        lines.push(format!("**Target Date**: {}", date));
    }
    lines.join("\n")
}

/// Each ancestor shows its inquiry loop so the prompt reads top-down,
/// following how the inquiry narrowed from vision to the focus node.
fn render_ancestry(ancestry: &[&QuestTreeNode]) -> String {
    let mut lines = vec!["**Ancestry** (how the inquiry narrowed):".to_string()];
    for ancestor in ancestry {
        lines.push(format!(
            "- Generation {}: \"{}\"",
            ancestor.generation, ancestor.title
        ));
        if !ancestor.assumptions.is_empty() {
            lines.push(format!("  Assumptions: {}", ancestor.assumptions.join("; ")));
        }
        if !ancestor.questions.is_empty() {
            lines.push(format!("  Questions: {}", ancestor.questions.join("; ")));
        }
        if !ancestor.actions.is_empty() {
            lines.push(format!("  Actions: {}", ancestor.actions.join("; ")));
        }
    }
    lines.join("\n")
}

fn render_focus(focus: &QuestTreeNode) -> String {
    let mut lines = vec![format!("**Parent Quest**: \"{}\"", focus.title)];
    if !focus.description.is_empty() {
        lines.push(format!("Description: {}", focus.description));
    }
    if !focus.actions.is_empty() {
        lines.push(format!(
            "Parent actions each child quest should make achievable: {}",
            focus.actions.join("; ")
        ));
    }
    lines.join("\n")
}

fn render_task(input: &HolonicPromptInput<'_>, wisdom: &GenerationWisdom) -> String {
    let subject = match input.request_type {
        RequestType::SeedGeneration => format!(
            "Generate exactly {} seed quests that must be completed for this vision to be fully realized. These are the foundational quests.",
            input.branching_factor
        ),
        RequestType::ChildExpansion => format!(
            "Generate exactly {} complementary child quests for the parent quest above.",
            input.branching_factor
        ),
    };

    format!(
        "**HOLONIC TASK**:\n{}\n\nEach quest must be:\n1. **Essential** - the parent cannot succeed without it\n2. **Distinct** - covers a different aspect than its siblings\n3. **Appropriately scaled** for Generation {}: {}\n4. **Aligned** - supports the vision and principles\n5. **Holonic** - a complete whole and an essential part of the larger system\n\n**SCALE EXAMPLES for Generation {}**: {}\n\n**Actionability level**: {}",
        subject,
        input.target_generation,
        wisdom.guidance,
        input.target_generation,
        wisdom.examples,
        wisdom.actionability
    )
}
