//! Response parser: quest descriptors out of free-form LLM text.
//!
//! Extraction (locating a JSON value in prose) is handled by [`extract`]
//! and kept separate from descriptor validation. Parse failures are fatal
//! and verbose; individually malformed descriptors are dropped and
//! counted instead.

mod extract;

pub use extract::first_balanced_json;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ParseError, ParseResult};
use crate::tree::NodeId;

/// One quest descriptor as returned by the LLM.
///
/// Only `title` is required; everything else defaults to empty so partial
/// responses still yield usable nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestDescriptor {
    pub title: String,
    pub description: String,
    pub assumptions: Vec<String>,
    pub questions: Vec<String>,
    pub actions: Vec<String>,
    pub dependencies: Vec<NodeId>,
    pub future_state: Option<String>,
}

/// Parse metadata reported alongside validated descriptors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Description of how many descriptors arrived and their index order.
    pub sibling_relationships: String,
    /// Count of malformed descriptors dropped during validation.
    pub skipped: usize,
}

/// Validated outcome of parsing an LLM completion
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub descriptors: Vec<QuestDescriptor>,
    pub metadata: ResponseMetadata,
}

/// Length of the raw-text slice carried in parse errors.
const SNIPPET_LEN: usize = 200;

fn snippet(raw: &str) -> String {
    raw.trim().chars().take(SNIPPET_LEN).collect()
}

/// Turn a raw LLM completion into validated quest descriptors.
///
/// Locates the first balanced JSON array (or object, coerced to a
/// one-element array) in the text, falling back to parsing the whole
/// trimmed completion. Elements without a non-empty `title` are dropped
/// and counted; an entirely empty result is a failure, never silently
/// replaced with placeholder content.
pub fn parse_quest_response(raw: &str) -> ParseResult<ParsedResponse> {
    debug!(length = raw.len(), "Parsing quest response");

    let value = locate_json(raw)?;

    let elements = match value {
        serde_json::Value::Array(items) => items,
        // Single descriptor instead of an array: coerce.
        obj @ serde_json::Value::Object(_) => vec![obj],
        other => {
            return Err(ParseError::UnexpectedShape {
                found: json_type_name(&other).to_string(),
                snippet: snippet(raw),
            })
        }
    };

    if elements.is_empty() {
        return Err(ParseError::UnexpectedShape {
            found: "empty array".to_string(),
            snippet: snippet(raw),
        });
    }

    let total = elements.len();
    let mut descriptors = Vec::with_capacity(total);
    let mut skipped = 0;

    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<QuestDescriptor>(element) {
            Ok(descriptor) if !descriptor.title.trim().is_empty() => {
                descriptors.push(descriptor);
            }
            Ok(_) => {
                warn!(index, "Dropping quest descriptor with missing or empty title");
                skipped += 1;
            }
            Err(e) => {
                warn!(index, error = %e, "Dropping malformed quest descriptor");
                skipped += 1;
            }
        }
    }

    if descriptors.is_empty() {
        return Err(ParseError::AllDescriptorsInvalid {
            total,
            snippet: snippet(raw),
        });
    }

    let count = descriptors.len();
    Ok(ParsedResponse {
        descriptors,
        metadata: ResponseMetadata {
            sibling_relationships: format!(
                "{} sibling quests in index order 0..{}",
                count, count
            ),
            skipped,
        },
    })
}

/// Locate and parse a JSON value within the raw completion.
fn locate_json(raw: &str) -> ParseResult<serde_json::Value> {
    if let Some(candidate) = first_balanced_json(raw) {
        match serde_json::from_str(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => {
                // Balanced slice did not parse; try the whole trimmed text
                // before giving up.
                if let Ok(value) = serde_json::from_str(raw.trim()) {
                    return Ok(value);
                }
                return Err(ParseError::InvalidJson {
                    message: e.to_string(),
                    snippet: snippet(raw),
                });
            }
        }
    }

    match serde_json::from_str(raw.trim()) {
        Ok(value) => Ok(value),
        Err(_) => Err(ParseError::NoJsonFound {
            snippet: snippet(raw),
        }),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
