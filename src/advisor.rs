//! Advisor personas and facilitator resolution.
//!
//! The engine never inspects persona content beyond interpolating it
//! verbatim into prompt text. Missing fields are simply omitted from the
//! rendered context.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A council advisor whose voice frames LLM prompts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisor {
    pub name: String,
    /// The thematic lens the advisor brings, e.g. "transformation and synthesis".
    pub lens: String,
    pub spec: AdvisorSpec,
}

/// Category-specific persona fields.
///
/// Each category carries its own named optional fields so prompt
/// construction is exhaustive and missing-field handling is explicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdvisorSpec {
    Archetype {
        #[serde(default)]
        tagline: Option<String>,
        #[serde(default)]
        intro: Option<String>,
        #[serde(default)]
        background: Option<String>,
        #[serde(default)]
        style_of_speech: Option<String>,
        #[serde(default)]
        appearance: Option<String>,
        #[serde(default)]
        purpose: Option<String>,
    },
    RealPerson {
        #[serde(default)]
        historical_period: Option<String>,
        #[serde(default)]
        background_context: Option<String>,
        #[serde(default)]
        speaking_style: Option<String>,
        #[serde(default)]
        key_beliefs: Vec<String>,
        #[serde(default)]
        expertise_domains: Vec<String>,
    },
    Mythic {
        #[serde(default)]
        cultural_origin: Option<String>,
        #[serde(default)]
        mythic_domain: Option<String>,
        #[serde(default)]
        speaking_style: Option<String>,
        #[serde(default)]
        powers_and_gifts: Vec<String>,
        #[serde(default)]
        sacred_teachings: Vec<String>,
    },
}

impl AdvisorSpec {
    /// Category label used in persona rendering
    pub fn category(&self) -> &'static str {
        match self {
            AdvisorSpec::Archetype { .. } => "archetype",
            AdvisorSpec::RealPerson { .. } => "real",
            AdvisorSpec::Mythic { .. } => "mythic",
        }
    }
}

impl Advisor {
    /// Render the persona block interpolated into every prompt.
    ///
    /// Fields are listed one per line; absent fields produce no line.
    /// Output is deterministic for a given advisor.
    pub fn persona_context(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        let mut push_opt = |label: &str, value: &Option<String>| {
            if let Some(v) = value {
                if !v.is_empty() {
                    lines.push(format!("- {}: {}", label, v));
                }
            }
        };

        match &self.spec {
            AdvisorSpec::Archetype {
                tagline,
                intro,
                background,
                style_of_speech,
                appearance,
                purpose,
            } => {
                push_opt("Tagline", tagline);
                push_opt("Intro", intro);
                push_opt("Background", background);
                push_opt("Style of Speech", style_of_speech);
                push_opt("Appearance", appearance);
                push_opt("Purpose", purpose);
            }
            AdvisorSpec::RealPerson {
                historical_period,
                background_context,
                speaking_style,
                key_beliefs,
                expertise_domains,
            } => {
                push_opt("Historical Period", historical_period);
                push_opt("Background", background_context);
                push_opt("Style of Speech", speaking_style);
                if !key_beliefs.is_empty() {
                    lines.push(format!("- Key Beliefs: {}", key_beliefs.join(", ")));
                }
                if !expertise_domains.is_empty() {
                    lines.push(format!(
                        "- Expertise Domains: {}",
                        expertise_domains.join(", ")
                    ));
                }
            }
            AdvisorSpec::Mythic {
                cultural_origin,
                mythic_domain,
                speaking_style,
                powers_and_gifts,
                sacred_teachings,
            } => {
                push_opt("Cultural Origin", cultural_origin);
                push_opt("Mythic Domain", mythic_domain);
                push_opt("Style of Speech", speaking_style);
                if !powers_and_gifts.is_empty() {
                    lines.push(format!("- Powers & Gifts: {}", powers_and_gifts.join(", ")));
                }
                if !sacred_teachings.is_empty() {
                    lines.push(format!(
                        "- Sacred Teachings: {}",
                        sacred_teachings.join(", ")
                    ));
                }
            }
        }

        format!(
            "**Advisor Persona**\nName: {}\nType: {}\nLens: {}\n{}\n\nSpeak in the advisor's voice, respecting the Style of Speech and drawing on Background and Expertise where relevant.",
            self.name,
            self.spec.category(),
            self.lens,
            lines.join("\n")
        )
    }
}

/// Resolve the facilitating advisor for a tree by name.
///
/// A missing facilitator is an explicit error rather than a silent
/// fallback to the first advisor in the list, so lookup failures cannot be
/// masked by an arbitrary persona.
pub fn resolve_facilitator<'a>(advisors: &'a [Advisor], name: &str) -> EngineResult<&'a Advisor> {
    advisors
        .iter()
        .find(|a| a.name == name)
        .ok_or_else(|| EngineError::FacilitatorNotFound {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn alchemist() -> Advisor {
        Advisor {
            name: "The Alchemist".to_string(),
            lens: "transformation and synthesis".to_string(),
            spec: AdvisorSpec::Archetype {
                tagline: Some("Catalyst of Transformation".to_string()),
                intro: None,
                background: Some("Bridge between the seen and unseen".to_string()),
                style_of_speech: Some("Poetic mysticism and rigorous logic".to_string()),
                appearance: None,
                purpose: None,
            },
        }
    }

    #[test]
    fn test_persona_context_includes_present_fields() {
        let context = alchemist().persona_context();
        assert!(context.contains("Name: The Alchemist"));
        assert!(context.contains("Type: archetype"));
        assert!(context.contains("Lens: transformation and synthesis"));
        assert!(context.contains("- Tagline: Catalyst of Transformation"));
        assert!(context.contains("- Style of Speech: Poetic mysticism"));
    }

    #[test]
    fn test_persona_context_omits_missing_fields() {
        let context = alchemist().persona_context();
        assert!(!context.contains("- Intro:"));
        assert!(!context.contains("- Appearance:"));
    }

    #[test]
    fn test_persona_context_is_deterministic() {
        let advisor = alchemist();
        assert_eq!(advisor.persona_context(), advisor.persona_context());
    }

    #[test]
    fn test_real_person_persona_lists() {
        let advisor = Advisor {
            name: "Ada".to_string(),
            lens: "analytical computation".to_string(),
            spec: AdvisorSpec::RealPerson {
                historical_period: Some("19th century".to_string()),
                background_context: None,
                speaking_style: None,
                key_beliefs: vec!["imagination in science".to_string()],
                expertise_domains: vec!["mathematics".to_string(), "computation".to_string()],
            },
        };
        let context = advisor.persona_context();
        assert!(context.contains("Type: real"));
        assert!(context.contains("- Key Beliefs: imagination in science"));
        assert!(context.contains("- Expertise Domains: mathematics, computation"));
    }

    #[test]
    fn test_mythic_persona_fields() {
        let advisor = Advisor {
            name: "Raven".to_string(),
            lens: "trickster wisdom".to_string(),
            spec: AdvisorSpec::Mythic {
                cultural_origin: Some("Pacific Northwest".to_string()),
                mythic_domain: Some("transformation".to_string()),
                speaking_style: None,
                powers_and_gifts: vec!["shapeshifting".to_string()],
                sacred_teachings: Vec::new(),
            },
        };
        let context = advisor.persona_context();
        assert!(context.contains("Type: mythic"));
        assert!(context.contains("- Powers & Gifts: shapeshifting"));
        assert!(!context.contains("- Sacred Teachings:"));
    }

    #[test]
    fn test_resolve_facilitator_by_name() {
        let advisors = vec![alchemist()];
        let found = resolve_facilitator(&advisors, "The Alchemist").unwrap();
        assert_eq!(found.name, "The Alchemist");
    }

    #[test]
    fn test_resolve_facilitator_missing_is_error() {
        let advisors = vec![alchemist()];
        let err = resolve_facilitator(&advisors, "Nobody").unwrap_err();
        assert!(matches!(err, EngineError::FacilitatorNotFound { .. }));
        assert!(err.to_string().contains("Nobody"));
    }

    #[test]
    fn test_advisor_spec_serde_tagged() {
        let advisor = alchemist();
        let json = serde_json::to_string(&advisor).unwrap();
        assert!(json.contains(r#""type":"archetype""#));
        let back: Advisor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, advisor.name);
    }
}
