use std::env;

use crate::error::{ConfigError, ConfigResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub request: RequestConfig,
    pub session: SessionConfig,
}

/// LLM provider configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

/// Backcasting session defaults
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_generations: u32,
    pub branching_factor: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let llm = LlmConfig {
            api_key: env::var("LLM_API_KEY").map_err(|_| ConfigError::MissingVar {
                name: "LLM_API_KEY".to_string(),
            })?,
            base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            temperature: parse_var("LLM_TEMPERATURE", 0.7)?,
            max_tokens: parse_var("LLM_MAX_TOKENS", 2000)?,
        };

        let request = RequestConfig {
            timeout_ms: parse_var("REQUEST_TIMEOUT_MS", 30000)?,
            max_retries: parse_var("MAX_RETRIES", 3)?,
            retry_delay_ms: parse_var("RETRY_DELAY_MS", 1000)?,
        };

        let session = SessionConfig {
            max_generations: {
                let n: u32 = parse_var("MAX_GENERATIONS", 4)?;
                if !(1..=7).contains(&n) {
                    return Err(ConfigError::InvalidValue {
                        name: "MAX_GENERATIONS".to_string(),
                        message: format!("expected 1-7, got {}", n),
                    });
                }
                n
            },
            branching_factor: parse_var("BRANCHING_FACTOR", 3)?,
        };

        Ok(Config {
            llm,
            request,
            session,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> ConfigResult<T> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("could not parse '{}'", raw),
        }),
        Err(_) => Ok(default),
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_generations: 4,
            branching_factor: 3,
        }
    }
}
