use thiserror::Error;

/// Top-level engine errors for quest tree operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Quest node not found: {node_id}")]
    NodeNotFound { node_id: String },

    #[error("Expansion to generation {requested} exceeds tree limit of {max_generations}")]
    DepthExceeded {
        requested: u32,
        max_generations: u32,
    },

    #[error("Facilitating advisor not found: {name}")]
    FacilitatorNotFound { name: String },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Response parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {name}")]
    MissingVar { name: String },

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// LLM chat transport errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM unavailable: {message} (retries: {retries})")]
    Unavailable { message: String, retries: u32 },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Response parsing errors.
///
/// These are deliberately verbose: each variant carries a snippet of the
/// raw completion so integration failures surface during development
/// instead of being masked by placeholder content.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No JSON value found in response. Snippet: '{snippet}'")]
    NoJsonFound { snippet: String },

    #[error("Invalid JSON syntax: {message}. Snippet: '{snippet}'")]
    InvalidJson { message: String, snippet: String },

    #[error(
        "Expected a JSON array or object of quest descriptors, got {found}. Snippet: '{snippet}'"
    )]
    UnexpectedShape { found: String, snippet: String },

    #[error("All {total} quest descriptors were invalid (missing or empty title). Snippet: '{snippet}'")]
    AllDescriptorsInvalid { total: usize, snippet: String },
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Result type alias for response parsing
pub type ParseResult<T> = Result<T, ParseError>;
