use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unknown persona set '{0}'")]
    UnknownPersonaSet(String),

    #[error("Persona set '{0}' has no enabled personas")]
    NoPersonasEnabled(String),

    #[error("Duplicate persona id '{persona}' in set '{set}'")]
    DuplicatePersona { set: String, persona: String },

    #[error("Temperature {0} is outside 0.0..=2.0")]
    Temperature(f32),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

/// Failures talking to a model provider. Every variant is a transport error
/// from the orchestrator's point of view.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("No API key configured (set {0} or provider.api_key)")]
    MissingApiKey(String),

    #[error("Malformed response envelope: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Rate limits, server errors and transport failures may clear up on a
    /// later attempt; bad credentials or a malformed envelope will not.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Timeout(_) | ProviderError::Http(_) => true,
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            ProviderError::MissingApiKey(_) | ProviderError::InvalidResponse(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Model response is not recoverable as JSON ({} chars)", raw.chars().count())]
    Unparseable { raw: String },
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read document '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Location {start}..{end} is outside the document")]
    OutOfBounds { start: usize, end: usize },
}

/// Failure of a single persona's review. Caught by the orchestrator and turned
/// into that persona's `error` status.
#[derive(Error, Debug)]
pub enum PersonaError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Parser error: {0}")]
    Parser(#[from] ParserError),
}

impl PersonaError {
    /// Raw model output kept for diagnostics when parsing failed.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            PersonaError::Parser(ParserError::Unparseable { raw }) => Some(raw),
            PersonaError::Provider(_) => None,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RunnerError {
    #[error("No personas enabled")]
    NoPersonasEnabled,

    #[error("Document text is empty")]
    EmptyDocument,

    #[error("A review run is already in progress")]
    AlreadyRunning,
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
