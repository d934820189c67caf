use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Wall-clock limit for one provider call
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,

    /// Document text beyond this many characters is not sent to the model
    #[serde(default = "default_max_document_chars")]
    pub max_document_chars: usize,

    /// Also attach each persona's global feedback at the document start
    #[serde(default)]
    pub insert_summary: bool,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default = "default_persona_set")]
    pub persona_set: String,

    /// Extra persona sets; an id matching a built-in set replaces it
    #[serde(default)]
    pub persona_sets: Vec<PersonaSet>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    /// Model id; falls back to the provider's default model
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model: None,
            base_url: None,
            api_key: None,
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
        }
    }
}

impl ProviderConfig {
    pub fn model_or_default(&self) -> String {
        self.model.clone().unwrap_or_else(|| match self.kind {
            ProviderKind::OpenRouter => default_openrouter_model(),
            ProviderKind::Ollama => default_ollama_model(),
        })
    }

    pub fn base_url_or_default(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| match self.kind {
            ProviderKind::OpenRouter => default_openrouter_url(),
            ProviderKind::Ollama => default_ollama_url(),
        })
    }

    /// Explicit key wins over the environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenRouter,
    Ollama,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenRouter => write!(f, "openrouter"),
            ProviderKind::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "ollama" | "local" => Ok(ProviderKind::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PersonaSet {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub personas: Vec<Persona>,
}

impl PersonaSet {
    pub fn enabled(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter().filter(|p| p.enabled)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Persona {
    pub id: String,

    pub name: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default, alias = "system")]
    pub system_prompt: String,

    #[serde(default, alias = "instruction")]
    pub instruction_prompt: String,

    /// Hex display color, e.g. "#2563eb"
    #[serde(default)]
    pub color: Option<String>,
}
