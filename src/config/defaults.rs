use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

pub fn default_timeout_sec() -> u64 {
    120
}

pub fn default_max_document_chars() -> usize {
    15_000
}

pub fn default_persona_set() -> String {
    "cross-functional".to_string()
}

pub fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

pub fn default_temperature() -> f32 {
    0.2
}

pub fn default_openrouter_model() -> String {
    "openrouter/auto".to_string()
}

pub fn default_openrouter_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

pub fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

pub fn default_ollama_url() -> String {
    "http://127.0.0.1:11434/api/chat".to_string()
}

pub fn default_max_attempts() -> u32 {
    2
}

pub fn default_backoff_base_ms() -> u64 {
    1000
}

pub fn default_true() -> bool {
    true
}
