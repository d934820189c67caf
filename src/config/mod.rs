mod defaults;
mod personas;
mod types;

pub use personas::builtin_persona_sets;
pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            report_dir: default_report_dir(),
            timeout_sec: default_timeout_sec(),
            max_document_chars: default_max_document_chars(),
            insert_summary: false,
            provider: ProviderConfig::default(),
            retry: RetryConfig::default(),
            persona_set: default_persona_set(),
            persona_sets: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            info!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Built-in sets with configured sets layered on top (same id replaces)
    pub fn persona_sets(&self) -> Vec<PersonaSet> {
        let mut sets = builtin_persona_sets();
        for custom in &self.persona_sets {
            match sets.iter_mut().find(|s| s.id == custom.id) {
                Some(existing) => *existing = custom.clone(),
                None => sets.push(custom.clone()),
            }
        }
        sets
    }

    pub fn active_set(&self) -> Result<PersonaSet, ConfigError> {
        self.persona_sets()
            .into_iter()
            .find(|s| s.id == self.persona_set)
            .ok_or_else(|| ConfigError::UnknownPersonaSet(self.persona_set.clone()))
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        for set in self.persona_sets() {
            let mut seen = HashSet::new();
            for persona in &set.personas {
                if !seen.insert(persona.id.as_str()) {
                    return Err(ConfigError::DuplicatePersona {
                        set: set.id.clone(),
                        persona: persona.id.clone(),
                    });
                }
            }
        }

        let active = self.active_set()?;
        if active.enabled().next().is_none() {
            return Err(ConfigError::NoPersonasEnabled(active.id));
        }

        let temperature = self.provider.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Temperature(temperature));
        }
        if self.timeout_sec == 0 {
            return Err(ConfigError::NotPositive("timeout_sec"));
        }
        if self.max_document_chars == 0 {
            return Err(ConfigError::NotPositive("max_document_chars"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.active_set().unwrap().personas.len(), 5);
    }

    #[test]
    fn test_load_yaml_with_aliases() {
        let yaml = r##"
provider:
  kind: ollama
  temperature: 0.5
persona_set: editors
persona_sets:
  - id: editors
    name: Editors
    personas:
      - id: copy
        name: Copy Editor
        system: You fix grammar.
        instruction: Mark typos.
      - id: dev
        name: Developmental Editor
        enabled: false
        system_prompt: You shape structure.
        instruction_prompt: Suggest reordering.
"##;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.provider.kind, ProviderKind::Ollama);
        assert_eq!(config.provider.model_or_default(), "llama3.1:8b");
        assert_eq!(config.timeout_sec, 120);

        let set = config.active_set().unwrap();
        assert_eq!(set.personas[0].system_prompt, "You fix grammar.");
        assert_eq!(set.personas[0].instruction_prompt, "Mark typos.");
        assert_eq!(set.enabled().count(), 1);
    }

    #[test]
    fn test_custom_set_replaces_builtin() {
        let mut config = Config::default();
        config.persona_sets.push(PersonaSet {
            id: "cross-functional".to_string(),
            name: "Trimmed".to_string(),
            personas: vec![Persona {
                id: "solo".to_string(),
                name: "Solo".to_string(),
                enabled: true,
                system_prompt: String::new(),
                instruction_prompt: String::new(),
                color: None,
            }],
        });

        let sets = config.persona_sets();
        assert_eq!(sets.len(), builtin_persona_sets().len());
        assert_eq!(config.active_set().unwrap().name, "Trimmed");
    }

    #[test]
    fn test_validate_rejects_unknown_set() {
        let config = Config {
            persona_set: "nope".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownPersonaSet(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_validate_rejects_all_disabled() {
        let mut config = Config::default();
        let mut set = config.active_set().unwrap();
        for persona in &mut set.personas {
            persona.enabled = false;
        }
        config.persona_sets.push(set);

        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoPersonasEnabled(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = Config {
            timeout_sec: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive("timeout_sec"))
        ));

        let config = Config {
            max_document_chars: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive("max_document_chars"))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.persona_set, "cross-functional");
    }

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("OpenRouter".parse::<ProviderKind>(), Ok(ProviderKind::OpenRouter));
        assert_eq!("local".parse::<ProviderKind>(), Ok(ProviderKind::Ollama));
        assert!("gpt".parse::<ProviderKind>().is_err());
    }
}
