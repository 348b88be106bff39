//! Configuration wizard
//!
//! First-run setup and interactive updates of an existing configuration.

use tracing::{debug, info, warn};

use crate::ask;
use crate::catalog::{CUSTOM_MODEL, LANGUAGES, PLATFORMS, PROVIDERS, models_for};
use crate::config::{Config, ConfigStore};
use crate::files::{expand_file_path, validate_optional_path};
use crate::terminal::{Prompt, Prompter};

const UPDATE_PROVIDER: &str = "🤖 AI Provider & Model";
const UPDATE_PREFERENCES: &str = "🌐 Language & Platform";
const UPDATE_FILES: &str = "📁 Default Files";
const UPDATE_ALL: &str = "🔄 Update All Settings";
const UPDATE_CANCEL: &str = "❌ Cancel";

/// Provider, key and model chosen by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSelection {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

/// Language and platform codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceSelection {
    pub language: String,
    pub platform: String,
}

/// Expanded default file paths; empty when not set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub ac_path: String,
    pub dod_path: String,
}

/// Which parts of the configuration an update touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateScope {
    Provider,
    Preferences,
    Files,
    All,
}

pub struct ConfigWizard<'a, P: Prompter> {
    prompter: &'a mut P,
    store: &'a mut ConfigStore,
}

impl<'a, P: Prompter> ConfigWizard<'a, P> {
    pub fn new(prompter: &'a mut P, store: &'a mut ConfigStore) -> Self {
        Self { prompter, store }
    }

    /// First-run setup; true when a configuration was saved
    pub fn run(&mut self) -> bool {
        debug!("run: called");
        self.prompter.say("");
        self.prompter.heading("🎫 Welcome to TicketPlease!");
        self.prompter.say("");
        self.prompter
            .say("It looks like this is your first time using TicketPlease or your configuration is empty.");
        self.prompter.say("We'll guide you through the initial setup.");
        self.prompter.say("");

        let config = match self.collect_initial() {
            Prompt::Value(config) => config,
            Prompt::Cancelled => {
                info!("run: cancelled");
                self.prompter.warn("Configuration cancelled.");
                return false;
            }
        };

        if !self.save(config) {
            return false;
        }

        self.prompter.say("");
        self.prompter.success("✅ Configuration completed successfully!");
        self.prompter.say("");
        true
    }

    fn collect_initial(&mut self) -> Prompt<Config> {
        let mut config = self.store.config().clone();

        let llm = ask!(self.collect_llm_config(None));
        let preferences = ask!(self.collect_preferences(None));
        let files = ask!(self.collect_file_paths(None));

        apply_llm(&mut config, llm);
        apply_preferences(&mut config, preferences);
        apply_files(&mut config, files);
        Prompt::Value(config)
    }

    /// Update selected sections of an existing configuration
    pub fn run_update(&mut self) -> bool {
        debug!("run_update: called");
        let current = match self.store.load() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "run_update: could not load configuration");
                self.prompter.error(&format!("❌ Configuration update error: {:#}", e));
                return false;
            }
        };

        self.show_current_config(&current);

        let updated = match self.collect_update(&current) {
            Prompt::Value(Some(config)) => config,
            Prompt::Value(None) | Prompt::Cancelled => {
                info!("run_update: cancelled");
                self.prompter.warn("Configuration update cancelled.");
                return false;
            }
        };

        if !self.save(updated) {
            return false;
        }

        self.prompter.success("✅ Configuration updated successfully!");
        true
    }

    /// `None` when the user picked Cancel from the menu
    fn collect_update(&mut self, current: &Config) -> Prompt<Option<Config>> {
        let options = [UPDATE_PROVIDER, UPDATE_PREFERENCES, UPDATE_FILES, UPDATE_ALL, UPDATE_CANCEL];
        let scope = match ask!(self.prompter.select("What would you like to update?", &options, 0)) {
            0 => UpdateScope::Provider,
            1 => UpdateScope::Preferences,
            2 => UpdateScope::Files,
            3 => UpdateScope::All,
            _ => return Prompt::Value(None),
        };
        debug!(?scope, "collect_update: scope chosen");

        let mut config = current.clone();
        if matches!(scope, UpdateScope::Provider | UpdateScope::All) {
            apply_llm(&mut config, ask!(self.collect_llm_config(Some(current))));
        }
        if matches!(scope, UpdateScope::Preferences | UpdateScope::All) {
            apply_preferences(&mut config, ask!(self.collect_preferences(Some(current))));
        }
        if matches!(scope, UpdateScope::Files | UpdateScope::All) {
            apply_files(&mut config, ask!(self.collect_file_paths(Some(current))));
        }
        Prompt::Value(Some(config))
    }

    fn save(&mut self, config: Config) -> bool {
        match self.store.save(config) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "save: failed");
                self.prompter.error(&format!("❌ Configuration error: {:#}", e));
                false
            }
        }
    }

    pub fn show_current_config(&mut self, config: &Config) {
        let not_set = |path: &str| if path.is_empty() { "not set".to_string() } else { path.to_string() };

        self.prompter.heading("Current Configuration:");
        self.prompter
            .say(&format!("  Provider: {}", PROVIDERS.display_for(&config.api_keys.provider)));
        self.prompter.say(&format!("  Model: {}", config.llm.model));
        self.prompter.say(&format!(
            "  Language: {}",
            LANGUAGES.display_for(&config.preferences.default_output_language)
        ));
        self.prompter
            .say(&format!("  Platform: {}", PLATFORMS.display_for(&config.preferences.default_platform)));
        self.prompter.say(&format!(
            "  Acceptance Criteria file: {}",
            not_set(&config.preferences.default_ac_path)
        ));
        self.prompter.say(&format!(
            "  Definition of Done file: {}",
            not_set(&config.preferences.default_dod_path)
        ));
        self.prompter.say("");
    }

    /// Provider, API key and model
    ///
    /// With a current configuration, a blank key keeps the current one as
    /// long as the provider did not change.
    pub fn collect_llm_config(&mut self, current: Option<&Config>) -> Prompt<LlmSelection> {
        self.prompter.heading("AI Provider Configuration");
        self.prompter.hint("These values are required to generate task descriptions.");

        let current_provider = current.map(|c| c.api_keys.provider.as_str()).unwrap_or("openai");
        let default = PROVIDERS.index_of_code(current_provider).unwrap_or(0);
        let index = ask!(self.prompter.select(
            "Which AI provider would you like to use?",
            &PROVIDERS.display_names(),
            default
        ));
        let Some(provider) = PROVIDERS.code_at(index).map(str::to_string) else {
            return Prompt::Cancelled;
        };
        let provider_display = PROVIDERS.display_for(&provider).to_string();

        let kept_key = current
            .filter(|c| c.api_keys.provider == provider && !c.api_keys.api_key.trim().is_empty())
            .map(|c| c.api_keys.api_key.clone());
        let api_key = ask!(self.collect_api_key(&provider_display, kept_key));

        let current_model = current
            .filter(|c| c.api_keys.provider == provider)
            .map(|c| c.llm.model.as_str())
            .unwrap_or("");
        let model = ask!(self.collect_model(&provider, current_model));

        Prompt::Value(LlmSelection {
            provider,
            api_key,
            model,
        })
    }

    fn collect_api_key(&mut self, provider_display: &str, kept_key: Option<String>) -> Prompt<String> {
        let message = if kept_key.is_some() {
            format!("Enter your API Key for {} (leave empty to keep current):", provider_display)
        } else {
            format!("Enter your API Key for {}:", provider_display)
        };

        loop {
            let key = ask!(self.prompter.secret(&message));
            let key = key.trim();
            if !key.is_empty() {
                return Prompt::Value(key.to_string());
            }
            if let Some(ref kept) = kept_key {
                debug!("collect_api_key: keeping current key");
                return Prompt::Value(kept.clone());
            }
            self.prompter.error("API Key cannot be empty");
        }
    }

    fn collect_model(&mut self, provider: &str, current_model: &str) -> Prompt<String> {
        let models = models_for(provider);
        let default = if current_model.is_empty() {
            0
        } else {
            models
                .iter()
                .position(|m| *m == current_model)
                .unwrap_or(models.len().saturating_sub(1))
        };

        let index = ask!(self.prompter.select("Which model would you like to use?", &models, default));
        let Some(choice) = models.get(index).copied() else {
            return Prompt::Cancelled;
        };
        if choice != CUSTOM_MODEL {
            return Prompt::Value(choice.to_string());
        }

        self.prompter.say("");
        self.prompter.heading("Custom Model Specification");
        self.prompter.hint("Enter the exact model name as supported by your provider.");
        self.prompter.hint("Examples:");
        self.prompter.hint("  - For OpenAI: gpt-4o-2024-11-20, gpt-4o-mini-2024-07-18");
        self.prompter.hint("  - For Anthropic: claude-3-5-sonnet-20241022, claude-3-5-haiku-20241022");
        self.prompter.hint("  - For Gemini: gemini-1.5-pro-latest, gemini-2.0-flash-exp");
        self.prompter.hint("  - For OpenRouter: anthropic/claude-3.5-sonnet, openai/gpt-4o");

        loop {
            let model = ask!(self.prompter.line_with_initial("Enter custom model name:", current_model));
            let model = model.trim();
            if !model.is_empty() {
                return Prompt::Value(model.to_string());
            }
            self.prompter.error("Model name cannot be empty");
        }
    }

    /// Output language and platform
    pub fn collect_preferences(&mut self, current: Option<&Config>) -> Prompt<PreferenceSelection> {
        self.prompter.heading("General Preferences");
        self.prompter.hint("These preferences can be modified later for each task.");

        let current_language = current.map(|c| c.preferences.default_output_language.as_str()).unwrap_or("en");
        let index = ask!(self.prompter.select(
            "In which language would you like to generate the descriptions?",
            &LANGUAGES.display_names(),
            LANGUAGES.index_of_code(current_language).unwrap_or(0)
        ));
        let Some(language) = LANGUAGES.code_at(index).map(str::to_string) else {
            return Prompt::Cancelled;
        };

        let current_platform = current.map(|c| c.preferences.default_platform.as_str()).unwrap_or("github");
        let index = ask!(self.prompter.select(
            "What is your primary platform?",
            &PLATFORMS.display_names(),
            PLATFORMS.index_of_code(current_platform).unwrap_or(0)
        ));
        let Some(platform) = PLATFORMS.code_at(index).map(str::to_string) else {
            return Prompt::Cancelled;
        };

        Prompt::Value(PreferenceSelection { language, platform })
    }

    /// Optional default files for acceptance criteria and definition of done
    pub fn collect_file_paths(&mut self, current: Option<&Config>) -> Prompt<FileSelection> {
        self.prompter.heading("Optional Files");
        self.prompter.hint("You can specify files with default templates (optional).");

        let current_ac = current.map(|c| c.preferences.default_ac_path.as_str()).unwrap_or("");
        let ac_path = ask!(self.collect_optional_path("Path to Acceptance Criteria file (optional):", current_ac));

        let current_dod = current.map(|c| c.preferences.default_dod_path.as_str()).unwrap_or("");
        let dod_path = ask!(self.collect_optional_path("Path to Definition of Done file (optional):", current_dod));

        Prompt::Value(FileSelection { ac_path, dod_path })
    }

    fn collect_optional_path(&mut self, message: &str, current: &str) -> Prompt<String> {
        loop {
            let path = ask!(self.prompter.line_with_initial(message, current));
            match validate_optional_path(&path) {
                Ok(()) => return Prompt::Value(expand_file_path(&path)),
                Err(issue) => self.prompter.error(&issue.to_string()),
            }
        }
    }
}

fn apply_llm(config: &mut Config, llm: LlmSelection) {
    config.api_keys.provider = llm.provider;
    config.api_keys.api_key = llm.api_key;
    config.llm.model = llm.model;
}

fn apply_preferences(config: &mut Config, preferences: PreferenceSelection) {
    config.preferences.default_output_language = preferences.language;
    config.preferences.default_platform = preferences.platform;
}

fn apply_files(config: &mut Config, files: FileSelection) {
    config.preferences.default_ac_path = files.ac_path;
    config.preferences.default_dod_path = files.dod_path;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::Tone;
    use crate::terminal::mock::{Answer, ScriptedPrompter};
    use tempfile::TempDir;

    fn line(text: &str) -> Answer {
        Answer::Line(text.to_string())
    }

    fn existing_config() -> Config {
        let mut config = Config::default();
        config.api_keys.provider = "openai".to_string();
        config.api_keys.api_key = "old-key".to_string();
        config.llm.model = "gpt-4o-mini".to_string();
        config.preferences.default_output_language = "en".to_string();
        config.preferences.default_platform = "github".to_string();
        config
    }

    fn saved_store(dir: &TempDir, config: Config) -> ConfigStore {
        let mut store = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap();
        store.save(config).unwrap();
        store
    }

    #[test]
    fn test_first_run_saves_everything() {
        let dir = TempDir::new().unwrap();
        let ac = dir.path().join("ac.md");
        std::fs::write(&ac, "- works\n").unwrap();
        let mut store = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap();
        let mut prompter = ScriptedPrompter::new(vec![
            line("Anthropic"),
            line("   "),
            line("sk-ant-123"),
            line("claude-3-5-haiku-latest"),
            line("English"),
            line("Jira"),
            line(ac.to_str().unwrap()),
            line(""),
        ]);

        let saved = ConfigWizard::new(&mut prompter, &mut store).run();

        assert!(saved);
        assert!(prompter.printed(Tone::Error, "API Key cannot be empty"));
        assert!(prompter.printed(Tone::Success, "Configuration completed successfully"));
        let config = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap().config().clone();
        assert_eq!(config.api_keys.provider, "anthropic");
        assert_eq!(config.api_keys.api_key, "sk-ant-123");
        assert_eq!(config.llm.model, "claude-3-5-haiku-latest");
        assert_eq!(config.preferences.default_output_language, "en");
        assert_eq!(config.preferences.default_platform, "jira");
        assert_eq!(config.preferences.default_ac_path, ac.to_str().unwrap());
        assert_eq!(config.preferences.default_dod_path, "");
    }

    #[test]
    fn test_first_run_cancel_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        let mut store = ConfigStore::open(Some(&path)).unwrap();
        let mut prompter = ScriptedPrompter::new(vec![line("OpenAI"), Answer::Cancel]);

        let saved = ConfigWizard::new(&mut prompter, &mut store).run();

        assert!(!saved);
        assert!(!path.exists());
        assert!(prompter.printed(Tone::Warning, "Configuration cancelled."));
    }

    #[test]
    fn test_custom_model() {
        let dir = TempDir::new().unwrap();
        let mut store = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap();
        let mut prompter = ScriptedPrompter::new(vec![
            line("OpenRouter"),
            line("or-key"),
            line(CUSTOM_MODEL),
            line(""),
            line("  mistralai/mistral-large  "),
        ]);

        let result = ConfigWizard::new(&mut prompter, &mut store).collect_llm_config(None);

        assert_eq!(
            result,
            Prompt::Value(LlmSelection {
                provider: "openrouter".to_string(),
                api_key: "or-key".to_string(),
                model: "mistralai/mistral-large".to_string(),
            })
        );
        assert!(prompter.printed(Tone::Error, "Model name cannot be empty"));
    }

    #[test]
    fn test_file_paths_reprompt_until_valid() {
        let dir = TempDir::new().unwrap();
        let dod = dir.path().join("dod.md");
        std::fs::write(&dod, "Tests pass\n").unwrap();
        let mut store = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap();
        let mut prompter = ScriptedPrompter::new(vec![
            line(""),
            line(dir.path().join("missing.md").to_str().unwrap()),
            line(dir.path().to_str().unwrap()),
            line(dod.to_str().unwrap()),
        ]);

        let result = ConfigWizard::new(&mut prompter, &mut store).collect_file_paths(None);

        assert_eq!(
            result,
            Prompt::Value(FileSelection {
                ac_path: String::new(),
                dod_path: dod.to_str().unwrap().to_string(),
            })
        );
        assert!(prompter.printed(Tone::Error, "File does not exist"));
        assert!(prompter.printed(Tone::Error, "Path is not a file"));
    }

    #[test]
    fn test_show_current_config() {
        let dir = TempDir::new().unwrap();
        let mut store = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap();
        let mut config = existing_config();
        config.llm.model = "gpt-4o".to_string();
        let mut prompter = ScriptedPrompter::new(vec![]);

        ConfigWizard::new(&mut prompter, &mut store).show_current_config(&config);

        assert!(prompter.printed_any("Current Configuration:"));
        assert!(prompter.printed_any("Provider: OpenAI"));
        assert!(prompter.printed_any("Model: gpt-4o"));
        assert!(prompter.printed_any("Language: English"));
        assert!(prompter.printed_any("Platform: GitHub"));
        assert!(prompter.printed_any("Acceptance Criteria file: not set"));
    }

    #[test]
    fn test_update_provider_only_keeps_key_when_blank() {
        let dir = TempDir::new().unwrap();
        let mut store = saved_store(&dir, existing_config());
        let mut prompter = ScriptedPrompter::new(vec![line(UPDATE_PROVIDER), line("OpenAI"), line(""), line("gpt-4o")]);

        let saved = ConfigWizard::new(&mut prompter, &mut store).run_update();

        assert!(saved);
        assert!(prompter.printed(Tone::Success, "Configuration updated successfully!"));
        let config = store.config();
        assert_eq!(config.api_keys.api_key, "old-key");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.preferences.default_platform, "github");
    }

    #[test]
    fn test_update_new_provider_requires_key() {
        let dir = TempDir::new().unwrap();
        let mut store = saved_store(&dir, existing_config());
        let mut prompter = ScriptedPrompter::new(vec![
            line(UPDATE_PROVIDER),
            line("Anthropic"),
            line(""),
            line("new-key"),
            line("claude-3-5-sonnet-latest"),
        ]);

        let saved = ConfigWizard::new(&mut prompter, &mut store).run_update();

        assert!(saved);
        assert!(prompter.printed(Tone::Error, "API Key cannot be empty"));
        assert_eq!(store.config().api_keys.provider, "anthropic");
        assert_eq!(store.config().api_keys.api_key, "new-key");
    }

    #[test]
    fn test_update_all_settings() {
        let dir = TempDir::new().unwrap();
        let mut store = saved_store(&dir, existing_config());
        let mut prompter = ScriptedPrompter::new(vec![
            line(UPDATE_ALL),
            line(""),
            line("new-key"),
            line(""),
            line("Español"),
            line("Jira"),
            line(""),
            line(""),
        ]);

        let saved = ConfigWizard::new(&mut prompter, &mut store).run_update();

        assert!(saved);
        let config = store.config();
        assert_eq!(config.api_keys.provider, "openai");
        assert_eq!(config.api_keys.api_key, "new-key");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.preferences.default_output_language, "es");
        assert_eq!(config.preferences.default_platform, "jira");
    }

    #[test]
    fn test_update_cancel_menu() {
        let dir = TempDir::new().unwrap();
        let mut store = saved_store(&dir, existing_config());
        let mut prompter = ScriptedPrompter::new(vec![line(UPDATE_CANCEL)]);

        let saved = ConfigWizard::new(&mut prompter, &mut store).run_update();

        assert!(!saved);
        assert!(prompter.printed(Tone::Warning, "Configuration update cancelled."));
        assert_eq!(store.config(), &existing_config());
    }

    #[test]
    fn test_update_abort_mid_way_saves_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = saved_store(&dir, existing_config());
        let mut prompter = ScriptedPrompter::new(vec![line(UPDATE_PREFERENCES), line("Español"), Answer::Cancel]);

        let saved = ConfigWizard::new(&mut prompter, &mut store).run_update();

        assert!(!saved);
        let reloaded = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap();
        assert_eq!(reloaded.config().preferences.default_output_language, "en");
    }
}
