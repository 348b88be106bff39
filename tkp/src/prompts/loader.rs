//! Prompt Loader
//!
//! Loads prompt templates from the user override directory or falls back
//! to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::catalog::{Language, Platform};

/// Context for the initial generation prompt
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContext {
    /// Language name as the model should read it ("English", "Spanish")
    pub language: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
    pub definition_of_done: Vec<String>,
    /// Platform structure instructions, inserted verbatim
    pub format_instructions: String,
}

/// Context for a refinement prompt
#[derive(Debug, Clone, Serialize)]
pub struct RefineContext {
    pub current_description: String,
    pub refinement_request: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `~/.config/ticketplease/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `dir` before the embedded templates
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let user_dir_exists = dir.is_dir();
        debug!(?dir, %user_dir_exists, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            user_dir: if user_dir_exists { Some(dir.to_path_buf()) } else { None },
        }
    }

    /// Loader using the default override directory when it exists
    pub fn with_default_dir() -> Self {
        match dirs::config_dir() {
            Some(config_dir) => Self::new(config_dir.join("ticketplease").join("prompts")),
            None => Self::embedded_only(),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // prompts are plain text, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{user_dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found in user override");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}'", template_name);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Platform structure instructions, unrendered
    pub fn format_instructions(&self, platform: Platform) -> Result<String> {
        debug!(%platform, "PromptLoader::format_instructions: called");
        self.load_template(platform.format_template())
    }

    /// Build the initial generation prompt
    pub fn generation_prompt(
        &self,
        description: &str,
        acceptance_criteria: &[String],
        definition_of_done: &[String],
        platform: Platform,
        language: Language,
    ) -> Result<String> {
        debug!(%platform, language = %language.code(), "PromptLoader::generation_prompt: called");
        let context = GenerateContext {
            language: language.prompt_name().to_string(),
            description: description.to_string(),
            acceptance_criteria: acceptance_criteria.to_vec(),
            definition_of_done: definition_of_done.to_vec(),
            format_instructions: self.format_instructions(platform)?.trim().to_string(),
        };
        self.render("generate", &context)
    }

    /// Build a refinement prompt
    pub fn refinement_prompt(&self, current_description: &str, refinement_request: &str) -> Result<String> {
        debug!("PromptLoader::refinement_prompt: called");
        let context = RefineContext {
            current_description: current_description.to_string(),
            refinement_request: refinement_request.to_string(),
        };
        self.render("refine", &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_generation_prompt_github() {
        let loader = PromptLoader::embedded_only();

        let prompt = loader
            .generation_prompt(
                "Add login feature",
                &items(&["User can enter credentials", "User gets logged in"]),
                &items(&["Code reviewed", "Tests pass"]),
                Platform::GitHub,
                Language::English,
            )
            .unwrap();

        assert!(prompt.contains("in English"));
        assert!(prompt.contains("Task Description: Add login feature"));
        assert!(prompt.contains("- User can enter credentials\n"));
        assert!(prompt.contains("- User gets logged in"));
        assert!(prompt.contains("- Code reviewed"));
        assert!(prompt.contains("### Acceptance Criteria"));
        assert!(prompt.contains("- [ ]"));
        assert!(!prompt.contains("h3."));
    }

    #[test]
    fn test_generation_prompt_jira_keeps_formatting_hints() {
        let loader = PromptLoader::embedded_only();

        let prompt = loader
            .generation_prompt("Fix bug", &[], &[], Platform::Jira, Language::Spanish)
            .unwrap();

        assert!(prompt.contains("in Spanish"));
        assert!(prompt.contains("h3. Description"));
        assert!(prompt.contains("{{monospaced text}}"));
        assert!(prompt.contains("{code}code here{code}"));
        assert!(prompt.contains("- None provided"));
    }

    #[test]
    fn test_user_text_is_not_escaped_or_interpreted() {
        let loader = PromptLoader::embedded_only();

        let prompt = loader
            .generation_prompt(
                "Handle <script> & \"quotes\" in {{names}}",
                &[],
                &[],
                Platform::GitHub,
                Language::English,
            )
            .unwrap();

        assert!(prompt.contains("Handle <script> & \"quotes\" in {{names}}"));
    }

    #[test]
    fn test_refinement_prompt() {
        let loader = PromptLoader::embedded_only();

        let prompt = loader
            .refinement_prompt("Current task description", "Make it more detailed")
            .unwrap();

        assert!(prompt.contains("Current task description"));
        assert!(prompt.contains("Make it more detailed"));
        assert!(prompt.to_lowercase().contains("refine"));
    }

    #[test]
    fn test_user_override_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("refine.pmt"), "CUSTOM {{refinement_request}}").unwrap();

        let loader = PromptLoader::new(dir.path());

        assert_eq!(loader.refinement_prompt("old", "shorter").unwrap(), "CUSTOM shorter");
        // templates without an override still come from the binary
        assert!(loader.format_instructions(Platform::Jira).unwrap().contains("Jira markup"));
    }

    #[test]
    fn test_missing_override_dir_falls_back() {
        let loader = PromptLoader::new("/nonexistent/ticketplease/prompts");
        assert!(loader.format_instructions(Platform::GitHub).is_ok());
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
