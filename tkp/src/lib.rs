//! TicketPlease - AI-assisted ticket descriptions
//!
//! Collects a task description, acceptance criteria and a definition of
//! done, asks an LLM provider for a GitHub Markdown or Jira description,
//! lets the user refine it and copies the result to the clipboard.
//!
//! # Modules
//!
//! - [`collector`] - Interactive task data collection
//! - [`generator`] - Generation session and review loop
//! - [`wizard`] - First-run setup and configuration updates
//! - [`llm`] - LLM client trait and provider implementations
//! - [`prompts`] - Prompt templates
//! - [`terminal`] - Cancellable prompt primitive and console backend
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod app;
pub mod catalog;
pub mod cli;
pub mod collector;
pub mod config;
pub mod files;
pub mod generator;
pub mod llm;
pub mod output;
pub mod prompts;
pub mod terminal;
pub mod wizard;

// Re-export commonly used types
pub use catalog::{Language, Platform};
pub use collector::{TaskDataCollector, TaskInput};
pub use config::{Config, ConfigStore};
pub use generator::{AiService, Draft, GenerationError, GenerationResult, TaskGenerator, UserDecision};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use output::{ClipboardSink, OutputSink};
pub use prompts::PromptLoader;
pub use terminal::{ConsolePrompter, Prompt, Prompter, Tone};
pub use wizard::ConfigWizard;
