//! Ticket generation session
//!
//! Drives one session through collection, the initial provider call and
//! the review loop where the user accepts, refines or cancels.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::collector::{TaskDataCollector, TaskInput};
use crate::config::{Config, ConfigStore};
use crate::llm::{CompletionRequest, LlmClient, LlmError, StopReason, create_client};
use crate::output::OutputSink;
use crate::prompts::PromptLoader;
use crate::terminal::{Prompt, Prompter};

const ACCEPT: &str = "✅ Accept and copy to clipboard";
const REFINE: &str = "🔄 Refine description";
const CANCEL: &str = "❌ Cancel";

/// Why a provider call produced no usable text
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("The AI provider returned an empty response")]
    EmptyResponse,

    #[error("Failed to build prompt: {0}")]
    Prompt(String),
}

impl GenerationError {
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Provider(e) => e.hint(),
            Self::EmptyResponse => Some("Try again, or pick a different model with `tkp config`."),
            Self::Prompt(_) => None,
        }
    }
}

/// Latest accepted-or-pending provider output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Never blank
    pub text: String,
    /// 0 for the initial generation, +1 per successful refinement
    pub revision_count: u32,
}

/// Text returned by one provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    /// The provider stopped at the max-tokens limit
    pub truncated: bool,
}

/// What the user chose while reviewing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserDecision {
    Accept,
    Refine(String),
    Cancel,
}

/// Session state machine
#[derive(Debug)]
enum SessionState {
    Collecting,
    Generating(TaskInput),
    Reviewing(GenerationResult),
    Refining(GenerationResult, String),
    Accepted(GenerationResult),
    Cancelled,
}

/// Provider calls with prompt construction and blank-output rejection
pub struct AiService {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
    temperature: f32,
}

impl AiService {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader, config: &Config) -> Self {
        Self {
            client,
            prompts,
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
        }
    }

    /// Initial description for a collected task
    pub async fn generate_description(&self, input: &TaskInput) -> Result<Draft, GenerationError> {
        debug!(platform = %input.platform.code(), "generate_description: called");
        let prompt = self
            .prompts
            .generation_prompt(
                &input.description,
                &input.acceptance_criteria,
                &input.definition_of_done,
                input.platform,
                input.language,
            )
            .map_err(|e| GenerationError::Prompt(e.to_string()))?;
        self.complete(prompt).await
    }

    /// Revised full description for a refinement request
    pub async fn refine_description(&self, current: &str, request: &str) -> Result<Draft, GenerationError> {
        debug!(request_len = request.len(), "refine_description: called");
        let prompt = self
            .prompts
            .refinement_prompt(current, request)
            .map_err(|e| GenerationError::Prompt(e.to_string()))?;
        self.complete(prompt).await
    }

    async fn complete(&self, prompt: String) -> Result<Draft, GenerationError> {
        let request = CompletionRequest::prompt(prompt, self.max_tokens, self.temperature);
        let response = self.client.complete(request).await?;
        debug!(
            model = %self.client.model(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "complete: provider responded"
        );

        let truncated = response.stop_reason == StopReason::MaxTokens;
        if truncated {
            warn!(max_tokens = self.max_tokens, "complete: response hit the max-tokens limit");
        }

        match response.content.map(|text| text.trim().to_string()) {
            Some(text) if !text.is_empty() => Ok(Draft { text, truncated }),
            _ => {
                warn!("complete: blank response");
                Err(GenerationError::EmptyResponse)
            }
        }
    }
}

type ClientFactory = Box<dyn Fn(&Config) -> Result<Arc<dyn LlmClient>, LlmError>>;

/// One interactive ticket generation session
pub struct TaskGenerator<'a, P: Prompter, S: OutputSink> {
    prompter: &'a mut P,
    sink: &'a mut S,
    config: &'a ConfigStore,
    prompts: Option<PromptLoader>,
    client_factory: ClientFactory,
}

impl<'a, P: Prompter, S: OutputSink> TaskGenerator<'a, P, S> {
    pub fn new(prompter: &'a mut P, sink: &'a mut S, config: &'a ConfigStore) -> Self {
        Self {
            prompter,
            sink,
            config,
            prompts: None,
            client_factory: Box::new(create_client),
        }
    }

    /// Use a fixed client instead of building one from the configuration
    pub fn with_client(mut self, client: Arc<dyn LlmClient>) -> Self {
        self.client_factory = Box::new(move |_: &Config| Ok(client.clone()));
        self
    }

    pub fn with_prompts(mut self, prompts: PromptLoader) -> Self {
        self.prompts = Some(prompts);
        self
    }

    /// Run the session; true only when a description was accepted
    ///
    /// Expected outcomes (cancellation, provider failure, incomplete
    /// configuration) are reported to the user and yield false.
    pub async fn generate_task(self) -> bool {
        self.run().await.is_some()
    }

    /// Run the session, returning the accepted description
    pub async fn run(mut self) -> Option<GenerationResult> {
        debug!("run: called");
        let config = self.config;

        if !config.is_configured() {
            info!("run: configuration incomplete");
            self.prompter.error("❌ Configuration is incomplete.");
            self.prompter
                .hint("Run `tkp config` to set your AI provider, API key and model.");
            return None;
        }

        let client = match (self.client_factory)(config.config()) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "run: could not create client");
                self.report_error("❌ Could not set up the AI provider", &GenerationError::Provider(e));
                return None;
            }
        };
        let prompts = self.prompts.take().unwrap_or_else(PromptLoader::with_default_dir);
        let service = AiService::new(client, prompts, config.config());

        let mut state = SessionState::Collecting;
        loop {
            debug!(?state, "run: state");
            state = match state {
                SessionState::Collecting => {
                    match TaskDataCollector::new(&mut *self.prompter, config).collect_task_data() {
                        Prompt::Value(input) => SessionState::Generating(input),
                        Prompt::Cancelled => SessionState::Cancelled,
                    }
                }
                SessionState::Generating(input) => {
                    self.prompter.hint("🤖 Generating task description...");
                    match service.generate_description(&input).await {
                        Ok(draft) => {
                            self.note_truncation(&draft);
                            SessionState::Reviewing(GenerationResult {
                                text: draft.text,
                                revision_count: 0,
                            })
                        }
                        Err(e) => {
                            warn!(error = %e, "run: generation failed");
                            self.report_error("❌ Error generating description", &e);
                            SessionState::Cancelled
                        }
                    }
                }
                SessionState::Reviewing(result) => {
                    self.sink.display(&result.text);
                    match self.review() {
                        UserDecision::Accept => SessionState::Accepted(result),
                        UserDecision::Refine(request) => SessionState::Refining(result, request),
                        UserDecision::Cancel => SessionState::Cancelled,
                    }
                }
                SessionState::Refining(result, request) => {
                    self.prompter.hint("🔄 Refining description...");
                    match service.refine_description(&result.text, &request).await {
                        Ok(draft) => {
                            info!(revision = result.revision_count + 1, "run: refined");
                            self.note_truncation(&draft);
                            SessionState::Reviewing(GenerationResult {
                                text: draft.text,
                                revision_count: result.revision_count + 1,
                            })
                        }
                        Err(e) => {
                            warn!(error = %e, "run: refinement failed, keeping previous text");
                            self.report_error("❌ Error refining description", &e);
                            SessionState::Reviewing(result)
                        }
                    }
                }
                SessionState::Accepted(result) => {
                    info!(revisions = result.revision_count, "run: accepted");
                    if self.sink.copy_to_clipboard(&result.text) {
                        self.prompter.success("✅ Description copied to clipboard!");
                    } else {
                        self.prompter
                            .warn("⚠️  Could not access the clipboard. Copy the description shown above.");
                    }
                    return Some(result);
                }
                SessionState::Cancelled => {
                    info!("run: cancelled");
                    self.prompter.warn("❌ Task generation cancelled.");
                    return None;
                }
            };
        }
    }

    /// Ask what to do with the current text
    ///
    /// A blank or cancelled refinement request asks again.
    fn review(&mut self) -> UserDecision {
        loop {
            let options = [ACCEPT, REFINE, CANCEL];
            let choice = match self.prompter.select("What would you like to do?", &options, 0) {
                Prompt::Value(choice) => choice,
                Prompt::Cancelled => return UserDecision::Cancel,
            };

            match choice {
                0 => return UserDecision::Accept,
                1 => match self.prompter.line("How should the description change?") {
                    Prompt::Value(request) if !request.trim().is_empty() => {
                        return UserDecision::Refine(request.trim().to_string());
                    }
                    Prompt::Value(_) => self.prompter.warn("No changes requested."),
                    Prompt::Cancelled => debug!("review: refinement request cancelled"),
                },
                _ => return UserDecision::Cancel,
            }
        }
    }

    fn note_truncation(&mut self, draft: &Draft) {
        if draft.truncated {
            self.prompter
                .warn("⚠️  The description reached the max-tokens limit and may be cut off.");
            self.prompter
                .hint("Raise max-tokens in the config file, or ask for a shorter description.");
        }
    }

    fn report_error(&mut self, context: &str, error: &GenerationError) {
        self.prompter.error(&format!("{}: {}", context, error));
        if let Some(hint) = error.hint() {
            self.prompter.hint(hint);
        }
    }
}
