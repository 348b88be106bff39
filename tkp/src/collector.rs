//! Task data collection
//!
//! Walks the user through description, platform, language, acceptance
//! criteria and definition of done. Any cancelled step abandons the whole
//! collection.

use tracing::{debug, info};

use crate::ask;
use crate::catalog::{LANGUAGES, Language, PLATFORMS, Platform};
use crate::config::ConfigStore;
use crate::files::{ListKind, read_lines, validate_file_path, validate_optional_path};
use crate::terminal::{Prompt, Prompter};

/// Line that ends multi-line and list input (case-insensitive)
pub const DONE_KEYWORD: &str = "DONE";

const ENTER_MANUALLY: &str = "📝 Enter manually";
const LOAD_FROM_FILE: &str = "📁 Load from file";

/// Everything needed to generate one ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    /// Never blank
    pub description: String,
    pub platform: Platform,
    pub language: Language,
    pub acceptance_criteria: Vec<String>,
    pub definition_of_done: Vec<String>,
}

fn is_done(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(DONE_KEYWORD)
}

impl ListKind {
    fn skip_label(&self) -> &'static str {
        match self {
            Self::AcceptanceCriteria => "⏭️  Skip (no criteria)",
            Self::DefinitionOfDone => "⏭️  Skip (no items)",
        }
    }

    fn item_label(&self) -> &'static str {
        match self {
            Self::AcceptanceCriteria => "Criterion",
            Self::DefinitionOfDone => "Item",
        }
    }
}

/// Interactive collector backed by a [`Prompter`] and the user's defaults
pub struct TaskDataCollector<'a, P: Prompter> {
    prompter: &'a mut P,
    config: &'a ConfigStore,
}

impl<'a, P: Prompter> TaskDataCollector<'a, P> {
    pub fn new(prompter: &'a mut P, config: &'a ConfigStore) -> Self {
        Self { prompter, config }
    }

    /// Collect a complete [`TaskInput`]
    pub fn collect_task_data(&mut self) -> Prompt<TaskInput> {
        debug!("collect_task_data: called");
        let config = self.config;
        let description = ask!(self.collect_task_description());
        let platform = ask!(self.collect_platform());
        let language = ask!(self.collect_language());
        let acceptance_criteria = ask!(self.collect_list(ListKind::AcceptanceCriteria, config.ac_path()));
        let definition_of_done = ask!(self.collect_list(ListKind::DefinitionOfDone, config.dod_path()));

        info!(
            platform = %platform.code(),
            language = %language.code(),
            ac_count = acceptance_criteria.len(),
            dod_count = definition_of_done.len(),
            "collect_task_data: collected task input"
        );
        Prompt::Value(TaskInput {
            description,
            platform,
            language,
            acceptance_criteria,
            definition_of_done,
        })
    }

    /// Multi-line description ending with a `DONE` line
    ///
    /// Restarts from scratch while the collected text is blank.
    pub fn collect_task_description(&mut self) -> Prompt<String> {
        debug!("collect_task_description: called");
        self.prompter.heading("📝 Task Description");
        self.prompter.hint(&format!(
            "Describe the task. Type '{}' on a new line when finished.",
            DONE_KEYWORD
        ));

        loop {
            let mut lines = Vec::new();
            loop {
                let line = ask!(self.prompter.line(">"));
                if is_done(&line) {
                    break;
                }
                lines.push(line);
            }

            let description = lines.join("\n").trim().to_string();
            if !description.is_empty() {
                debug!(len = description.len(), "collect_task_description: got description");
                return Prompt::Value(description);
            }

            debug!("collect_task_description: empty description, restarting");
            self.prompter.error("Task description cannot be empty");
        }
    }

    /// Platform select, preselecting the configured default
    pub fn collect_platform(&mut self) -> Prompt<Platform> {
        let default = PLATFORMS.index_of_code(self.config.platform()).unwrap_or(0);
        let index = ask!(self.prompter.select("Select platform:", &PLATFORMS.display_names(), default));
        PLATFORMS.code_at(index).and_then(Platform::from_code).into()
    }

    /// Output language select, preselecting the configured default
    pub fn collect_language(&mut self) -> Prompt<Language> {
        let default = LANGUAGES.index_of_code(self.config.language()).unwrap_or(0);
        let index = ask!(self.prompter.select("Select output language:", &LANGUAGES.display_names(), default));
        LANGUAGES.code_at(index).and_then(Language::from_code).into()
    }

    /// Acceptance criteria or definition of done
    ///
    /// Offers the configured default file first when it points at a real
    /// file, then the manual / file / skip menu.
    pub fn collect_list(&mut self, kind: ListKind, default_path: &str) -> Prompt<Vec<String>> {
        debug!(?kind, %default_path, "collect_list: called");
        self.prompter.heading(&format!("📋 {}", kind.title()));

        if validate_file_path(default_path) {
            let question = format!("Use default {} file ({})?", kind.title(), default_path);
            if ask!(self.prompter.confirm(&question, true)) {
                let items = read_lines(default_path);
                info!(count = items.len(), "collect_list: loaded default file");
                self.report_loaded(items.len());
                return Prompt::Value(items);
            }
        } else if !default_path.trim().is_empty() {
            debug!(%default_path, "collect_list: default file is not usable");
        }

        loop {
            let options = [ENTER_MANUALLY, LOAD_FROM_FILE, kind.skip_label()];
            let question = format!("How do you want to provide the {}?", kind.title());
            match ask!(self.prompter.select(&question, &options, 0)) {
                0 => return self.collect_manual_list(kind),
                1 => {
                    if let Some(items) = ask!(self.collect_list_from_file()) {
                        return Prompt::Value(items);
                    }
                }
                _ => return Prompt::Value(Vec::new()),
            }
        }
    }

    /// One item per line until `DONE`; blank lines are ignored
    fn collect_manual_list(&mut self, kind: ListKind) -> Prompt<Vec<String>> {
        self.prompter.hint(&format!(
            "Enter one item per line. Type '{}' when finished.",
            DONE_KEYWORD
        ));

        let mut items = Vec::new();
        loop {
            let line = ask!(self.prompter.line(&format!("{} {}:", kind.item_label(), items.len() + 1)));
            if is_done(&line) {
                break;
            }
            let item = line.trim();
            if !item.is_empty() {
                items.push(item.to_string());
            }
        }

        debug!(count = items.len(), "collect_manual_list: done");
        Prompt::Value(items)
    }

    /// Ask for a file path; `None` when the user leaves it blank to go back
    fn collect_list_from_file(&mut self) -> Prompt<Option<Vec<String>>> {
        loop {
            let path = ask!(self.prompter.line("File path (leave empty to go back):"));
            if path.trim().is_empty() {
                return Prompt::Value(None);
            }

            if let Err(issue) = validate_optional_path(&path) {
                self.prompter.error(&issue.to_string());
                continue;
            }

            let items = read_lines(&path);
            self.report_loaded(items.len());
            return Prompt::Value(Some(items));
        }
    }

    fn report_loaded(&mut self, count: usize) {
        if count == 0 {
            self.prompter.warn("The file has no items");
        } else {
            self.prompter.success(&format!("✅ Loaded {} items", count));
        }
    }
}
