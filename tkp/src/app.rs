//! Top-level flows behind the CLI commands

use tracing::{debug, info};

use crate::config::ConfigStore;
use crate::generator::TaskGenerator;
use crate::output::OutputSink;
use crate::prompts::PromptLoader;
use crate::terminal::Prompter;
use crate::wizard::ConfigWizard;

/// Initial setup or configuration update
///
/// Without a configuration file the first-run wizard runs either way.
/// With one, only an explicit update (`tkp config`) does anything.
pub fn run_config<P: Prompter>(prompter: &mut P, store: &mut ConfigStore, is_update: bool) -> bool {
    debug!(%is_update, first_run = store.is_first_run(), "run_config: called");

    if store.is_first_run() {
        if is_update {
            prompter.warn("No configuration found. Launching initial setup wizard...");
            prompter.say("");
        }
        return ConfigWizard::new(prompter, store).run();
    }

    if !is_update {
        return true;
    }

    ConfigWizard::new(prompter, store).run_update()
}

/// Interactive ticket generation, running first-time setup when needed
pub async fn run_task_generation<P: Prompter, S: OutputSink>(
    prompter: &mut P,
    sink: &mut S,
    store: &mut ConfigStore,
) -> bool {
    debug!("run_task_generation: called");
    if !run_config(prompter, store, false) {
        info!("run_task_generation: setup did not complete");
        return false;
    }

    TaskGenerator::new(prompter, sink, store)
        .with_prompts(PromptLoader::with_default_dir())
        .generate_task()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::output::mock::RecordingSink;
    use crate::terminal::Tone;
    use crate::terminal::mock::{Answer, ScriptedPrompter};
    use tempfile::TempDir;

    #[test]
    fn test_update_without_config_launches_setup() {
        let dir = TempDir::new().unwrap();
        let mut store = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap();
        let mut prompter = ScriptedPrompter::new(vec![Answer::Cancel]);

        let done = run_config(&mut prompter, &mut store, true);

        assert!(!done);
        assert!(prompter.printed(Tone::Warning, "No configuration found. Launching initial setup wizard"));
        assert!(prompter.printed(Tone::Warning, "Configuration cancelled."));
    }

    #[test]
    fn test_existing_config_without_update_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let mut store = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap();
        store.save(Config::default()).unwrap();
        let mut prompter = ScriptedPrompter::new(vec![]);

        assert!(run_config(&mut prompter, &mut store, false));
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn test_existing_config_update_runs_update_wizard() {
        let dir = TempDir::new().unwrap();
        let mut store = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap();
        store.save(Config::default()).unwrap();
        let mut prompter = ScriptedPrompter::new(vec![Answer::Line("❌ Cancel".to_string())]);

        assert!(!run_config(&mut prompter, &mut store, true));
        assert!(prompter.printed_any("Current Configuration:"));
    }

    #[tokio::test]
    async fn test_generation_stops_when_setup_is_cancelled() {
        let dir = TempDir::new().unwrap();
        let mut store = ConfigStore::open(Some(&dir.path().join("config.yml"))).unwrap();
        let mut prompter = ScriptedPrompter::new(vec![Answer::Cancel]);
        let mut sink = RecordingSink::new();

        let accepted = run_task_generation(&mut prompter, &mut sink, &mut store).await;

        assert!(!accepted);
        assert!(sink.copies.is_empty());
        assert!(!dir.path().join("config.yml").exists());
    }
}
