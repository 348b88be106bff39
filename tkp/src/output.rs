//! Final destination of an accepted description

use colored::Colorize;
use tracing::{debug, warn};

/// Receives the accepted description
pub trait OutputSink {
    /// Copy text to the clipboard; false when the clipboard is unavailable
    fn copy_to_clipboard(&mut self, text: &str) -> bool;

    /// Show text to the user
    fn display(&mut self, text: &str);
}

/// System clipboard plus stdout
#[derive(Debug, Default)]
pub struct ClipboardSink;

impl OutputSink for ClipboardSink {
    fn copy_to_clipboard(&mut self, text: &str) -> bool {
        debug!(text_len = text.len(), "copy_to_clipboard: called");
        let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string()));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "copy_to_clipboard: clipboard unavailable");
                false
            }
        }
    }

    fn display(&mut self, text: &str) {
        println!();
        println!("{}", "─".repeat(60).dimmed());
        println!("{}", text);
        println!("{}", "─".repeat(60).dimmed());
        println!();
    }
}
