//! Interactive terminal prompts
//!
//! Every interactive step goes through the [`Prompter`] trait. Each prompt
//! returns a [`Prompt`]: either the user's answer or [`Prompt::Cancelled`]
//! when the user aborted (Ctrl-C, Ctrl-D/end of input, or an explicit
//! cancel). Callers unwind on cancellation with [`ask!`](crate::ask).

mod console;

pub use console::ConsolePrompter;

/// Outcome of a single interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt<T> {
    Value(T),
    Cancelled,
}

impl<T> From<Option<T>> for Prompt<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Prompt::Value(v),
            None => Prompt::Cancelled,
        }
    }
}

/// Unwrap a [`Prompt`] or return `Prompt::Cancelled` from the enclosing function
#[macro_export]
macro_rules! ask {
    ($prompt:expr) => {
        match $prompt {
            $crate::terminal::Prompt::Value(value) => value,
            $crate::terminal::Prompt::Cancelled => return $crate::terminal::Prompt::Cancelled,
        }
    };
}

/// How a line of output is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Hint,
    Success,
    Warning,
    Error,
}

/// Reusable prompt-with-cancellation primitive
pub trait Prompter {
    /// Read one raw line, pre-filled with `initial`
    fn line_with_initial(&mut self, message: &str, initial: &str) -> Prompt<String>;

    /// Read one line without echoing it
    fn secret(&mut self, message: &str) -> Prompt<String>;

    /// Pick one of `options`; returns its index
    fn select(&mut self, message: &str, options: &[&str], default: usize) -> Prompt<usize>;

    /// Yes/no question
    fn confirm(&mut self, message: &str, default: bool) -> Prompt<bool>;

    /// Print a line of output
    fn emit(&mut self, tone: Tone, text: &str);

    fn line(&mut self, message: &str) -> Prompt<String> {
        self.line_with_initial(message, "")
    }

    fn say(&mut self, text: &str) {
        self.emit(Tone::Plain, text);
    }

    fn heading(&mut self, text: &str) {
        self.emit(Tone::Heading, text);
    }

    fn hint(&mut self, text: &str) {
        self.emit(Tone::Hint, text);
    }

    fn success(&mut self, text: &str) {
        self.emit(Tone::Success, text);
    }

    fn warn(&mut self, text: &str) {
        self.emit(Tone::Warning, text);
    }

    fn error(&mut self, text: &str) {
        self.emit(Tone::Error, text);
    }
}

#[cfg(test)]
pub mod mock {
    //! Scripted prompter for unit tests

    use std::collections::VecDeque;

    use super::*;

    /// One scripted answer
    #[derive(Debug, Clone)]
    pub enum Answer {
        Line(String),
        Choice(usize),
        Yes,
        No,
        Cancel,
    }

    /// Replays answers in order and records everything printed
    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<Answer>,
        pub output: Vec<(Tone, String)>,
        pub asked: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                ..Default::default()
            }
        }

        /// Script of plain lines
        pub fn lines(lines: &[&str]) -> Self {
            Self::new(lines.iter().map(|l| Answer::Line(l.to_string())).collect())
        }

        pub fn remaining(&self) -> usize {
            self.answers.len()
        }

        pub fn printed(&self, tone: Tone, needle: &str) -> bool {
            self.output.iter().any(|(t, text)| *t == tone && text.contains(needle))
        }

        pub fn printed_any(&self, needle: &str) -> bool {
            self.output.iter().any(|(_, text)| text.contains(needle))
        }

        fn next(&mut self, message: &str) -> Answer {
            self.asked.push(message.to_string());
            // Running out of script behaves like end of input
            self.answers.pop_front().unwrap_or(Answer::Cancel)
        }
    }

    impl Prompter for ScriptedPrompter {
        fn line_with_initial(&mut self, message: &str, initial: &str) -> Prompt<String> {
            match self.next(message) {
                Answer::Line(line) if line.is_empty() && !initial.is_empty() => Prompt::Value(initial.to_string()),
                Answer::Line(line) => Prompt::Value(line),
                Answer::Cancel => Prompt::Cancelled,
                other => panic!("expected a line for '{message}', script has {other:?}"),
            }
        }

        fn secret(&mut self, message: &str) -> Prompt<String> {
            self.line(message)
        }

        fn select(&mut self, message: &str, options: &[&str], default: usize) -> Prompt<usize> {
            match self.next(message) {
                Answer::Choice(index) => {
                    assert!(index < options.len(), "choice {index} out of range for '{message}'");
                    Prompt::Value(index)
                }
                Answer::Line(line) if line.is_empty() => Prompt::Value(default),
                Answer::Line(line) => {
                    let index = options
                        .iter()
                        .position(|o| *o == line)
                        .unwrap_or_else(|| panic!("'{line}' is not an option for '{message}'"));
                    Prompt::Value(index)
                }
                Answer::Cancel => Prompt::Cancelled,
                other => panic!("expected a choice for '{message}', script has {other:?}"),
            }
        }

        fn confirm(&mut self, message: &str, default: bool) -> Prompt<bool> {
            match self.next(message) {
                Answer::Yes => Prompt::Value(true),
                Answer::No => Prompt::Value(false),
                Answer::Line(line) if line.is_empty() => Prompt::Value(default),
                Answer::Cancel => Prompt::Cancelled,
                other => panic!("expected yes/no for '{message}', script has {other:?}"),
            }
        }

        fn emit(&mut self, tone: Tone, text: &str) {
            self.output.push((tone, text.to_string()));
        }
    }
}
