//! Terminal-backed prompter

use std::io::{self, IsTerminal, Write};

use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use super::{Prompt, Prompter, Tone};

/// Prompter reading from the terminal with line editing
pub struct ConsolePrompter {
    editor: DefaultEditor,
}

impl ConsolePrompter {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self { editor })
    }

    /// Read a line; Ctrl-C and Ctrl-D both cancel
    fn read(&mut self, prompt: &str, initial: &str) -> Prompt<String> {
        let readline = if initial.is_empty() {
            self.editor.readline(prompt)
        } else {
            self.editor.readline_with_initial(prompt, (initial, ""))
        };

        match readline {
            Ok(line) => Prompt::Value(line),
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                Prompt::Cancelled
            }
            Err(ReadlineError::Eof) => {
                println!();
                println!("{}", "Input cancelled".yellow());
                Prompt::Cancelled
            }
            Err(err) => {
                warn!(error = %err, "read: readline error");
                Prompt::Cancelled
            }
        }
    }

    fn question(message: &str) -> String {
        format!("{} {} ", "?".bright_green(), message.bold())
    }
}

impl Prompter for ConsolePrompter {
    fn line_with_initial(&mut self, message: &str, initial: &str) -> Prompt<String> {
        self.read(&Self::question(message), initial)
    }

    fn secret(&mut self, message: &str) -> Prompt<String> {
        if !io::stdin().is_terminal() {
            debug!("secret: stdin is not a terminal, reading plain line");
            return self.read(&Self::question(message), "");
        }

        match read_masked(&Self::question(message)) {
            Ok(Some(value)) => Prompt::Value(value),
            Ok(None) => Prompt::Cancelled,
            Err(e) => {
                warn!(error = %e, "secret: masked input failed");
                Prompt::Cancelled
            }
        }
    }

    fn select(&mut self, message: &str, options: &[&str], default: usize) -> Prompt<usize> {
        println!("{} {}", "?".bright_green(), message.bold());
        for (i, option) in options.iter().enumerate() {
            if i == default {
                println!("  {} {}", format!("{:>2})", i + 1).cyan(), option.bright_white());
            } else {
                println!("  {} {}", format!("{:>2})", i + 1).dimmed(), option);
            }
        }

        let prompt = format!("{} ", format!("Choose [1-{}, default {}]:", options.len(), default + 1).dimmed());
        loop {
            let answer = match self.read(&prompt, "") {
                Prompt::Value(answer) => answer,
                Prompt::Cancelled => return Prompt::Cancelled,
            };
            let answer = answer.trim();

            if answer.is_empty() {
                return Prompt::Value(default);
            }
            if let Ok(n) = answer.parse::<usize>()
                && (1..=options.len()).contains(&n)
            {
                return Prompt::Value(n - 1);
            }
            if let Some(index) = options.iter().position(|o| o.eq_ignore_ascii_case(answer)) {
                return Prompt::Value(index);
            }

            println!("{} Please enter a number between 1 and {}", "!".red(), options.len());
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Prompt<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        let prompt = format!("{}{} ", Self::question(message), hint.dimmed());
        loop {
            let answer = match self.read(&prompt, "") {
                Prompt::Value(answer) => answer,
                Prompt::Cancelled => return Prompt::Cancelled,
            };

            match answer.trim().to_lowercase().as_str() {
                "" => return Prompt::Value(default),
                "y" | "yes" | "s" | "si" | "sí" => return Prompt::Value(true),
                "n" | "no" => return Prompt::Value(false),
                _ => println!("{} Please answer yes or no", "!".red()),
            }
        }
    }

    fn emit(&mut self, tone: Tone, text: &str) {
        match tone {
            Tone::Plain => println!("{}", text),
            Tone::Heading => println!("{}", text.bright_cyan().bold()),
            Tone::Hint => println!("{}", text.dimmed()),
            Tone::Success => println!("{}", text.green()),
            Tone::Warning => println!("{}", text.yellow()),
            Tone::Error => println!("{}", text.red()),
        }
    }
}

/// Effect of one key press on the masked input buffer
#[derive(Debug, PartialEq, Eq)]
enum MaskedKey {
    Submit,
    Abort,
    Erase,
    Insert(char),
    Ignore,
}

fn masked_key(code: KeyCode, modifiers: KeyModifiers, buffer_empty: bool) -> MaskedKey {
    let control = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Enter => MaskedKey::Submit,
        KeyCode::Esc => MaskedKey::Abort,
        KeyCode::Char('c') if control => MaskedKey::Abort,
        KeyCode::Char('d') if control && buffer_empty => MaskedKey::Abort,
        KeyCode::Backspace => MaskedKey::Erase,
        // Other control chords never reach the key
        KeyCode::Char(_) if control => MaskedKey::Ignore,
        KeyCode::Char(c) => MaskedKey::Insert(c),
        _ => MaskedKey::Ignore,
    }
}

/// Read a line in raw mode, echoing `*` per character
///
/// Returns `None` on Esc, Ctrl-C, or Ctrl-D on an empty buffer.
fn read_masked(prompt: &str) -> io::Result<Option<String>> {
    struct RawModeGuard;
    impl Drop for RawModeGuard {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
        }
    }

    let mut stdout = io::stdout();
    write!(stdout, "{}", prompt)?;
    stdout.flush()?;

    enable_raw_mode()?;
    let guard = RawModeGuard;

    let mut buffer = String::new();
    let result = loop {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            match masked_key(code, modifiers, buffer.is_empty()) {
                MaskedKey::Submit => break Some(buffer),
                MaskedKey::Abort => break None,
                MaskedKey::Erase => {
                    if buffer.pop().is_some() {
                        write!(stdout, "\x08 \x08")?;
                        stdout.flush()?;
                    }
                }
                MaskedKey::Insert(c) => {
                    buffer.push(c);
                    write!(stdout, "*")?;
                    stdout.flush()?;
                }
                MaskedKey::Ignore => {}
            }
        }
    };

    drop(guard);
    println!();
    Ok(result)
}
