//! Display-name <-> code tables for providers, languages and platforms,
//! plus the curated model list offered by the configuration wizard.

use std::fmt;

use tracing::debug;

/// Ordered table of `(display name, code)` pairs
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    entries: &'static [(&'static str, &'static str)],
}

impl Catalog {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Display names in table order
    pub fn display_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(display, _)| *display).collect()
    }

    /// Display name for a code; unknown codes are echoed back
    pub fn display_for<'a>(&self, code: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(display, _)| *display)
            .unwrap_or(code)
    }

    /// Position of a code in the table
    pub fn index_of_code(&self, code: &str) -> Option<usize> {
        self.entries.iter().position(|(_, c)| *c == code)
    }

    /// Code at a table position
    pub fn code_at(&self, index: usize) -> Option<&'static str> {
        self.entries.get(index).map(|(_, code)| *code)
    }
}

pub const PROVIDERS: Catalog = Catalog::new(&[
    ("OpenAI", "openai"),
    ("Anthropic", "anthropic"),
    ("Google (Gemini)", "gemini"),
    ("OpenRouter", "openrouter"),
]);

pub const LANGUAGES: Catalog = Catalog::new(&[("English", "en"), ("Español", "es")]);

pub const PLATFORMS: Catalog = Catalog::new(&[("GitHub", "github"), ("Jira", "jira")]);

/// Ticket platform the description is formatted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    GitHub,
    Jira,
}

impl Platform {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "github" => Some(Self::GitHub),
            "jira" => Some(Self::Jira),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Jira => "jira",
        }
    }

    pub fn display_name(&self) -> &'static str {
        PLATFORMS.display_for(self.code())
    }

    /// Name of the prompt template holding this platform's structure
    pub fn format_template(&self) -> &'static str {
        match self {
            Self::GitHub => "format-github",
            Self::Jira => "format-jira",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Language the description is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" => Some(Self::English),
            "es" => Some(Self::Spanish),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
        }
    }

    pub fn display_name(&self) -> &'static str {
        LANGUAGES.display_for(self.code())
    }

    /// Language name as written in a prompt
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Menu entry that switches the wizard to free-form model entry
pub const CUSTOM_MODEL: &str = "🔧 Specify custom model";

/// Models offered for a provider, newest first, followed by [`CUSTOM_MODEL`]
pub fn models_for(provider: &str) -> Vec<&'static str> {
    debug!(%provider, "models_for: called");
    let models: &[&'static str] = match provider {
        "openai" => &[
            "gpt-4o",
            "gpt-4o-mini",
            "gpt-4.1",
            "gpt-4.1-mini",
            "gpt-4.1-nano",
            "gpt-4-turbo",
            "gpt-4",
            "gpt-3.5-turbo",
            "o3-mini",
            "o1-mini",
        ],
        "anthropic" => &[
            "claude-sonnet-4-20250514",
            "claude-opus-4-20250514",
            "claude-3-7-sonnet-latest",
            "claude-3-5-sonnet-latest",
            "claude-3-5-haiku-latest",
            "claude-3-opus-latest",
            "claude-3-haiku-20240307",
        ],
        "gemini" => &[
            "gemini-2.5-pro",
            "gemini-2.5-flash",
            "gemini-2.0-flash",
            "gemini-2.0-flash-lite",
            "gemini-1.5-pro",
            "gemini-1.5-flash",
        ],
        "openrouter" => &[
            "anthropic/claude-3.5-sonnet",
            "anthropic/claude-3.5-haiku",
            "openai/gpt-4o",
            "openai/gpt-4o-mini",
            "google/gemini-pro-1.5",
            "meta-llama/llama-3.1-8b-instruct",
        ],
        _ => &[],
    };

    let mut list: Vec<&'static str> = models.iter().take(15).copied().collect();
    list.push(CUSTOM_MODEL);
    list
}
