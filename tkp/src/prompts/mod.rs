//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files.
//!
//! Template loading chain:
//! 1. `~/.config/ticketplease/prompts/{name}.pmt` (user override)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution. The
//! `format-*` templates are inserted as plain values and never rendered.

pub mod embedded;
mod loader;

pub use loader::{GenerateContext, PromptLoader, RefineContext};
