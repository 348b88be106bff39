//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Initial ticket generation prompt
pub const GENERATE: &str = include_str!("../../prompts/generate.pmt");

/// Refinement prompt
pub const REFINE: &str = include_str!("../../prompts/refine.pmt");

/// GitHub Markdown structure instructions
pub const FORMAT_GITHUB: &str = include_str!("../../prompts/format-github.pmt");

/// Jira markup structure instructions
pub const FORMAT_JIRA: &str = include_str!("../../prompts/format-jira.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "generate" => Some(GENERATE),
        "refine" => Some(REFINE),
        "format-github" => Some(FORMAT_GITHUB),
        "format-jira" => Some(FORMAT_JIRA),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
