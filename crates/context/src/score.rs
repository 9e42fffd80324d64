//! Additive relevance scoring for context packing.
//!
//! Scores only order files; they never act as a hard filter beyond the
//! file-count cap applied by the builder.

use crate::config::ContextConfig;
use appgen_protocol::{FileRecord, Message};
use once_cell::sync::Lazy;
use regex::Regex;

/// How many trailing messages participate in mention scoring.
const RECENT_MESSAGE_WINDOW: usize = 5;

/// Directory segments that usually hold application source.
const PREFERRED_DIRS: &[&str] = &["src/", "app/", "components/", "lib/", "pages/", "hooks/"];

/// Extensions that mark a file as application source.
const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".vue", ".svelte"];

/// Base names that typically anchor a project (entry points and manifests).
static ENTRY_POINT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(?:index|main|app|page|layout)\.[jt]sx?$",
        r"^package\.json$",
        r"^tsconfig\.json$",
        r"^next\.config\.[cm]?[jt]s$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static entry-point pattern"))
    .collect()
});

/// Lower-cased concatenation of the last [`RECENT_MESSAGE_WINDOW`] messages.
#[must_use]
pub(crate) fn recent_message_blob(messages: &[Message]) -> String {
    let start = messages.len().saturating_sub(RECENT_MESSAGE_WINDOW);
    messages[start..]
        .iter()
        .map(|message| message.content.to_lowercase())
        .collect()
}

/// Additive relevance score for one file.
#[must_use]
pub(crate) fn relevance_score(
    file: &FileRecord,
    active_file: Option<&str>,
    chat_blob: &str,
    config: &ContextConfig,
) -> i64 {
    let weights = &config.weights;
    let mut score = 0;

    if config.prioritize_active_file && active_file == Some(file.path.as_str()) {
        score += weights.active_file;
    }

    if is_entry_point(file.base_name()) {
        score += weights.entry_point;
    }

    if !chat_blob.is_empty() && chat_blob.contains(&file.path.to_lowercase()) {
        score += weights.mentioned_in_chat;
    }

    if PREFERRED_DIRS.iter().any(|dir| file.path.contains(dir)) {
        score += weights.preferred_directory;
    }

    if SOURCE_EXTENSIONS.iter().any(|ext| file.path.ends_with(ext)) {
        score += weights.source_extension;
    }

    score
}

fn is_entry_point(base: &str) -> bool {
    ENTRY_POINT_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(base))
}
