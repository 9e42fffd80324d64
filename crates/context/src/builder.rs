use crate::config::ContextConfig;
use crate::prompts::{FILES_SECTION_HEADER, FRAMEWORK_PREAMBLE, TRUNCATION_NOTE, VANILLA_PREAMBLE};
use crate::score::{recent_message_blob, relevance_score};
use crate::tokens::estimate_tokens;
use appgen_protocol::{FileRecord, FileSet, Message};
use serde::{Deserialize, Serialize};

/// Broad project family, detected from the full file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// Plain HTML/CSS/JS, no build step
    Vanilla,
    /// Next.js/React assumed
    Framework,
}

impl ProjectKind {
    /// Detect the project kind.
    ///
    /// Vanilla requires an `index.html`, no `package.json` and no `.tsx`
    /// file anywhere in the set; everything else is treated as a framework
    /// project. Detection always looks at the full set, not the packed
    /// subset, so the preamble cannot flip when the budget tightens.
    #[must_use]
    pub fn detect(files: &FileSet) -> Self {
        let has_index_html = files.iter().any(|file| file.base_name() == "index.html");
        let has_package_json = files.iter().any(|file| file.base_name() == "package.json");
        let has_tsx = files.paths().any(|path| path.ends_with(".tsx"));

        if has_index_html && !has_package_json && !has_tsx {
            Self::Vanilla
        } else {
            Self::Framework
        }
    }

    pub(crate) fn preamble(self) -> &'static str {
        match self {
            Self::Vanilla => VANILLA_PREAMBLE,
            Self::Framework => FRAMEWORK_PREAMBLE,
        }
    }
}

/// A file as it ended up in the rendered context.
///
/// `token_count` is the cost of the actual rendering: a file degraded to a
/// listing-only line carries the line's cost and an empty `content`, not the
/// original file body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextFile {
    pub path: String,
    pub content: String,
    pub language: String,
    pub relevance_score: i64,
    pub token_count: usize,
}

/// Result of one context build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextResult {
    pub files: Vec<ContextFile>,
    pub system_prompt: String,
    pub total_tokens: usize,
    pub truncated: bool,
}

/// Build a token-budgeted system prompt from a project file set.
///
/// Files are scored (see [`crate::RelevanceWeights`]), sorted descending with
/// ties kept in set order, capped at `max_files_in_context`, then packed
/// greedily in that order: a file that no longer fits is degraded to a
/// listing-only line if that still fits, otherwise omitted; later files are
/// still attempted either way. This is deliberately greedy-in-order, not a
/// knapsack: the ordering is the contract.
///
/// Never fails; empty inputs produce a valid prompt.
#[must_use]
pub fn build_context(
    files: &FileSet,
    messages: &[Message],
    active_file: Option<&str>,
    config: &ContextConfig,
) -> ContextResult {
    let chat_blob = recent_message_blob(messages);

    let mut scored: Vec<(i64, &FileRecord)> = files
        .iter()
        .map(|file| (relevance_score(file, active_file, &chat_blob, config), file))
        .collect();
    // Stable sort: equal scores keep the set's path order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(config.max_files_in_context);

    let preamble = ProjectKind::detect(files).preamble();
    let available = config.available_tokens();

    let mut used = estimate_tokens(preamble) + estimate_tokens(FILES_SECTION_HEADER);
    let mut truncated = false;
    let mut included: Vec<ContextFile> = Vec::with_capacity(scored.len());
    let mut sections = String::new();

    for (score, file) in scored {
        let rendering = render_file(file, config.include_file_contents);
        let cost = estimate_tokens(&rendering);
        if used + cost <= available {
            used += cost;
            sections.push_str(&rendering);
            included.push(context_file(file, config.include_file_contents, score, cost));
            continue;
        }

        truncated = true;
        if config.include_file_contents {
            let listing = render_listing(file);
            let listing_cost = estimate_tokens(&listing);
            if used + listing_cost <= available {
                used += listing_cost;
                sections.push_str(&listing);
                included.push(context_file(file, false, score, listing_cost));
                log::debug!("context budget: kept {} as listing only", file.path);
                continue;
            }
        }
        log::debug!("context budget: omitted {}", file.path);
    }

    let mut system_prompt =
        String::with_capacity(preamble.len() + FILES_SECTION_HEADER.len() + sections.len());
    system_prompt.push_str(preamble);
    system_prompt.push_str(FILES_SECTION_HEADER);
    system_prompt.push_str(&sections);
    if truncated {
        system_prompt.push_str(TRUNCATION_NOTE);
    }

    ContextResult {
        files: included,
        system_prompt,
        total_tokens: used,
        truncated,
    }
}

fn context_file(file: &FileRecord, with_content: bool, score: i64, cost: usize) -> ContextFile {
    ContextFile {
        path: file.path.clone(),
        content: if with_content {
            file.content.clone()
        } else {
            String::new()
        },
        language: file.language.clone(),
        relevance_score: score,
        token_count: cost,
    }
}

fn render_file(file: &FileRecord, include_contents: bool) -> String {
    if include_contents {
        format!(
            "### {}\n```{}\n{}\n```\n\n",
            file.path, file.language, file.content
        )
    } else {
        render_listing(file)
    }
}

fn render_listing(file: &FileRecord) -> String {
    format!("- {}\n", file.path)
}
