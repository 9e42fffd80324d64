use crate::error::{ContextError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for context building behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContextConfig {
    /// Total token budget for the rendered prompt
    pub max_context_tokens: usize,

    /// Tokens held back for the model's response
    pub reserve_tokens_for_response: usize,

    /// Render full file contents (false = paths only)
    pub include_file_contents: bool,

    /// Boost the caller-designated active file
    pub prioritize_active_file: bool,

    /// Reserved: the recent-message scan already covers recency, so this
    /// flag is accepted but not yet a distinct heuristic
    pub prioritize_recent_files: bool,

    /// Hard cap on the number of files considered for packing
    pub max_files_in_context: usize,

    /// Additive relevance weights
    pub weights: RelevanceWeights,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_context_tokens: 100_000,
            reserve_tokens_for_response: 4_000,
            include_file_contents: true,
            prioritize_active_file: true,
            prioritize_recent_files: true,
            max_files_in_context: 50,
            weights: RelevanceWeights::default(),
        }
    }
}

impl ContextConfig {
    /// Tokens actually available to the packing loop.
    #[must_use]
    pub fn available_tokens(&self) -> usize {
        self.max_context_tokens
            .saturating_sub(self.reserve_tokens_for_response)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.reserve_tokens_for_response >= self.max_context_tokens {
            return Err(ContextError::InvalidConfig(format!(
                "reserve_tokens_for_response ({}) must be below max_context_tokens ({})",
                self.reserve_tokens_for_response, self.max_context_tokens
            )));
        }

        if self.max_files_in_context == 0 {
            return Err(ContextError::InvalidConfig(
                "max_files_in_context must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Additive weights for file relevance scoring.
///
/// The defaults are tuned empirically; keep them stable unless you also
/// retune the expectations of whatever consumes the resulting ordering.
/// Scores only order files for packing, they never exclude a file outright.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelevanceWeights {
    /// The file the user is currently editing
    pub active_file: i64,

    /// Entry-point file names (index.tsx, package.json, ...)
    pub entry_point: i64,

    /// Path mentioned in the recent conversation
    pub mentioned_in_chat: i64,

    /// Path under a preferred source directory (src/, app/, ...)
    pub preferred_directory: i64,

    /// Source-code file extension (.ts, .tsx, ...)
    pub source_extension: i64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            active_file: 100,
            entry_point: 30,
            mentioned_in_chat: 50,
            preferred_directory: 10,
            source_extension: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        assert!(ContextConfig::default().validate().is_ok());
    }

    #[test]
    fn reserve_must_leave_room() {
        let config = ContextConfig {
            max_context_tokens: 1_000,
            reserve_tokens_for_response: 1_000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_file_cap_rejected() {
        let config = ContextConfig {
            max_files_in_context: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn available_tokens_saturates() {
        let config = ContextConfig {
            max_context_tokens: 100,
            reserve_tokens_for_response: 4_000,
            ..Default::default()
        };
        assert_eq!(config.available_tokens(), 0);
    }

    #[test]
    fn default_weights_match_tuned_constants() {
        let weights = RelevanceWeights::default();
        assert_eq!(weights.active_file, 100);
        assert_eq!(weights.entry_point, 30);
        assert_eq!(weights.mentioned_in_chat, 50);
        assert_eq!(weights.preferred_directory, 10);
        assert_eq!(weights.source_extension, 15);
    }
}
