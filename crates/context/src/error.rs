use thiserror::Error;

/// Result type for context-builder operations
pub type Result<T> = std::result::Result<T, ContextError>;

/// Errors that can occur while configuring the context builder.
///
/// Building a context itself never fails: empty inputs, unknown languages
/// and exhausted budgets all degrade to a valid (possibly truncated) result.
#[derive(Error, Debug)]
pub enum ContextError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
