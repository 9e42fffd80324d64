use thiserror::Error;

/// Result type for diff operations
pub type Result<T> = std::result::Result<T, DiffError>;

/// Errors that can occur in the diff engine.
///
/// Diffing itself never fails; the only fallible surface is parsing a
/// schema-field name supplied by a caller.
#[derive(Error, Debug)]
pub enum DiffError {
    /// Unknown schema field name
    #[error("Unknown schema field: {0}")]
    UnknownSchemaField(String),
}
