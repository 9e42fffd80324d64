use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur around schema versioning.
///
/// Migration and validation report their problems as data
/// (`MigrationResult::warnings`, `CompatibilityResult::issues`); the error
/// enum exists for caller contract violations such as parsing a version
/// string that is not a `major.minor.patch` triple.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Not a major.minor.patch integer triple
    #[error("Invalid version format: {0}")]
    InvalidVersion(String),
}
