//! Schema Version Manager: migrates a versioned application-description
//! document across schema revisions, validates structural compatibility, and
//! strips version bookkeeping for export.
//!
//! Documents are open-ended JSON objects (`serde_json::Value`). Migration and
//! validation never fail with an error: unsupported versions, missing fields
//! and unreachable paths are all reported as data so the calling pipeline can
//! react instead of aborting.

mod error;
mod manager;
mod migrations;
mod version;

pub use error::{Result, SchemaError};
pub use manager::{
    create_versioned_schema, export_schema, migrate, validate_compatibility, version_diff,
    version_info, CompatibilityResult, MigrationResult, VersionDiff, VersionDiffEntry, VersionInfo,
};
pub use version::{
    is_version_supported, SchemaVersion, CURRENT_SCHEMA_VERSION, MIN_SUPPORTED_VERSION,
};
