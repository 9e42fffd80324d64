//! Diff Engine: classifies file changes between two project snapshots,
//! derives incremental update plans, and maps application-schema changes to
//! the project files they affect.
//!
//! All operations are pure functions; the only state is a pair of const
//! lookup tables.

mod engine;
mod error;
mod schema_changes;
mod types;

pub use engine::{compute_diff, format_diff_summary, incremental_update, merge_files};
pub use error::{DiffError, Result};
pub use schema_changes::{affected_files, detect_schema_changes, SchemaField};
pub use types::{
    ChangeKind, DiffEntry, DiffReport, IncrementalUpdate, LineChange, LineChangeKind, UpdateStats,
};
