use appgen_protocol::FileRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a file changed between two snapshots
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Unchanged,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Unchanged => "unchanged",
        };
        f.write_str(label)
    }
}

/// Direction of one aligned line in a modified file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineChangeKind {
    Added,
    Removed,
    Unchanged,
}

/// One row of the line-by-line comparison. `line_number` is 1-based and
/// refers to the aligned index, not a post-edit position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineChange {
    pub line_number: usize,
    pub kind: LineChangeKind,
    pub content: String,
}

/// Per-file classification. `changes` is populated only for `Modified`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffEntry {
    pub path: String,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<LineChange>,
}

/// Full classification of the union of two snapshots.
///
/// Invariant: `added + modified + deleted + unchanged == total_files ==
/// diffs.len()`, and `total_files` equals the size of the path union.
/// `diffs` is ordered by path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffReport {
    pub diffs: Vec<DiffEntry>,
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub total_files: usize,
}

impl DiffReport {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.added + self.modified + self.deleted > 0
    }

    /// Entries of one kind, in report order.
    pub fn entries_of(&self, kind: ChangeKind) -> impl Iterator<Item = &DiffEntry> {
        self.diffs.iter().filter(move |entry| entry.kind == kind)
    }
}

/// Counts for an [`IncrementalUpdate`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateStats {
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub total: usize,
}

/// The write/delete/leave-alone plan derived from a [`DiffReport`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncrementalUpdate {
    pub files_to_update: Vec<FileRecord>,
    pub files_to_delete: Vec<String>,
    pub unchanged_files: Vec<FileRecord>,
    pub stats: UpdateStats,
}
