use crate::types::{
    ChangeKind, DiffEntry, DiffReport, IncrementalUpdate, LineChange, LineChangeKind, UpdateStats,
};
use appgen_protocol::FileSet;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Classify every path in the union of `old` and `new`.
///
/// Entries come out in path order (the union is walked sorted), which keeps
/// repeated calls on the same input byte-identical.
#[must_use]
pub fn compute_diff(old: &FileSet, new: &FileSet) -> DiffReport {
    let paths: BTreeSet<&str> = old.paths().chain(new.paths()).collect();

    let mut diffs = Vec::with_capacity(paths.len());
    let (mut added, mut modified, mut deleted, mut unchanged) = (0, 0, 0, 0);

    for path in paths {
        let entry = match (old.get(path), new.get(path)) {
            (None, Some(new_file)) => {
                added += 1;
                DiffEntry {
                    path: path.to_string(),
                    kind: ChangeKind::Added,
                    old_content: None,
                    new_content: Some(new_file.content.clone()),
                    changes: Vec::new(),
                }
            }
            (Some(old_file), None) => {
                deleted += 1;
                DiffEntry {
                    path: path.to_string(),
                    kind: ChangeKind::Deleted,
                    old_content: Some(old_file.content.clone()),
                    new_content: None,
                    changes: Vec::new(),
                }
            }
            (Some(old_file), Some(new_file)) if old_file.content == new_file.content => {
                unchanged += 1;
                DiffEntry {
                    path: path.to_string(),
                    kind: ChangeKind::Unchanged,
                    old_content: None,
                    new_content: None,
                    changes: Vec::new(),
                }
            }
            (Some(old_file), Some(new_file)) => {
                modified += 1;
                DiffEntry {
                    path: path.to_string(),
                    kind: ChangeKind::Modified,
                    old_content: Some(old_file.content.clone()),
                    new_content: Some(new_file.content.clone()),
                    changes: line_changes(&old_file.content, &new_file.content),
                }
            }
            (None, None) => unreachable!("path came from the union of both sets"),
        };
        diffs.push(entry);
    }

    let total_files = diffs.len();
    log::debug!(
        "diff: {added} added, {modified} modified, {deleted} deleted, {unchanged} unchanged"
    );

    DiffReport {
        diffs,
        added,
        modified,
        deleted,
        unchanged,
        total_files,
    }
}

/// Naive index-aligned line comparison.
///
/// Both contents are split on `\n` and walked by index: differing lines emit
/// a removed row (when the old side has one) then an added row (when the new
/// side has one), both numbered `index + 1`. Known limitation: a single
/// inserted line shifts every following pair into a remove/add; there is no
/// LCS realignment. Downstream line-count expectations are built on this
/// exact behavior, so keep it.
fn line_changes(old: &str, new: &str) -> Vec<LineChange> {
    let old_lines: Vec<&str> = old.split('\n').collect();
    let new_lines: Vec<&str> = new.split('\n').collect();

    let mut changes = Vec::new();
    for index in 0..old_lines.len().max(new_lines.len()) {
        let line_number = index + 1;
        match (old_lines.get(index), new_lines.get(index)) {
            (Some(old_line), Some(new_line)) if old_line == new_line => {
                changes.push(LineChange {
                    line_number,
                    kind: LineChangeKind::Unchanged,
                    content: (*old_line).to_string(),
                });
            }
            (old_line, new_line) => {
                if let Some(removed) = old_line {
                    changes.push(LineChange {
                        line_number,
                        kind: LineChangeKind::Removed,
                        content: (*removed).to_string(),
                    });
                }
                if let Some(added) = new_line {
                    changes.push(LineChange {
                        line_number,
                        kind: LineChangeKind::Added,
                        content: (*added).to_string(),
                    });
                }
            }
        }
    }
    changes
}

/// Derive the write/delete/leave-alone plan for moving `old` to `new`.
#[must_use]
pub fn incremental_update(old: &FileSet, new: &FileSet) -> IncrementalUpdate {
    let report = compute_diff(old, new);

    let mut files_to_update = Vec::with_capacity(report.added + report.modified);
    let mut files_to_delete = Vec::with_capacity(report.deleted);
    let mut unchanged_files = Vec::with_capacity(report.unchanged);

    for entry in &report.diffs {
        match entry.kind {
            ChangeKind::Added | ChangeKind::Modified => {
                if let Some(record) = new.get(&entry.path) {
                    files_to_update.push(record.clone());
                }
            }
            ChangeKind::Deleted => files_to_delete.push(entry.path.clone()),
            ChangeKind::Unchanged => {
                if let Some(record) = old.get(&entry.path) {
                    unchanged_files.push(record.clone());
                }
            }
        }
    }

    let stats = UpdateStats {
        updated: report.added + report.modified,
        deleted: report.deleted,
        unchanged: report.unchanged,
        total: report.added + report.modified + report.deleted + report.unchanged,
    };

    IncrementalUpdate {
        files_to_update,
        files_to_delete,
        unchanged_files,
        stats,
    }
}

/// Apply an update plan to an existing file set.
///
/// Deleted paths are dropped, updated records replace or extend the rest.
/// The result is a fresh set; path uniqueness holds by construction.
#[must_use]
pub fn merge_files(existing: &FileSet, update: &IncrementalUpdate) -> FileSet {
    let mut merged = existing.clone();
    for path in &update.files_to_delete {
        merged.remove(path);
    }
    for record in &update.files_to_update {
        merged.insert(record.clone());
    }
    merged
}

/// Render a human-readable summary: the four aggregate counts, then every
/// path grouped by change kind.
#[must_use]
pub fn format_diff_summary(report: &DiffReport) -> String {
    let mut out = String::new();
    out.push_str("File changes:\n");
    let _ = writeln!(out, "  Added: {}", report.added);
    let _ = writeln!(out, "  Modified: {}", report.modified);
    let _ = writeln!(out, "  Deleted: {}", report.deleted);
    let _ = writeln!(out, "  Unchanged: {}", report.unchanged);

    let groups = [
        (ChangeKind::Added, "Added files", '+'),
        (ChangeKind::Modified, "Modified files", '~'),
        (ChangeKind::Deleted, "Deleted files", '-'),
        (ChangeKind::Unchanged, "Unchanged files", '='),
    ];
    for (kind, heading, marker) in groups {
        let mut entries = report.entries_of(kind).peekable();
        if entries.peek().is_none() {
            continue;
        }
        let _ = write!(out, "\n{heading}:\n");
        for entry in entries {
            let _ = writeln!(out, "  {marker} {}", entry.path);
        }
    }
    out
}
