//! Shared data model for the appgen core pipeline.
//!
//! The surrounding application hands the core three kinds of input: project
//! files, chat messages, and application-schema documents. This crate holds
//! the file and message shapes; schema documents travel as
//! `serde_json::Value` and are interpreted by the `appgen-schema` crate.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single project file as supplied by the caller.
///
/// `path` is forward-slash separated with no leading slash and is the unique
/// key within a [`FileSet`]. `content` may be empty. `language` is a
/// free-form tag (e.g. `"typescript"`) used for fenced-block rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct FileRecord {
    pub path: String,
    pub content: String,
    pub language: String,
}

impl FileRecord {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            language: language.into(),
        }
    }

    /// Final path segment (`"app/page.tsx"` -> `"page.tsx"`).
    #[must_use]
    pub fn base_name(&self) -> &str {
        base_name(&self.path)
    }
}

/// Final segment of a forward-slash separated path.
#[must_use]
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// A path-keyed collection of [`FileRecord`]s.
///
/// Backed by a `BTreeMap` so path uniqueness is structural and iteration is
/// always sorted by path. Every core operation that transforms a file set
/// returns a new one; nothing mutates a caller's set in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(transparent)]
pub struct FileSet {
    files: BTreeMap<String, FileRecord>,
}

impl FileSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record keyed by its own path, replacing any previous record
    /// at that path.
    pub fn insert(&mut self, record: FileRecord) {
        self.files.insert(record.path.clone(), record);
    }

    pub fn remove(&mut self, path: &str) -> Option<FileRecord> {
        self.files.remove(path)
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Records in path order.
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.values()
    }

    /// Paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Owned records in path order.
    #[must_use]
    pub fn to_records(&self) -> Vec<FileRecord> {
        self.files.values().cloned().collect()
    }
}

impl FromIterator<FileRecord> for FileSet {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

impl IntoIterator for FileSet {
    type Item = FileRecord;
    type IntoIter = std::collections::btree_map::IntoValues<String, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_values()
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// One chat-style message. Histories are ordered oldest-to-newest and are
/// only ever read by the core (relevance scoring).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_replaces_on_same_path() {
        let mut set = FileSet::new();
        set.insert(FileRecord::new("app/page.tsx", "old", "typescript"));
        set.insert(FileRecord::new("app/page.tsx", "new", "typescript"));

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("app/page.tsx").unwrap().content, "new");
    }

    #[test]
    fn iteration_is_sorted_by_path() {
        let set: FileSet = [
            FileRecord::new("src/b.ts", "", "typescript"),
            FileRecord::new("app/a.tsx", "", "typescript"),
            FileRecord::new("package.json", "{}", "json"),
        ]
        .into_iter()
        .collect();

        let paths: Vec<&str> = set.paths().collect();
        assert_eq!(paths, vec!["app/a.tsx", "package.json", "src/b.ts"]);
    }

    #[test]
    fn base_name_handles_nested_and_flat_paths() {
        assert_eq!(base_name("app/dashboard/page.tsx"), "page.tsx");
        assert_eq!(base_name("index.html"), "index.html");
    }

    #[test]
    fn message_roles_serialize_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn file_set_serializes_as_path_keyed_map() {
        let set: FileSet = [FileRecord::new("a.ts", "x", "typescript")]
            .into_iter()
            .collect();
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["a.ts"]["content"], "x");
    }
}
