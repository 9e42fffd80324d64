use crate::migrations::{find_path, step_from};
use crate::version::{SchemaVersion, CURRENT_SCHEMA_VERSION, MIN_SUPPORTED_VERSION};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const SCHEMA_VERSION_KEY: &str = "$schemaVersion";
const CREATED_AT_KEY: &str = "$createdAt";
const UPDATED_AT_KEY: &str = "$updatedAt";
const HISTORY_KEY: &str = "$history";

/// Version assumed for documents that predate version stamping.
const DEFAULT_DOCUMENT_VERSION: &str = "1.0.0";

/// Top-level fields every usable document must carry.
const REQUIRED_FIELDS: &[&str] = &["meta", "design", "structure"];

/// Where a document stands relative to the current schema version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionInfo {
    pub current: String,
    pub is_valid: bool,
    pub needs_migration: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration_path: Option<Vec<String>>,
}

/// Outcome of a migration attempt. `success: false` plus `warnings` is the
/// failure channel; this operation never errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationResult {
    pub success: bool,
    pub from_version: String,
    pub to_version: String,
    pub schema: Value,
    pub changes: Vec<String>,
    pub warnings: Vec<String>,
}

/// Outcome of a structural compatibility check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompatibilityResult {
    pub compatible: bool,
    pub issues: Vec<String>,
}

/// Change descriptions for one landed version on a migration walk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionDiffEntry {
    pub version: String,
    pub changes: Vec<String>,
}

/// What changes between two versions, per the step table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionDiff {
    pub from_version: String,
    pub to_version: String,
    pub changes: Vec<VersionDiffEntry>,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn document_version(schema: &Value) -> &str {
    schema
        .get(SCHEMA_VERSION_KEY)
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_DOCUMENT_VERSION)
}

/// Read a document's version standing: its version string, whether that
/// version is supported, and the forward path to current when one exists.
#[must_use]
pub fn version_info(schema: &Value) -> VersionInfo {
    let current = document_version(schema).to_string();
    let parsed = current.parse::<SchemaVersion>().ok();

    let is_valid = parsed.is_some_and(|version| version >= MIN_SUPPORTED_VERSION);
    let needs_migration = current != CURRENT_SCHEMA_VERSION.to_string();
    let migration_path = if needs_migration {
        parsed
            .and_then(|version| find_path(version, CURRENT_SCHEMA_VERSION))
            .map(|path| path.iter().map(ToString::to_string).collect())
    } else {
        None
    };

    VersionInfo {
        current,
        is_valid,
        needs_migration,
        migration_path,
    }
}

/// Bring a document to [`CURRENT_SCHEMA_VERSION`].
///
/// Unsupported or unroutable versions come back as `success: false` with the
/// document untouched; an already-current document is a no-op. A real
/// migration applies every step on the forward path, restamps
/// `$schemaVersion` and `$updatedAt`, and appends one `$history` entry
/// (`$history` is append-only).
#[must_use]
pub fn migrate(schema: &Value) -> MigrationResult {
    let from = document_version(schema).to_string();
    let to = CURRENT_SCHEMA_VERSION.to_string();

    let failure = |warning: String| MigrationResult {
        success: false,
        from_version: from.clone(),
        to_version: to.clone(),
        schema: schema.clone(),
        changes: Vec::new(),
        warnings: vec![warning],
    };

    let parsed = match from.parse::<SchemaVersion>() {
        Ok(version) => version,
        Err(_) => return failure(format!("Unrecognized schema version: {from}")),
    };

    if parsed < MIN_SUPPORTED_VERSION {
        return failure(format!(
            "Schema version {from} is below the minimum supported version {MIN_SUPPORTED_VERSION}"
        ));
    }

    if parsed == CURRENT_SCHEMA_VERSION {
        return MigrationResult {
            success: true,
            from_version: from.clone(),
            to_version: to,
            schema: schema.clone(),
            changes: vec!["No migration needed".to_string()],
            warnings: Vec::new(),
        };
    }

    let Some(path) = find_path(parsed, CURRENT_SCHEMA_VERSION) else {
        return failure(format!("No migration path from {from} to {to}"));
    };

    let Some(mut document) = schema.as_object().cloned() else {
        return failure("Schema document is not a JSON object".to_string());
    };

    let mut changes = Vec::new();
    let mut cursor = parsed;
    for landed in path {
        if let Some(step) = step_from(cursor) {
            log::debug!("applying schema migration {} -> {}", step.from, step.to);
            changes.extend((step.apply)(&mut document));
            cursor = landed;
        }
    }
    changes.push(format!("Updated schema version from {from} to {to}"));

    let now = now_rfc3339();
    document.insert(SCHEMA_VERSION_KEY.to_string(), json!(to.clone()));
    document.insert(UPDATED_AT_KEY.to_string(), json!(now.clone()));
    let history = document
        .entry(HISTORY_KEY)
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Some(entries) = history.as_array_mut() {
        entries.push(json!({
            "event": "migrated",
            "from": from.clone(),
            "to": to.clone(),
            "at": now,
        }));
    }

    MigrationResult {
        success: true,
        from_version: from,
        to_version: to,
        schema: Value::Object(document),
        changes,
        warnings: Vec::new(),
    }
}

/// Build a complete versioned document from a partial one.
///
/// Every required top-level field missing from `partial` gets a
/// platform-appropriate default, and the bookkeeping fields are stamped:
/// `$schemaVersion`, `$createdAt`, `$updatedAt`, and a one-element
/// `$history` recording the creation.
#[must_use]
pub fn create_versioned_schema(partial: &Value, platform: &str) -> Value {
    let mut document = partial.as_object().cloned().unwrap_or_default();
    let now = now_rfc3339();

    let meta = document
        .entry("meta")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(meta) = meta.as_object_mut() {
        meta.entry("name").or_insert_with(|| json!("Untitled App"));
        meta.entry("description").or_insert_with(|| json!(""));
        meta.entry("platform").or_insert_with(|| json!(platform));
        meta.entry("version").or_insert_with(|| json!("0.1.0"));
    }

    document.entry("design").or_insert_with(|| {
        json!({
            "theme": "light",
            "colors": {
                "primary": "#3b82f6",
                "background": "#ffffff",
                "foreground": "#0f172a",
                "muted": "#64748b",
                "accent": "#f59e0b",
            },
            "typography": {
                "fontFamily": "Inter, sans-serif",
                "baseSize": "16px",
            },
            "spacing": {"unit": 4},
            "borderRadius": "0.5rem",
            "responsive": crate::migrations::default_responsive(),
        })
    });

    document.entry("structure").or_insert_with(|| {
        json!({
            "pages": [],
            "navigation": {"items": []},
            "layouts": [],
        })
    });

    document.entry("components").or_insert_with(|| json!([]));
    document.entry("integrations").or_insert_with(|| json!([]));

    document.insert(
        SCHEMA_VERSION_KEY.to_string(),
        json!(CURRENT_SCHEMA_VERSION.to_string()),
    );
    document.insert(CREATED_AT_KEY.to_string(), json!(now.clone()));
    document.insert(UPDATED_AT_KEY.to_string(), json!(now.clone()));
    document.insert(
        HISTORY_KEY.to_string(),
        json!([{
            "event": "created",
            "version": CURRENT_SCHEMA_VERSION.to_string(),
            "at": now,
        }]),
    );

    Value::Object(document)
}

/// Check structural compatibility: required top-level fields present and a
/// well-formed `$schemaVersion` when one is carried. Accumulates every issue
/// rather than stopping at the first.
#[must_use]
pub fn validate_compatibility(schema: &Value) -> CompatibilityResult {
    let mut issues = Vec::new();

    for field in REQUIRED_FIELDS {
        if schema.get(field).is_none() {
            issues.push(format!("Missing required field: {field}"));
        }
    }

    if let Some(version) = schema.get(SCHEMA_VERSION_KEY) {
        let text = version
            .as_str()
            .map(ToString::to_string)
            .unwrap_or_else(|| version.to_string());
        if text.parse::<SchemaVersion>().is_err() {
            issues.push(format!("Invalid version format: {text}"));
        }
    }

    CompatibilityResult {
        compatible: issues.is_empty(),
        issues,
    }
}

/// Per-version change descriptions along the forward walk from
/// `from_version` to `to_version`. Unparseable versions or a missing route
/// yield an empty change list, not an error.
#[must_use]
pub fn version_diff(from_version: &str, to_version: &str) -> VersionDiff {
    let mut entries = Vec::new();

    if let (Ok(from), Ok(to)) = (
        from_version.parse::<SchemaVersion>(),
        to_version.parse::<SchemaVersion>(),
    ) {
        if let Some(path) = find_path(from, to) {
            let mut cursor = from;
            for landed in path {
                if let Some(step) = step_from(cursor) {
                    entries.push(VersionDiffEntry {
                        version: landed.to_string(),
                        changes: step.changes.iter().map(|change| (*change).to_string()).collect(),
                    });
                    cursor = landed;
                }
            }
        }
    }

    VersionDiff {
        from_version: from_version.to_string(),
        to_version: to_version.to_string(),
        changes: entries,
    }
}

/// A copy of the document with every `$`-prefixed bookkeeping field removed.
/// All other fields are preserved exactly.
#[must_use]
pub fn export_schema(schema: &Value) -> Value {
    match schema.as_object() {
        Some(document) => Value::Object(
            document
                .iter()
                .filter(|(key, _)| !key.starts_with('$'))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        None => schema.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_version_field_defaults_to_one_zero_zero() {
        let info = version_info(&json!({"meta": {}}));
        assert_eq!(info.current, "1.0.0");
        assert!(info.is_valid);
        assert!(info.needs_migration);
        assert_eq!(
            info.migration_path,
            Some(vec!["1.1.0".to_string(), "1.2.0".to_string()])
        );
    }

    #[test]
    fn current_document_needs_no_migration() {
        let info = version_info(&json!({"$schemaVersion": "1.2.0"}));
        assert!(!info.needs_migration);
        assert_eq!(info.migration_path, None);
    }

    #[test]
    fn future_version_is_valid_but_has_no_path() {
        let info = version_info(&json!({"$schemaVersion": "2.0.0"}));
        assert!(info.is_valid);
        assert!(info.needs_migration);
        assert_eq!(info.migration_path, None);
    }

    #[test]
    fn migrating_current_document_is_a_no_op() {
        let schema = json!({"$schemaVersion": "1.2.0", "meta": {"name": "App"}});
        let result = migrate(&schema);

        assert!(result.success);
        assert_eq!(result.changes, vec!["No migration needed".to_string()]);
        assert_eq!(result.schema, schema);
    }

    #[test]
    fn migrating_unsupported_version_fails_softly() {
        let schema = json!({"$schemaVersion": "0.9.0", "meta": {}});
        let result = migrate(&schema);

        assert!(!result.success);
        assert!(!result.warnings.is_empty());
        assert_eq!(result.to_version, "1.2.0");
        assert_eq!(result.schema, schema);
    }

    #[test]
    fn migrating_unparseable_version_fails_softly() {
        let result = migrate(&json!({"$schemaVersion": "latest"}));
        assert!(!result.success);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn full_migration_lands_on_current_version() {
        let schema = json!({
            "$schemaVersion": "1.0.0",
            "meta": {"name": "Shop"},
            "design": {"theme": "dark"},
            "structure": {"pages": []},
        });

        let result = migrate(&schema);

        assert!(result.success);
        assert_eq!(result.schema["$schemaVersion"], "1.2.0");
        assert_eq!(
            result.schema["design"]["responsive"]["approach"],
            "mobile-first"
        );
        assert_eq!(result.schema["integrations"], json!([]));
        assert_eq!(result.schema["meta"]["version"], "0.1.0");
        assert!(result
            .changes
            .contains(&"Updated schema version from 1.0.0 to 1.2.0".to_string()));
    }

    #[test]
    fn migration_appends_history_and_updates_timestamp() {
        let schema = json!({
            "$schemaVersion": "1.1.0",
            "$history": [{"event": "created", "version": "1.1.0"}],
        });

        let result = migrate(&schema);
        let history = result.schema["$history"].as_array().unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["event"], "created");
        assert_eq!(history[1]["event"], "migrated");
        assert_eq!(history[1]["from"], "1.1.0");
        assert_eq!(history[1]["to"], "1.2.0");
        assert!(result.schema["$updatedAt"].is_string());
    }

    #[test]
    fn migration_from_future_version_fails_softly() {
        let result = migrate(&json!({"$schemaVersion": "2.0.0"}));
        assert!(!result.success);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("No migration path"));
    }

    #[test]
    fn created_schema_is_current_and_compatible() {
        let schema = create_versioned_schema(&json!({}), "web");

        assert_eq!(schema["$schemaVersion"], "1.2.0");
        assert_eq!(schema["meta"]["platform"], "web");
        assert_eq!(schema["components"], json!([]));
        assert_eq!(schema["$history"].as_array().unwrap().len(), 1);
        assert!(validate_compatibility(&schema).compatible);
        assert!(!version_info(&schema).needs_migration);
    }

    #[test]
    fn creation_preserves_caller_fields() {
        let partial = json!({
            "meta": {"name": "Dashboard"},
            "design": {"theme": "dark"},
        });
        let schema = create_versioned_schema(&partial, "web");

        assert_eq!(schema["meta"]["name"], "Dashboard");
        // Caller-supplied meta still gets the missing defaults.
        assert_eq!(schema["meta"]["platform"], "web");
        // A caller-supplied design is left exactly as given.
        assert_eq!(schema["design"], json!({"theme": "dark"}));
    }

    #[test]
    fn validation_accumulates_every_issue() {
        let result = validate_compatibility(&json!({"$schemaVersion": "not.a.version"}));

        assert!(!result.compatible);
        assert_eq!(
            result.issues,
            vec![
                "Missing required field: meta".to_string(),
                "Missing required field: design".to_string(),
                "Missing required field: structure".to_string(),
                "Invalid version format: not.a.version".to_string(),
            ]
        );
    }

    #[test]
    fn validation_accepts_document_without_version_field() {
        let result = validate_compatibility(&json!({
            "meta": {}, "design": {}, "structure": {},
        }));
        assert!(result.compatible);
    }

    #[test]
    fn version_diff_lists_changes_per_landed_version() {
        let diff = version_diff("1.0.0", "1.2.0");

        assert_eq!(diff.changes.len(), 2);
        assert_eq!(diff.changes[0].version, "1.1.0");
        assert!(diff.changes[0].changes[0].contains("responsive"));
        assert_eq!(diff.changes[1].version, "1.2.0");
        assert_eq!(diff.changes[1].changes.len(), 2);
    }

    #[test]
    fn version_diff_with_no_route_is_empty() {
        assert!(version_diff("1.2.0", "1.0.0").changes.is_empty());
        assert!(version_diff("nope", "1.2.0").changes.is_empty());
    }

    #[test]
    fn export_strips_only_bookkeeping_fields() {
        let schema = create_versioned_schema(&json!({"meta": {"name": "App"}}), "web");
        let exported = export_schema(&schema);

        let keys: Vec<&String> = exported.as_object().unwrap().keys().collect();
        assert!(keys.iter().all(|key| !key.starts_with('$')));
        assert_eq!(exported["meta"], schema["meta"]);
        assert_eq!(exported["design"], schema["design"]);
        assert_eq!(exported["structure"], schema["structure"]);
    }
}
