//! The fixed migration step table.
//!
//! Each step is a pure transform from one version to the next. `changes`
//! describes what the step introduces (used by `version_diff`); `apply`
//! returns the entries for what it actually did to a given document, which
//! can be fewer when a field was already present.

use crate::version::SchemaVersion;
use serde_json::{json, Map, Value};

pub(crate) struct MigrationStep {
    pub from: SchemaVersion,
    pub to: SchemaVersion,
    pub changes: &'static [&'static str],
    pub apply: fn(&mut Map<String, Value>) -> Vec<String>,
}

pub(crate) const MIGRATION_STEPS: &[MigrationStep] = &[
    MigrationStep {
        from: SchemaVersion::new(1, 0, 0),
        to: SchemaVersion::new(1, 1, 0),
        changes: &["Added responsive design configuration (design.responsive)"],
        apply: add_responsive_defaults,
    },
    MigrationStep {
        from: SchemaVersion::new(1, 1, 0),
        to: SchemaVersion::new(1, 2, 0),
        changes: &[
            "Added third-party integrations list (integrations)",
            "Added application version to metadata (meta.version)",
        ],
        apply: add_integrations_and_meta_version,
    },
];

/// Landed versions on the forward walk from `from` to `to`, or `None` when
/// the step table has no route. The walk is bounded by the table size, so a
/// malformed table cannot loop.
pub(crate) fn find_path(from: SchemaVersion, to: SchemaVersion) -> Option<Vec<SchemaVersion>> {
    let mut path = Vec::new();
    let mut current = from;
    while current != to {
        if path.len() > MIGRATION_STEPS.len() {
            return None;
        }
        let step = MIGRATION_STEPS.iter().find(|step| step.from == current)?;
        current = step.to;
        path.push(current);
    }
    Some(path)
}

pub(crate) fn step_from(version: SchemaVersion) -> Option<&'static MigrationStep> {
    MIGRATION_STEPS.iter().find(|step| step.from == version)
}

/// Default breakpoints introduced in 1.1.0.
pub(crate) fn default_responsive() -> Value {
    json!({
        "approach": "mobile-first",
        "breakpoints": {
            "sm": "640px",
            "md": "768px",
            "lg": "1024px",
        },
    })
}

fn add_responsive_defaults(schema: &mut Map<String, Value>) -> Vec<String> {
    let mut applied = Vec::new();

    let design = schema
        .entry("design")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(design) = design.as_object_mut() {
        if !design.contains_key("responsive") {
            design.insert("responsive".to_string(), default_responsive());
            applied.push("Added default responsive configuration (design.responsive)".to_string());
        }
    }

    applied
}

fn add_integrations_and_meta_version(schema: &mut Map<String, Value>) -> Vec<String> {
    let mut applied = Vec::new();

    if !schema.contains_key("integrations") {
        schema.insert("integrations".to_string(), json!([]));
        applied.push("Added empty integrations list (integrations)".to_string());
    }

    let meta = schema
        .entry("meta")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(meta) = meta.as_object_mut() {
        if !meta.contains_key("version") {
            meta.insert("version".to_string(), json!("0.1.0"));
            applied.push("Added application version to metadata (meta.version)".to_string());
        }
    }

    applied
}
