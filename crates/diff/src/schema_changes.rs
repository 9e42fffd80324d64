//! Schema-document diffing at fixed field granularity, and the mapping from
//! changed fields to the project files they affect.

use crate::error::DiffError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A recognized schema field, at the granularity the pipeline tracks.
///
/// `detect_schema_changes` emits the six top-level fields plus
/// `DesignColors`; `StructurePages` exists only as a lookup key for
/// [`affected_files`] (callers that track page edits themselves can map them
/// to file globs without a schema diff).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaField {
    Meta,
    Design,
    DesignColors,
    Structure,
    StructurePages,
    Components,
    Features,
    Integrations,
}

impl SchemaField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::Design => "design",
            Self::DesignColors => "design.colors",
            Self::Structure => "structure",
            Self::StructurePages => "structure.pages",
            Self::Components => "components",
            Self::Features => "features",
            Self::Integrations => "integrations",
        }
    }
}

impl fmt::Display for SchemaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaField {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meta" => Ok(Self::Meta),
            "design" => Ok(Self::Design),
            "design.colors" => Ok(Self::DesignColors),
            "structure" => Ok(Self::Structure),
            "structure.pages" => Ok(Self::StructurePages),
            "components" => Ok(Self::Components),
            "features" => Ok(Self::Features),
            "integrations" => Ok(Self::Integrations),
            other => Err(DiffError::UnknownSchemaField(other.to_string())),
        }
    }
}

impl Serialize for SchemaField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchemaField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

/// Top-level fields compared by [`detect_schema_changes`], in emission order.
const TOP_LEVEL_FIELDS: &[SchemaField] = &[
    SchemaField::Meta,
    SchemaField::Design,
    SchemaField::Structure,
    SchemaField::Components,
    SchemaField::Features,
    SchemaField::Integrations,
];

/// File globs touched when a schema field changes.
///
/// Keyed at exactly the granularity the differ (plus `structure.pages`)
/// produces; colors get their own row because they are by far the most
/// common tweak target and map to the styling files alone.
const AFFECTED_FILES: &[(SchemaField, &[&str])] = &[
    (SchemaField::Meta, &["package.json"]),
    (
        SchemaField::Design,
        &["app/globals.css", "tailwind.config.ts"],
    ),
    (
        SchemaField::DesignColors,
        &["app/globals.css", "tailwind.config.ts"],
    ),
    (
        SchemaField::Structure,
        &["app/layout.tsx", "components/navigation.tsx"],
    ),
    (SchemaField::StructurePages, &["app/**/page.tsx"]),
    (SchemaField::Components, &["components/**/*.tsx"]),
    (SchemaField::Features, &["lib/**/*.ts", "app/api/**/*.ts"]),
    (
        SchemaField::Integrations,
        &["lib/integrations/**/*.ts", ".env.example"],
    ),
];

/// Compare two schema documents over the fixed top-level field enumeration.
///
/// Fields are deep-compared as JSON values; a field absent on one side and
/// present on the other counts as changed. When `design` differs, the nested
/// `design.colors` object is additionally compared and reported right after
/// it. That one hard-coded probe is the full extent of the recursion; do
/// not generalize it without also rekeying [`affected_files`].
#[must_use]
pub fn detect_schema_changes(old: &Value, new: &Value) -> Vec<SchemaField> {
    let mut changed = Vec::new();

    for &field in TOP_LEVEL_FIELDS {
        let key = field.as_str();
        if old.get(key) != new.get(key) {
            changed.push(field);
            if field == SchemaField::Design
                && old.pointer("/design/colors") != new.pointer("/design/colors")
            {
                changed.push(SchemaField::DesignColors);
            }
        }
    }

    changed
}

/// Map changed fields to the de-duplicated union of affected file globs.
///
/// Order is first occurrence: input fields in caller order, each field's
/// table row in table order. Fields without a table row contribute nothing.
#[must_use]
pub fn affected_files(fields: &[SchemaField]) -> Vec<String> {
    let mut globs: Vec<String> = Vec::new();
    for field in fields {
        let Some((_, row)) = AFFECTED_FILES.iter().find(|(key, _)| key == field) else {
            continue;
        };
        for glob in *row {
            if !globs.iter().any(|existing| existing == glob) {
                globs.push((*glob).to_string());
            }
        }
    }
    globs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn identical_documents_yield_no_changes() {
        let schema = json!({"meta": {"name": "App"}, "design": {"theme": "dark"}});
        let copy = schema.clone();
        assert_eq!(detect_schema_changes(&schema, &copy), Vec::new());
    }

    #[test]
    fn color_change_reports_design_and_colors() {
        let old = json!({"design": {"colors": {"primary": "#000"}}});
        let new = json!({"design": {"colors": {"primary": "#fff"}}});

        let changed = detect_schema_changes(&old, &new);
        assert_eq!(changed, vec![SchemaField::Design, SchemaField::DesignColors]);
    }

    #[test]
    fn non_color_design_change_reports_design_only() {
        let old = json!({"design": {"theme": "light", "colors": {"primary": "#000"}}});
        let new = json!({"design": {"theme": "dark", "colors": {"primary": "#000"}}});

        let changed = detect_schema_changes(&old, &new);
        assert_eq!(changed, vec![SchemaField::Design]);
    }

    #[test]
    fn added_and_removed_fields_count_as_changed() {
        let old = json!({"meta": {"name": "App"}});
        let new = json!({"components": []});

        let changed = detect_schema_changes(&old, &new);
        assert_eq!(changed, vec![SchemaField::Meta, SchemaField::Components]);
    }

    #[test]
    fn changes_follow_the_fixed_enumeration_order() {
        let old = json!({});
        let new = json!({
            "integrations": [1],
            "meta": {"name": "App"},
            "structure": {"pages": []},
        });

        let changed = detect_schema_changes(&old, &new);
        assert_eq!(
            changed,
            vec![
                SchemaField::Meta,
                SchemaField::Structure,
                SchemaField::Integrations,
            ]
        );
    }

    #[test]
    fn bookkeeping_fields_are_ignored() {
        let old = json!({"meta": {}, "$schemaVersion": "1.0.0"});
        let new = json!({"meta": {}, "$schemaVersion": "1.2.0"});
        assert_eq!(detect_schema_changes(&old, &new), Vec::new());
    }

    #[test]
    fn affected_files_dedupes_across_fields() {
        let globs = affected_files(&[SchemaField::Design, SchemaField::DesignColors]);
        assert_eq!(globs, vec!["app/globals.css", "tailwind.config.ts"]);
    }

    #[test]
    fn affected_files_keeps_first_occurrence_order() {
        let globs = affected_files(&[
            SchemaField::StructurePages,
            SchemaField::Meta,
            SchemaField::Meta,
        ]);
        assert_eq!(globs, vec!["app/**/page.tsx", "package.json"]);
    }

    #[test]
    fn empty_input_maps_to_nothing() {
        assert_eq!(affected_files(&[]), Vec::<String>::new());
    }

    #[test]
    fn field_names_round_trip_through_strings() {
        for &field in &[
            SchemaField::Meta,
            SchemaField::DesignColors,
            SchemaField::StructurePages,
        ] {
            assert_eq!(field.as_str().parse::<SchemaField>().unwrap(), field);
        }
        assert!("design.typography".parse::<SchemaField>().is_err());
    }

    #[test]
    fn serializes_as_dotted_string() {
        let json = serde_json::to_string(&SchemaField::DesignColors).unwrap();
        assert_eq!(json, r#""design.colors""#);
    }
}
