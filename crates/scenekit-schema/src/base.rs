//! Base fields shared by every entity kind, and shared field groups

use crate::field::{FieldSchema, FieldSchemaDefinition, FieldType};
use scenekit_core::{Result, SceneKitError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Base schema bundled with the crate
pub const BUNDLED_BASE: &str = include_str!("../schemas/base.toml");

/// Names every entity kind must declare
pub const BASE_FIELD_NAMES: [&str; 7] = [
    "position",
    "rotation",
    "scale",
    "visible",
    "id",
    "key",
    "transition",
];

/// The field whose uniform and per-axis forms are mutually exclusive
pub const SCALE_FIELD: &str = "scale";

/// The field whose value seeds `radiusTop` / `radiusBottom`
pub const RADIUS_FIELD: &str = "radius";

/// Timing curve names accepted by a transition
pub const TIMING_CURVES: [&str; 34] = [
    "linear",
    "ease-in",
    "ease-out",
    "ease-in-out",
    "quadratic-in",
    "quadratic-out",
    "quadratic-inout",
    "cubic-in",
    "cubic-out",
    "cubic-inout",
    "quartic-in",
    "quartic-out",
    "quartic-inout",
    "quintic-in",
    "quintic-out",
    "quintic-inout",
    "sin-in",
    "sin-out",
    "sin-inout",
    "exponential-in",
    "exponential-out",
    "exponential-inout",
    "circular-in",
    "circular-out",
    "circular-inout",
    "elastic-in",
    "elastic-out",
    "elastic-inout",
    "back-in",
    "back-out",
    "back-inout",
    "bounce-in",
    "bounce-out",
    "bounce-inout",
];

/// Fields of a single transition entry: `{ duration, timing?, delay? }`
pub fn transition_spec_fields() -> Vec<FieldSchema> {
    vec![
        FieldSchema::new("duration", FieldType::Number)
            .required()
            .with_range(Some(0.0), None)
            .with_description("Transition length in milliseconds"),
        FieldSchema::new(
            "timing",
            FieldType::Enum {
                values: TIMING_CURVES.iter().map(|s| s.to_string()).collect(),
            },
        )
        .with_description("Name of the easing curve"),
        FieldSchema::new("delay", FieldType::Number)
            .with_default(toml::Value::Integer(0))
            .with_range(Some(0.0), None)
            .with_description("Wait before the transition starts, in milliseconds"),
    ]
}

/// Fields inherited by every kind, plus named groups kinds can include
#[derive(Debug, Clone, Default)]
pub struct BaseSchema {
    pub fields: Vec<FieldSchema>,
    pub groups: BTreeMap<String, Vec<FieldSchema>>,
}

#[derive(Debug, Deserialize)]
struct BaseSchemaFile {
    base: BaseSection,
    #[serde(default)]
    groups: HashMap<String, GroupSection>,
}

#[derive(Debug, Deserialize)]
struct BaseSection {
    fields: Vec<FieldSchemaDefinition>,
}

#[derive(Debug, Deserialize)]
struct GroupSection {
    fields: Vec<FieldSchemaDefinition>,
}

impl BaseSchema {
    /// The base schema shipped with the crate
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_BASE)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: BaseSchemaFile = toml::from_str(content)?;

        let fields = file
            .base
            .fields
            .into_iter()
            .map(FieldSchemaDefinition::to_field_schema)
            .collect::<Result<Vec<_>>>()?;

        for name in BASE_FIELD_NAMES {
            if !fields.iter().any(|f| f.name == name) {
                return Err(SceneKitError::SchemaDefinition(format!(
                    "base schema does not declare '{}'",
                    name
                )));
            }
        }

        let mut groups = BTreeMap::new();
        for (name, group) in file.groups {
            let group_fields = group
                .fields
                .into_iter()
                .map(FieldSchemaDefinition::to_field_schema)
                .collect::<Result<Vec<_>>>()?;
            groups.insert(name, group_fields);
        }

        Ok(Self { fields, groups })
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&[FieldSchema]> {
        self.groups.get(name).map(|g| g.as_slice())
    }
}
