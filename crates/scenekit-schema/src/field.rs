//! Field schema definitions

use scenekit_core::{Result, SceneKitError};
use serde::{Deserialize, Serialize};

/// The semantic type of a field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldType {
    Bool,
    Number,
    Integer,
    String,
    Vec3,
    Enum { values: Vec<String> },
    Struct { fields: Vec<FieldSchema> },
    List { element: Box<FieldType> },
    /// A value matching any of the alternatives, tried in order
    OneOf { options: Vec<FieldType> },
    /// Map of animatable field name to transition settings
    Transition,
}

impl FieldType {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::String => "string",
            FieldType::Vec3 => "vec3",
            FieldType::Enum { .. } => "enum",
            FieldType::Struct { .. } => "struct",
            FieldType::List { .. } => "list",
            FieldType::OneOf { .. } => "one-of",
            FieldType::Transition => "transition",
        }
    }

    /// Human-readable label, e.g. `number|vec3` or `list<struct>`
    pub fn label(&self) -> String {
        match self {
            FieldType::Enum { values } => format!("enum[{}]", values.join(", ")),
            FieldType::List { element } => format!("list<{}>", element.label()),
            FieldType::OneOf { options } => options
                .iter()
                .map(|o| o.label())
                .collect::<Vec<_>>()
                .join("|"),
            other => other.type_name().to_string(),
        }
    }
}

/// Schema for a single field of an entity kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    pub name: String,
    pub field_type: FieldType,
    pub default: Option<toml::Value>,
    pub required: bool,
    pub description: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Whether a `transition` entry may target this field
    pub animatable: bool,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
            required: false,
            description: None,
            min: None,
            max: None,
            animatable: false,
        }
    }

    pub fn with_default(mut self, default: toml::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn animatable(mut self) -> Self {
        self.animatable = true;
        self
    }

    pub fn has_range(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Field definition as it appears in TOML files
///
/// ```toml
/// [[kind.cylinder.fields]]
/// name = "arc"
/// type = "number"
/// default = 360
/// min = 0
/// max = 360
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSchemaDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub fields: Option<Vec<FieldSchemaDefinition>>,
    #[serde(default)]
    pub element: Option<ElementDefinition>,
    #[serde(default)]
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub animatable: Option<bool>,
}

/// List element type, either a bare type name or a nested definition
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ElementDefinition {
    Simple(String),
    Detailed(ElementTypeDefinition),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementTypeDefinition {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub fields: Option<Vec<FieldSchemaDefinition>>,
    #[serde(default)]
    pub element: Option<Box<ElementDefinition>>,
}

impl FieldSchemaDefinition {
    pub fn to_field_schema(self) -> Result<FieldSchema> {
        let field_type = parse_field_type(
            &self.name,
            &self.field_type,
            self.values,
            self.fields,
            self.element,
        )?;

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(SceneKitError::SchemaDefinition(format!(
                    "field '{}': min {} is greater than max {}",
                    self.name, min, max
                )));
            }
        }

        Ok(FieldSchema {
            name: self.name,
            field_type,
            default: self.default,
            required: self.required.unwrap_or(false),
            description: self.description,
            min: self.min,
            max: self.max,
            animatable: self.animatable.unwrap_or(false),
        })
    }
}

impl ElementDefinition {
    fn to_field_type(self, owner: &str) -> Result<FieldType> {
        match self {
            ElementDefinition::Simple(type_str) => {
                parse_field_type(owner, &type_str, None, None, None)
            }
            ElementDefinition::Detailed(d) => parse_field_type(
                owner,
                &d.field_type,
                d.values,
                d.fields,
                d.element.map(|e| *e),
            ),
        }
    }
}

pub(crate) fn parse_field_type(
    owner: &str,
    type_str: &str,
    enum_values: Option<Vec<String>>,
    struct_fields: Option<Vec<FieldSchemaDefinition>>,
    list_element: Option<ElementDefinition>,
) -> Result<FieldType> {
    if type_str.contains('|') {
        let options = type_str
            .split('|')
            .map(|part| parse_field_type(owner, part.trim(), None, None, None))
            .collect::<Result<Vec<_>>>()?;
        return Ok(FieldType::OneOf { options });
    }

    let field_type = match type_str {
        "bool" => FieldType::Bool,
        "number" => FieldType::Number,
        "integer" => FieldType::Integer,
        "string" => FieldType::String,
        "vec3" => FieldType::Vec3,
        "transition" => FieldType::Transition,
        "enum" => {
            let values = enum_values.unwrap_or_default();
            if values.is_empty() {
                return Err(SceneKitError::SchemaDefinition(format!(
                    "field '{}': enum type needs a non-empty 'values' list",
                    owner
                )));
            }
            FieldType::Enum { values }
        }
        "struct" => {
            let definitions = struct_fields.ok_or_else(|| {
                SceneKitError::SchemaDefinition(format!(
                    "field '{}': struct type needs 'fields'",
                    owner
                ))
            })?;
            let fields = definitions
                .into_iter()
                .map(FieldSchemaDefinition::to_field_schema)
                .collect::<Result<Vec<_>>>()?;
            FieldType::Struct { fields }
        }
        "list" => {
            let element = list_element.ok_or_else(|| {
                SceneKitError::SchemaDefinition(format!(
                    "field '{}': list type needs an 'element' type",
                    owner
                ))
            })?;
            FieldType::List {
                element: Box::new(element.to_field_type(owner)?),
            }
        }
        other => {
            return Err(SceneKitError::SchemaDefinition(format!(
                "field '{}': unknown type '{}'",
                owner, other
            )))
        }
    };
    Ok(field_type)
}
