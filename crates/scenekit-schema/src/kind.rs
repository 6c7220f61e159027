//! Entity kind definitions

use crate::field::{FieldSchema, FieldSchemaDefinition};
use scenekit_core::{Result, SceneKitError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of entity kinds a scene can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KindTag {
    Box,
    Sphere,
    Plane,
    Cylinder,
    Cone,
    GltfModel,
    ObjModel,
}

impl KindTag {
    pub const ALL: [KindTag; 7] = [
        KindTag::Box,
        KindTag::Sphere,
        KindTag::Plane,
        KindTag::Cylinder,
        KindTag::Cone,
        KindTag::GltfModel,
        KindTag::ObjModel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KindTag::Box => "box",
            KindTag::Sphere => "sphere",
            KindTag::Plane => "plane",
            KindTag::Cylinder => "cylinder",
            KindTag::Cone => "cone",
            KindTag::GltfModel => "gltf-model",
            KindTag::ObjModel => "obj-model",
        }
    }

    /// Fields that inherit the value of `radius` when they are not given
    /// explicitly. A cylinder has equal radii; a cone keeps its apex.
    pub fn radius_targets(&self) -> &'static [&'static str] {
        match self {
            KindTag::Cylinder => &["radiusTop", "radiusBottom"],
            KindTag::Cone => &["radiusBottom"],
            _ => &[],
        }
    }
}

impl FromStr for KindTag {
    type Err = SceneKitError;

    fn from_str(s: &str) -> Result<Self> {
        KindTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| SceneKitError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema for an entity kind: base fields followed by kind-specific fields,
/// in declaration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityKind {
    pub tag: KindTag,
    pub description: Option<String>,
    pub fields: Vec<FieldSchema>,
}

impl EntityKind {
    pub fn new(tag: KindTag, fields: Vec<FieldSchema>) -> Self {
        Self {
            tag,
            description: None,
            fields,
        }
    }

    pub fn name(&self) -> &'static str {
        self.tag.as_str()
    }

    /// Get a field schema by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// List all field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Check if a field is required
    pub fn is_field_required(&self, name: &str) -> bool {
        self.field(name).map(|f| f.required).unwrap_or(false)
    }

    pub fn is_animatable(&self, name: &str) -> bool {
        self.field(name).map(|f| f.animatable).unwrap_or(false)
    }
}

/// TOML file format for entity kinds
///
/// ```toml
/// [kind.box]
/// description = "A cube"
/// includes = ["primitive"]
///
/// [[kind.box.fields]]
/// name = "size"
/// type = "number"
/// ```
#[derive(Debug, Deserialize)]
pub struct KindSchemaFile {
    pub kind: HashMap<String, KindSchemaDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct KindSchemaDefinition {
    #[serde(default)]
    pub description: Option<String>,
    /// Shared field groups declared in the base schema, appended after the
    /// base fields
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSchemaDefinition>,
}

impl KindSchemaDefinition {
    /// Resolve the kind-specific fields (without base fields or groups)
    pub fn own_fields(self) -> Result<(Option<String>, Vec<String>, Vec<FieldSchema>)> {
        let fields = self
            .fields
            .into_iter()
            .map(FieldSchemaDefinition::to_field_schema)
            .collect::<Result<Vec<_>>>()?;
        Ok((self.description, self.includes, fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    #[test]
    fn test_tag_names_roundtrip() {
        for tag in KindTag::ALL {
            assert_eq!(tag.as_str().parse::<KindTag>().unwrap(), tag);
        }
        assert_eq!(KindTag::GltfModel.to_string(), "gltf-model");
    }

    #[test]
    fn test_unknown_tag() {
        let err = "tetrahedron".parse::<KindTag>().unwrap_err();
        assert!(matches!(err, SceneKitError::UnknownKind(name) if name == "tetrahedron"));
    }

    #[test]
    fn test_field_lookup_keeps_declaration_order() {
        let kind = EntityKind::new(
            KindTag::ObjModel,
            vec![
                FieldSchema::new("position", FieldType::Vec3).animatable(),
                FieldSchema::new("src", FieldType::String).required(),
            ],
        );

        assert_eq!(kind.field_names(), vec!["position", "src"]);
        assert!(kind.is_field_required("src"));
        assert!(kind.is_animatable("position"));
        assert!(!kind.is_animatable("src"));
        assert!(!kind.has_field("color"));
    }

    #[test]
    fn test_radius_targets() {
        assert_eq!(KindTag::Cylinder.radius_targets(), &["radiusTop", "radiusBottom"]);
        assert_eq!(KindTag::Cone.radius_targets(), &["radiusBottom"]);
        assert!(KindTag::Box.radius_targets().is_empty());
    }
}
