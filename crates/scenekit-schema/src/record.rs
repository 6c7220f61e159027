//! Field values supplied for an entity, and the normalized record

use crate::base::SCALE_FIELD;
use crate::kind::KindTag;
use scenekit_core::{Scale, Vec3};

/// Field values for one entity definition, in the order they were written.
///
/// Unlike a TOML table this may hold the same field name twice, which is
/// how a definition giving `scale` in both forms is represented.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    entries: Vec<(String, toml::Value)>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the entries of a TOML table
    pub fn from_table(table: &toml::Table) -> Self {
        table
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<toml::Value>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &toml::Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, toml::Value)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (String, toml::Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A validated entity: every supplied field plus defaults, in the kind's
/// declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    kind: KindTag,
    fields: Vec<(String, toml::Value)>,
}

impl EntityRecord {
    pub(crate) fn new(kind: KindTag, fields: Vec<(String, toml::Value)>) -> Self {
        Self { kind, fields }
    }

    pub fn kind(&self) -> KindTag {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<&toml::Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &toml::Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field values equivalent to this record, for re-validation
    pub fn to_values(&self) -> FieldValues {
        self.fields.iter().cloned().collect()
    }

    /// The record as a TOML table
    pub fn to_table(&self) -> toml::Table {
        self.fields.iter().cloned().collect()
    }

    pub fn position(&self) -> Option<Vec3> {
        self.get("position").and_then(Vec3::from_toml)
    }

    pub fn rotation(&self) -> Option<Vec3> {
        self.get("rotation").and_then(Vec3::from_toml)
    }

    pub fn scale(&self) -> Option<Scale> {
        self.get(SCALE_FIELD).and_then(Scale::from_toml)
    }

    pub fn is_visible(&self) -> bool {
        self.get("visible")
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }
}
