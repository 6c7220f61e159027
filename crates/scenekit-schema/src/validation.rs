//! Validation of entity field values against kind schemas

use crate::base::{transition_spec_fields, RADIUS_FIELD, SCALE_FIELD};
use crate::field::{FieldSchema, FieldType};
use crate::kind::EntityKind;
use crate::record::{EntityRecord, FieldValues};
use crate::registry::SchemaRegistry;
use log::{debug, trace};
use scenekit_core::{Result, Scale, SceneKitError, Vec3};
use std::collections::HashMap;

/// Validates field values by kind name against a registry
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Look up `kind` and validate `values` against it
    pub fn validate(&self, kind: &str, values: &FieldValues) -> Result<EntityRecord> {
        let schema = self.registry.lookup(kind)?;
        validate_entity(schema, values)
    }
}

/// Validate field values against an entity kind.
///
/// Rejects unknown, repeated, mistyped and out-of-range fields, then
/// returns the normalized record with defaults applied for absent optional
/// fields. Validating a normalized record yields the same record.
pub fn validate_entity(kind: &EntityKind, values: &FieldValues) -> Result<EntityRecord> {
    let result = validate_inner(kind, values);
    match &result {
        Ok(record) => trace!("{}: accepted {} field(s)", kind.name(), record.len()),
        Err(e) => debug!("{}: rejected definition: {}", kind.name(), e),
    }
    result
}

fn validate_inner(kind: &EntityKind, values: &FieldValues) -> Result<EntityRecord> {
    let checker = Checker::new(kind);
    let mut supplied: HashMap<&str, toml::Value> = HashMap::new();
    let mut raw: HashMap<&str, &toml::Value> = HashMap::new();

    for (name, value) in values.iter() {
        let field = kind.field(name).ok_or_else(|| SceneKitError::UnknownField {
            kind: kind.name().to_string(),
            field: name.to_string(),
        })?;

        if let Some(first) = raw.get(name) {
            if name == SCALE_FIELD {
                return Err(SceneKitError::ConflictingScale {
                    kind: kind.name().to_string(),
                    first: describe_scale(first),
                    second: describe_scale(value),
                });
            }
            return Err(SceneKitError::DuplicateField {
                kind: kind.name().to_string(),
                field: name.to_string(),
            });
        }
        raw.insert(name, value);

        let normalized = checker.check_field(field, value)?;
        supplied.insert(name, normalized);
    }

    if let Some(radius) = supplied.get(RADIUS_FIELD).cloned() {
        for &target in kind.tag.radius_targets() {
            if kind.has_field(target) && !supplied.contains_key(target) {
                supplied.insert(target, radius.clone());
            }
        }
    }

    let mut fields = Vec::with_capacity(kind.fields.len());
    for field in &kind.fields {
        if let Some(value) = supplied.remove(field.name.as_str()) {
            fields.push((field.name.clone(), value));
        } else if field.required {
            return Err(SceneKitError::MissingRequiredField {
                kind: kind.name().to_string(),
                field: field.name.clone(),
            });
        } else if let Some(default) = &field.default {
            fields.push((field.name.clone(), default.clone()));
        }
    }

    Ok(EntityRecord::new(kind.tag, fields))
}

/// Check a field's declared default and return its normalized form
pub(crate) fn normalize_default(
    kind: &EntityKind,
    field: &FieldSchema,
) -> Result<Option<toml::Value>> {
    match &field.default {
        Some(default) => Checker::new(kind).check_field(field, default).map(Some),
        None => Ok(None),
    }
}

fn describe_scale(value: &toml::Value) -> String {
    Scale::from_toml(value)
        .map(|s| s.form_name().to_string())
        .unwrap_or_else(|| value_type_name(value).to_string())
}

/// Type checker bound to one kind, so transitions can resolve their targets
struct Checker<'a> {
    kind: &'a EntityKind,
}

impl<'a> Checker<'a> {
    fn new(kind: &'a EntityKind) -> Self {
        Self { kind }
    }

    fn check_field(&self, field: &FieldSchema, value: &toml::Value) -> Result<toml::Value> {
        self.check_value(&field.name, &field.field_type, value, field.min, field.max)
    }

    fn check_value(
        &self,
        path: &str,
        field_type: &FieldType,
        value: &toml::Value,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<toml::Value> {
        match (field_type, value) {
            (FieldType::Bool, toml::Value::Boolean(_)) => Ok(value.clone()),
            (FieldType::Number | FieldType::Integer, toml::Value::Integer(n)) => {
                self.check_range(path, *n as f64, min, max)?;
                Ok(value.clone())
            }
            (FieldType::Number, toml::Value::Float(n)) => {
                self.check_range(path, *n, min, max)?;
                Ok(value.clone())
            }
            (FieldType::String, toml::Value::String(_)) => Ok(value.clone()),
            (FieldType::Vec3, toml::Value::Table(_) | toml::Value::Array(_)) => {
                if let toml::Value::Table(t) = value {
                    if let Some(key) = t.keys().find(|k| !matches!(k.as_str(), "x" | "y" | "z")) {
                        return Err(SceneKitError::UnknownField {
                            kind: self.kind.name().to_string(),
                            field: format!("{}.{}", path, key),
                        });
                    }
                }
                Vec3::from_toml(value)
                    .map(|v| v.to_toml())
                    .ok_or_else(|| self.mismatch(path, field_type, value))
            }
            (FieldType::Enum { values }, toml::Value::String(s)) => {
                if values.contains(s) {
                    Ok(value.clone())
                } else {
                    Err(SceneKitError::InvalidEnumValue {
                        kind: self.kind.name().to_string(),
                        field: path.to_string(),
                        value: s.clone(),
                        allowed: values.clone(),
                    })
                }
            }
            (FieldType::Struct { fields }, toml::Value::Table(t)) => {
                self.check_struct(path, fields, t)
            }
            (FieldType::List { element }, toml::Value::Array(arr)) => {
                let items = arr
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        self.check_value(&format!("{}[{}]", path, i), element, item, None, None)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(toml::Value::Array(items))
            }
            (FieldType::OneOf { options }, _) => {
                for option in options {
                    match self.check_value(path, option, value, min, max) {
                        Ok(v) => return Ok(v),
                        Err(SceneKitError::TypeMismatch { .. }) => continue,
                        Err(e) => return Err(e),
                    }
                }
                Err(self.mismatch(path, field_type, value))
            }
            (FieldType::Transition, toml::Value::Table(t)) => self.check_transition(path, t),
            _ => Err(self.mismatch(path, field_type, value)),
        }
    }

    fn check_struct(
        &self,
        path: &str,
        fields: &[FieldSchema],
        table: &toml::Table,
    ) -> Result<toml::Value> {
        for key in table.keys() {
            if !fields.iter().any(|f| &f.name == key) {
                return Err(SceneKitError::UnknownField {
                    kind: self.kind.name().to_string(),
                    field: format!("{}.{}", path, key),
                });
            }
        }

        let mut out = toml::Table::new();
        for field in fields {
            let nested = format!("{}.{}", path, field.name);
            match table.get(&field.name) {
                Some(v) => {
                    let v = self.check_value(&nested, &field.field_type, v, field.min, field.max)?;
                    out.insert(field.name.clone(), v);
                }
                None if field.required => {
                    return Err(SceneKitError::MissingRequiredField {
                        kind: self.kind.name().to_string(),
                        field: nested,
                    });
                }
                None => {
                    if let Some(default) = &field.default {
                        out.insert(field.name.clone(), default.clone());
                    }
                }
            }
        }
        Ok(toml::Value::Table(out))
    }

    fn check_transition(&self, path: &str, table: &toml::Table) -> Result<toml::Value> {
        let settings_fields = transition_spec_fields();
        let mut out = toml::Table::new();
        for (target, settings) in table {
            if !self.kind.is_animatable(target) {
                return Err(SceneKitError::UnknownField {
                    kind: self.kind.name().to_string(),
                    field: format!("{}.{}", path, target),
                });
            }
            let nested = format!("{}.{}", path, target);
            let settings = match settings {
                toml::Value::Table(t) => self.check_struct(&nested, &settings_fields, t)?,
                other => {
                    return Err(self.mismatch(
                        &nested,
                        &FieldType::Struct {
                            fields: settings_fields.clone(),
                        },
                        other,
                    ))
                }
            };
            out.insert(target.clone(), settings);
        }
        Ok(toml::Value::Table(out))
    }

    fn check_range(
        &self,
        path: &str,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<()> {
        let below = min.map(|m| value < m).unwrap_or(false);
        let above = max.map(|m| value > m).unwrap_or(false);
        let nan = value.is_nan() && (min.is_some() || max.is_some());
        if below || above || nan {
            return Err(SceneKitError::OutOfRange {
                kind: self.kind.name().to_string(),
                field: path.to_string(),
                min: min.unwrap_or(f64::NEG_INFINITY),
                max: max.unwrap_or(f64::INFINITY),
                value,
            });
        }
        Ok(())
    }

    fn mismatch(&self, path: &str, expected: &FieldType, value: &toml::Value) -> SceneKitError {
        SceneKitError::TypeMismatch {
            kind: self.kind.name().to_string(),
            field: path.to_string(),
            expected: expected.label(),
            got: value_type_name(value).to_string(),
            value: value.to_string(),
        }
    }
}

fn value_type_name(value: &toml::Value) -> &'static str {
    match value {
        toml::Value::String(_) => "string",
        toml::Value::Integer(_) => "integer",
        toml::Value::Float(_) => "float",
        toml::Value::Boolean(_) => "bool",
        toml::Value::Datetime(_) => "datetime",
        toml::Value::Array(_) => "array",
        toml::Value::Table(_) => "table",
    }
}
