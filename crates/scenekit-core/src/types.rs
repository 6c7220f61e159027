//! Spatial value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 3D vector as written in entity definitions (`{ x, y, z }`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Read a vector from either `{ x, y, z }` or `[x, y, z]`.
    /// Integer components are accepted.
    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::Table(t) => Some(Self {
                x: number(t.get("x")?)?,
                y: number(t.get("y")?)?,
                z: number(t.get("z")?)?,
            }),
            toml::Value::Array(arr) if arr.len() == 3 => Some(Self {
                x: number(&arr[0])?,
                y: number(&arr[1])?,
                z: number(&arr[2])?,
            }),
            _ => None,
        }
    }

    pub fn to_toml(&self) -> toml::Value {
        let mut table = toml::Table::new();
        table.insert("x".to_string(), toml::Value::Float(self.x));
        table.insert("y".to_string(), toml::Value::Float(self.y));
        table.insert("z".to_string(), toml::Value::Float(self.z));
        toml::Value::Table(table)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ x: {}, y: {}, z: {} }}", self.x, self.y, self.z)
    }
}

/// Entity scale: a single uniform factor or one factor per axis.
///
/// A definition uses exactly one of the two forms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Uniform(f64),
    Axes(Vec3),
}

impl Scale {
    /// Per-axis factors, expanding the uniform form
    pub fn to_vec3(&self) -> Vec3 {
        match self {
            Scale::Uniform(s) => Vec3::splat(*s),
            Scale::Axes(v) => *v,
        }
    }

    pub fn is_uniform(&self) -> bool {
        match self {
            Scale::Uniform(_) => true,
            Scale::Axes(v) => v.x == v.y && v.y == v.z,
        }
    }

    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        number(value)
            .map(Scale::Uniform)
            .or_else(|| Vec3::from_toml(value).map(Scale::Axes))
    }

    /// Short label of the form used, for error messages
    pub fn form_name(&self) -> &'static str {
        match self {
            Scale::Uniform(_) => "uniform number",
            Scale::Axes(_) => "per-axis vector",
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Uniform(1.0)
    }
}

fn number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Float(f) => Some(*f),
        toml::Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(src: &str) -> toml::Value {
        let doc: toml::Table = toml::from_str(&format!("v = {}", src)).unwrap();
        doc["v"].clone()
    }

    #[test]
    fn test_vec3_from_table_and_array() {
        let table = value("{ x = 1, y = 2.5, z = -3 }");
        assert_eq!(Vec3::from_toml(&table), Some(Vec3::new(1.0, 2.5, -3.0)));

        let arr = toml::Value::Array(vec![
            toml::Value::Integer(0),
            toml::Value::Float(1.0),
            toml::Value::Integer(2),
        ]);
        assert_eq!(Vec3::from_toml(&arr), Some(Vec3::new(0.0, 1.0, 2.0)));
    }

    #[test]
    fn test_vec3_rejects_partial() {
        let table = value("{ x = 1, y = 2 }");
        assert_eq!(Vec3::from_toml(&table), None);
        assert_eq!(Vec3::from_toml(&toml::Value::String("1,2,3".into())), None);
    }

    #[test]
    fn test_scale_forms() {
        let uniform = Scale::from_toml(&toml::Value::Integer(2)).unwrap();
        assert_eq!(uniform, Scale::Uniform(2.0));
        assert_eq!(uniform.to_vec3(), Vec3::splat(2.0));

        let axes = value("{ x = 1, y = 2, z = 1 }");
        let axes = Scale::from_toml(&axes).unwrap();
        assert!(!axes.is_uniform());
        assert_eq!(axes.form_name(), "per-axis vector");
    }

    #[test]
    fn test_vec3_to_toml_roundtrip() {
        let v = Vec3::new(0.5, 0.0, 9.0);
        assert_eq!(Vec3::from_toml(&v.to_toml()), Some(v));
    }
}
