//! Error types for SceneKit

use thiserror::Error;

/// The main error type for SceneKit operations
///
/// Validation variants carry the entity kind, the field path
/// (`skeletalAnimation[1].weight`, `transition.position.delay`) and the
/// received value so the caller can correct the input.
#[derive(Debug, Error)]
pub enum SceneKitError {
    #[error("Duplicate entity kind: {0}")]
    DuplicateKind(String),

    #[error("Unknown entity kind: {0}")]
    UnknownKind(String),

    #[error("Unknown field on {kind}: {field}")]
    UnknownField { kind: String, field: String },

    #[error("Duplicate field on {kind}: {field}")]
    DuplicateField { kind: String, field: String },

    #[error("Invalid field type on {kind}.{field}: expected {expected}, got {got} ({value})")]
    TypeMismatch {
        kind: String,
        field: String,
        expected: String,
        got: String,
        value: String,
    },

    #[error("Conflicting scale on {kind}: scale given as both {first} and {second}")]
    ConflictingScale {
        kind: String,
        first: String,
        second: String,
    },

    #[error("Value out of range on {kind}.{field}: must be between {min} and {max}, got {value}")]
    OutOfRange {
        kind: String,
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Missing required field on {kind}: {field}")]
    MissingRequiredField { kind: String, field: String },

    #[error("Invalid enum value on {kind}.{field}: {value} is not one of {allowed:?}")]
    InvalidEnumValue {
        kind: String,
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Entity kind {kind} does not declare base field {field}")]
    MissingBaseField { kind: String, field: String },

    #[error("Schema definition error: {0}")]
    SchemaDefinition(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Result type alias for SceneKit operations
pub type Result<T> = std::result::Result<T, SceneKitError>;

impl From<toml::de::Error> for SceneKitError {
    fn from(err: toml::de::Error) -> Self {
        SceneKitError::TomlParseError(err.to_string())
    }
}

impl From<serde_json::Error> for SceneKitError {
    fn from(err: serde_json::Error) -> Self {
        SceneKitError::JsonError(err.to_string())
    }
}

impl SceneKitError {
    /// Whether this error rejects a single entity definition (as opposed to
    /// a broken schema or an I/O failure)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SceneKitError::UnknownField { .. }
                | SceneKitError::DuplicateField { .. }
                | SceneKitError::TypeMismatch { .. }
                | SceneKitError::ConflictingScale { .. }
                | SceneKitError::OutOfRange { .. }
                | SceneKitError::MissingRequiredField { .. }
                | SceneKitError::InvalidEnumValue { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = SceneKitError::OutOfRange {
            kind: "gltf-model".to_string(),
            field: "skeletalAnimation[0].weight".to_string(),
            min: 0.0,
            max: 1.0,
            value: 1.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("gltf-model.skeletalAnimation[0].weight"));
        assert!(msg.contains("1.5"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("a = ");
        let err: SceneKitError = parse.unwrap_err().into();
        assert!(matches!(err, SceneKitError::TomlParseError(_)));
        assert!(!err.is_validation());
    }
}
