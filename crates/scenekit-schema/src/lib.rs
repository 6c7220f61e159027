//! SceneKit Schema - Entity kind registry and validation
//!
//! This crate holds the closed set of entity kinds (box, sphere, plane,
//! cylinder, cone, gltf-model, obj-model), their base and kind-specific
//! fields, and validates entity definitions against them.

mod base;
mod field;
mod kind;
mod record;
mod registry;
mod validation;

pub use base::{transition_spec_fields, BaseSchema, BASE_FIELD_NAMES, TIMING_CURVES};
pub use field::{FieldSchema, FieldType};
pub use kind::{EntityKind, KindTag};
pub use record::{EntityRecord, FieldValues};
pub use registry::SchemaRegistry;
pub use validation::{validate_entity, Validator};
