//! Schema registry for loading and managing entity kinds

use crate::base::{BaseSchema, BASE_FIELD_NAMES};
use crate::field::FieldSchema;
use crate::kind::{EntityKind, KindSchemaFile, KindTag};
use crate::validation::normalize_default;
use log::{debug, info};
use scenekit_core::{ContentHash, ContentHasher, Result, SceneKitError};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Kind definitions bundled with the crate
const BUNDLED_KINDS: [&str; 7] = [
    include_str!("../schemas/kinds/box.toml"),
    include_str!("../schemas/kinds/sphere.toml"),
    include_str!("../schemas/kinds/plane.toml"),
    include_str!("../schemas/kinds/cylinder.toml"),
    include_str!("../schemas/kinds/cone.toml"),
    include_str!("../schemas/kinds/gltf-model.toml"),
    include_str!("../schemas/kinds/obj-model.toml"),
];

/// Registry that holds all entity kinds.
///
/// Populated once, then read-only; it can be shared across threads
/// without locking.
#[derive(Debug)]
pub struct SchemaRegistry {
    base: BaseSchema,
    kinds: BTreeMap<KindTag, EntityKind>,
}

impl SchemaRegistry {
    /// Create an empty registry whose kinds inherit `base`
    pub fn new(base: BaseSchema) -> Self {
        Self {
            base,
            kinds: BTreeMap::new(),
        }
    }

    /// Registry holding every builtin kind
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new(BaseSchema::bundled()?);
        for content in BUNDLED_KINDS {
            registry.load_kind_string(content)?;
        }
        info!(
            "Loaded {} builtin entity kinds (schema {})",
            registry.len(),
            registry.fingerprint()?
        );
        Ok(registry)
    }

    /// Load schemas from a directory structure
    ///
    /// Expects:
    /// - `path/base.toml` for base fields and groups (optional, the bundled
    ///   base is used when absent)
    /// - `path/kinds/*.toml` for entity kinds
    pub fn load_from_directory<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let base_path = path.join("base.toml");
        let base = if base_path.exists() {
            BaseSchema::load_file(&base_path)?
        } else {
            BaseSchema::bundled()?
        };

        let mut registry = Self::new(base);
        registry.load_directory(path)?;
        Ok(registry)
    }

    /// Load the kinds under `path/kinds` into this registry
    pub fn load_directory<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let kinds_path = path.as_ref().join("kinds");
        if !kinds_path.exists() {
            debug!("No kinds directory at {}", kinds_path.display());
            return Ok(());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&kinds_path)? {
            let file_path = entry?.path();
            if file_path.extension().map(|e| e == "toml").unwrap_or(false) {
                files.push(file_path);
            }
        }
        files.sort();

        for file_path in files {
            self.load_kind_file(&file_path)?;
        }
        Ok(())
    }

    /// Load entity kinds from a TOML file
    pub fn load_kind_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("Loading kind file {}", path.display());
        let content = fs::read_to_string(path)?;
        self.load_kind_string(&content)
    }

    /// Load entity kinds from a TOML string
    pub fn load_kind_string(&mut self, content: &str) -> Result<()> {
        let file: KindSchemaFile = toml::from_str(content)?;

        let mut definitions: Vec<_> = file.kind.into_iter().collect();
        definitions.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, def) in definitions {
            let tag: KindTag = name.parse()?;
            let (description, includes, own) = def.own_fields()?;

            let mut fields = self.base.fields.clone();
            for group in &includes {
                let group_fields = self.base.group(group).ok_or_else(|| {
                    SceneKitError::SchemaDefinition(format!(
                        "kind '{}' includes unknown group '{}'",
                        name, group
                    ))
                })?;
                fields.extend(group_fields.iter().cloned());
            }
            fields.extend(own);

            let mut kind = EntityKind::new(tag, fields);
            kind.description = description;
            self.register(kind)?;
        }

        Ok(())
    }

    /// Register an entity kind.
    ///
    /// Fails if the kind is already registered, if it does not declare every
    /// base field, if a field name repeats, or if a default does not match
    /// its field's type.
    pub fn register(&mut self, mut kind: EntityKind) -> Result<()> {
        if self.kinds.contains_key(&kind.tag) {
            return Err(SceneKitError::DuplicateKind(kind.name().to_string()));
        }

        for name in BASE_FIELD_NAMES {
            let declared = kind.field(name);
            let expected = self.base.field(name);
            let matches = match (declared, expected) {
                (Some(d), Some(e)) => d.field_type == e.field_type,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if !matches {
                return Err(SceneKitError::MissingBaseField {
                    kind: kind.name().to_string(),
                    field: name.to_string(),
                });
            }
        }

        for (i, field) in kind.fields.iter().enumerate() {
            if kind.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SceneKitError::SchemaDefinition(format!(
                    "kind '{}' declares field '{}' twice",
                    kind.name(),
                    field.name
                )));
            }
        }

        let mut defaults = Vec::with_capacity(kind.fields.len());
        for field in &kind.fields {
            let default = normalize_default(&kind, field).map_err(|e| {
                SceneKitError::SchemaDefinition(format!(
                    "default for {}.{} is invalid: {}",
                    kind.name(),
                    field.name,
                    e
                ))
            })?;
            defaults.push(default);
        }
        for (field, default) in kind.fields.iter_mut().zip(defaults) {
            field.default = default;
        }

        debug!(
            "Registered kind '{}' with {} field(s)",
            kind.name(),
            kind.fields.len()
        );
        self.kinds.insert(kind.tag, kind);
        Ok(())
    }

    /// Get an entity kind by name
    pub fn lookup(&self, name: &str) -> Result<&EntityKind> {
        let tag: KindTag = name.parse()?;
        self.get(tag)
            .ok_or_else(|| SceneKitError::UnknownKind(name.to_string()))
    }

    pub fn get(&self, tag: KindTag) -> Option<&EntityKind> {
        self.kinds.get(&tag)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// All registered kinds, in `KindTag` order
    pub fn kinds(&self) -> impl Iterator<Item = &EntityKind> {
        self.kinds.values()
    }

    /// List all kind names
    pub fn kind_names(&self) -> Vec<&'static str> {
        self.kinds.keys().map(|t| t.as_str()).collect()
    }

    pub fn base(&self) -> &BaseSchema {
        &self.base
    }

    pub fn base_fields(&self) -> &[FieldSchema] {
        &self.base.fields
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Content hash over the canonical form of every registered kind.
    ///
    /// Identical definitions produce identical fingerprints regardless of
    /// the order they were loaded in.
    pub fn fingerprint(&self) -> Result<ContentHash> {
        let mut hasher = ContentHasher::new();
        for kind in self.kinds.values() {
            hasher.update_str(&serde_json::to_string(kind)?);
        }
        Ok(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    fn builtin() -> SchemaRegistry {
        let _ = env_logger::builder().is_test(true).try_init();
        SchemaRegistry::builtin().unwrap()
    }

    fn temp_dir(label: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "scenekit_registry_{}_{}",
            label,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("kinds")).unwrap();
        dir
    }

    #[test]
    fn test_builtin_holds_closed_kind_set() {
        let registry = builtin();
        assert_eq!(
            registry.kind_names(),
            vec!["box", "sphere", "plane", "cylinder", "cone", "gltf-model", "obj-model"]
        );
        for tag in KindTag::ALL {
            assert!(registry.get(tag).is_some());
        }
    }

    #[test]
    fn test_every_kind_declares_base_fields() {
        let registry = builtin();
        for kind in registry.kinds() {
            for base in registry.base_fields() {
                let declared = kind
                    .field(&base.name)
                    .unwrap_or_else(|| panic!("{} lacks {}", kind.name(), base.name));
                assert_eq!(declared.field_type, base.field_type);
            }
        }
    }

    #[test]
    fn test_base_fields_come_first() {
        let registry = builtin();
        let cone = registry.lookup("cone").unwrap();
        let names = cone.field_names();
        assert_eq!(&names[..BASE_FIELD_NAMES.len()], &BASE_FIELD_NAMES[..]);
        assert!(names.contains(&"radiusTop"));
        assert!(names.contains(&"withCollisions"));
    }

    #[test]
    fn test_lookup_unknown_kind() {
        let registry = builtin();
        assert!(matches!(
            registry.lookup("tetrahedron"),
            Err(SceneKitError::UnknownKind(name)) if name == "tetrahedron"
        ));
        assert!(!registry.contains("tetrahedron"));
    }

    #[test]
    fn test_lookup_known_but_unregistered() {
        let registry = SchemaRegistry::new(BaseSchema::bundled().unwrap());
        assert!(registry.is_empty());
        assert!(matches!(
            registry.lookup("box"),
            Err(SceneKitError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_register_duplicate_kind() {
        let mut registry = builtin();
        let sphere = registry.lookup("sphere").unwrap().clone();
        assert!(matches!(
            registry.register(sphere),
            Err(SceneKitError::DuplicateKind(name)) if name == "sphere"
        ));
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_register_without_base_fields() {
        let mut registry = SchemaRegistry::new(BaseSchema::bundled().unwrap());
        let kind = EntityKind::new(
            KindTag::ObjModel,
            vec![FieldSchema::new("src", FieldType::String).required()],
        );
        assert!(matches!(
            registry.register(kind),
            Err(SceneKitError::MissingBaseField { field, .. }) if field == "position"
        ));
    }

    #[test]
    fn test_register_rejects_bad_default() {
        let mut registry = SchemaRegistry::new(BaseSchema::bundled().unwrap());
        let mut fields = registry.base_fields().to_vec();
        fields.push(
            FieldSchema::new("src", FieldType::String).with_default(toml::Value::Integer(3)),
        );
        let err = registry
            .register(EntityKind::new(KindTag::ObjModel, fields))
            .unwrap_err();
        assert!(matches!(err, SceneKitError::SchemaDefinition(_)));
    }

    #[test]
    fn test_load_kind_string_rejects_unknown_kind_name() {
        let mut registry = SchemaRegistry::new(BaseSchema::bundled().unwrap());
        let err = registry
            .load_kind_string(
                r#"
[kind.tetrahedron]
description = "Four triangular faces"
"#,
            )
            .unwrap_err();
        assert!(matches!(err, SceneKitError::UnknownKind(_)));
    }

    #[test]
    fn test_load_kind_string_unknown_group() {
        let mut registry = SchemaRegistry::new(BaseSchema::bundled().unwrap());
        let err = registry
            .load_kind_string(
                r#"
[kind.box]
includes = ["metallic"]
"#,
            )
            .unwrap_err();
        assert!(err.to_string().contains("metallic"));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = temp_dir("load");
        fs::write(
            dir.join("kinds").join("obj-model.toml"),
            r#"
[kind.obj-model]
description = "Custom OBJ docs"

[[kind.obj-model.fields]]
name = "src"
type = "string"
required = true
"#,
        )
        .unwrap();
        fs::write(dir.join("kinds").join("notes.txt"), "ignored").unwrap();

        let registry = SchemaRegistry::load_from_directory(&dir).unwrap();
        assert_eq!(registry.kind_names(), vec!["obj-model"]);
        let obj = registry.lookup("obj-model").unwrap();
        assert_eq!(obj.description.as_deref(), Some("Custom OBJ docs"));
        assert!(obj.has_field("transition"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = builtin().fingerprint().unwrap();
        let b = builtin().fingerprint().unwrap();
        assert_eq!(a, b);

        let mut partial = SchemaRegistry::new(BaseSchema::bundled().unwrap());
        partial.load_kind_string(BUNDLED_KINDS[0]).unwrap();
        assert_ne!(partial.fingerprint().unwrap(), a);
    }

    #[test]
    fn test_defaults_are_normalized() {
        let registry = builtin();
        let position = registry.lookup("box").unwrap().field("position").unwrap();
        assert!(matches!(
            position.default.as_ref().and_then(|v| v.get("x")),
            Some(toml::Value::Float(_))
        ));
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaRegistry>();

        let registry = std::sync::Arc::new(builtin());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.lookup("cone").unwrap().fields.len())
            })
            .collect();
        let counts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(counts.windows(2).all(|w| w[0] == w[1]));
    }
}
