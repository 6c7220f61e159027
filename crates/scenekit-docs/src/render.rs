//! Rendering entity kinds and records into documentation

use crate::block::{escape_html, DocBlock};
use crate::config::{DocsConfig, OutputFormat};
use log::debug;
use scenekit_core::Result;
use scenekit_schema::{EntityKind, EntityRecord, FieldSchema, SchemaRegistry};
use serde::Serialize;
use std::fmt::Write;
use std::slice;

/// Lazy sequence of blocks, one per field of a kind, in declaration order.
///
/// Cloning the iterator restarts from its current position; calling
/// [`render`] again restarts from the first field.
#[derive(Debug, Clone)]
pub struct FieldBlocks<'a> {
    fields: slice::Iter<'a, FieldSchema>,
}

impl Iterator for FieldBlocks<'_> {
    type Item = DocBlock;

    fn next(&mut self) -> Option<DocBlock> {
        self.fields.next().map(DocBlock::from_field)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.fields.size_hint()
    }
}

impl ExactSizeIterator for FieldBlocks<'_> {}

/// Lazy sequence of blocks for the fields present in a record
#[derive(Debug, Clone)]
pub struct RecordBlocks<'a> {
    fields: slice::Iter<'a, FieldSchema>,
    record: &'a EntityRecord,
}

impl Iterator for RecordBlocks<'_> {
    type Item = DocBlock;

    fn next(&mut self) -> Option<DocBlock> {
        for field in self.fields.by_ref() {
            if let Some(value) = self.record.get(&field.name) {
                return Some(DocBlock::from_field(field).with_value(value));
            }
        }
        None
    }
}

/// Blocks documenting every field of `kind`. Does not validate.
pub fn render(kind: &EntityKind) -> FieldBlocks<'_> {
    FieldBlocks {
        fields: kind.fields.iter(),
    }
}

/// Blocks documenting the values of a validated record
pub fn render_record<'a>(kind: &'a EntityKind, record: &'a EntityRecord) -> RecordBlocks<'a> {
    RecordBlocks {
        fields: kind.fields.iter(),
        record,
    }
}

#[derive(Serialize)]
struct KindPage<'a> {
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    fields: Vec<DocBlock>,
}

#[derive(Serialize)]
struct RegistryPage<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<String>,
    kinds: Vec<KindPage<'a>>,
}

/// One documentation group for a kind, in the configured format
pub fn render_page(kind: &EntityKind, config: &DocsConfig) -> Result<String> {
    debug!("Rendering {} page for '{}'", format_name(config.format), kind.name());
    write_group(kind, render(kind), config)
}

/// One documentation group for a validated record
pub fn render_record_page(
    kind: &EntityKind,
    record: &EntityRecord,
    config: &DocsConfig,
) -> Result<String> {
    write_group(kind, render_record(kind, record), config)
}

/// Every registered kind, one group each, in registry order
pub fn render_registry(registry: &SchemaRegistry, config: &DocsConfig) -> Result<String> {
    let schema = if config.show_fingerprint {
        Some(registry.fingerprint()?.to_prefixed_hex())
    } else {
        None
    };
    debug!(
        "Rendering {} kind(s) as {}",
        registry.len(),
        format_name(config.format)
    );

    match config.format {
        OutputFormat::Json => {
            let page = RegistryPage {
                title: &config.title,
                schema,
                kinds: registry
                    .kinds()
                    .map(|kind| kind_page(kind, render(kind)))
                    .collect(),
            };
            Ok(serde_json::to_string_pretty(&page)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "{}\n", config.title);
            for kind in registry.kinds() {
                out.push_str(&write_group(kind, render(kind), config)?);
                out.push('\n');
            }
            if let Some(schema) = schema {
                let _ = writeln!(out, "Schema: {}", schema);
            }
            Ok(out)
        }
        OutputFormat::Html => {
            let level = config.heading_level;
            let mut out = String::new();
            let _ = writeln!(out, "<h{l}>{}</h{l}>", escape_html(&config.title), l = level);
            for kind in registry.kinds() {
                out.push_str(&write_group(kind, render(kind), config)?);
            }
            if let Some(schema) = schema {
                let _ = writeln!(out, "<p class=\"schema\">Schema: <code>{}</code></p>", schema);
            }
            Ok(out)
        }
    }
}

fn kind_page<'a>(kind: &'a EntityKind, blocks: impl Iterator<Item = DocBlock>) -> KindPage<'a> {
    KindPage {
        kind: kind.name(),
        description: kind.description.as_deref(),
        fields: blocks.collect(),
    }
}

fn write_group(
    kind: &EntityKind,
    blocks: impl Iterator<Item = DocBlock>,
    config: &DocsConfig,
) -> Result<String> {
    let mut out = String::new();
    match config.format {
        OutputFormat::Text => {
            let _ = writeln!(out, "{}", kind.name());
            if config.include_descriptions {
                if let Some(desc) = &kind.description {
                    let _ = writeln!(out, "{}", desc);
                }
            }
            out.push_str("\nFields:\n");
            for block in blocks {
                out.push_str(&block.to_text(config.include_descriptions));
            }
        }
        OutputFormat::Html => {
            let level = config.heading_level + 1;
            let _ = writeln!(
                out,
                "<section class=\"entity-kind\" id=\"kind-{name}\">\n<h{l}>{name}</h{l}>",
                name = kind.name(),
                l = level
            );
            if config.include_descriptions {
                if let Some(desc) = &kind.description {
                    let _ = writeln!(out, "<p>{}</p>", escape_html(desc));
                }
            }
            out.push_str("<dl>\n");
            for block in blocks {
                out.push_str(&block.to_html(config.include_descriptions));
            }
            out.push_str("</dl>\n</section>\n");
        }
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(&kind_page(kind, blocks))?;
        }
    }
    Ok(out)
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "text",
        OutputFormat::Html => "html",
        OutputFormat::Json => "json",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::format_value;
    use scenekit_schema::{FieldValues, Validator, BASE_FIELD_NAMES};

    fn registry() -> SchemaRegistry {
        let _ = env_logger::builder().is_test(true).try_init();
        SchemaRegistry::builtin().unwrap()
    }

    fn values(src: &str) -> FieldValues {
        let table: toml::Table = toml::from_str(src).unwrap();
        FieldValues::from_table(&table)
    }

    #[test]
    fn test_render_one_block_per_field_in_order() {
        let registry = registry();
        let cylinder = registry.lookup("cylinder").unwrap();

        let blocks = render(cylinder);
        assert_eq!(blocks.len(), cylinder.fields.len());

        let names: Vec<_> = blocks.map(|b| b.field).collect();
        assert_eq!(names, cylinder.field_names());
        assert_eq!(&names[..BASE_FIELD_NAMES.len()], &BASE_FIELD_NAMES[..]);
    }

    #[test]
    fn test_render_is_restartable() {
        let registry = registry();
        let cone = registry.lookup("cone").unwrap();

        let mut blocks = render(cone);
        let first = blocks.next().unwrap();
        let rest: Vec<_> = blocks.clone().collect();
        assert_eq!(blocks.count(), rest.len());

        let again: Vec<_> = render(cone).collect();
        assert_eq!(again[0], first);
        assert_eq!(&again[1..], &rest[..]);
    }

    #[test]
    fn test_record_contains_each_supplied_value_once() {
        let registry = registry();
        let validator = Validator::new(&registry);
        let cases = [
            ("box", values("scale = 2\nposition = { x = 0, y = 0, z = 0 }\ncolor = \"#00ff00\"")),
            ("cylinder", values("radiusTop = 0\nradiusBottom = 1")),
            (
                "gltf-model",
                values(
                    "src = \"robot.glb\"\n\
                     skeletalAnimation = [{ clip = \"walk\", weight = 0.5 }]",
                ),
            ),
        ];

        for (kind_name, input) in cases {
            let kind = registry.lookup(kind_name).unwrap();
            let record = validator.validate(kind_name, &input).unwrap();
            let blocks: Vec<_> = render_record(kind, &record).collect();
            let text = render_record_page(kind, &record, &DocsConfig::default()).unwrap();

            for (name, _) in input.iter() {
                let matching: Vec<_> = blocks.iter().filter(|b| b.field == name).collect();
                assert_eq!(matching.len(), 1, "{}.{}", kind_name, name);

                let expected = format_value(record.get(name).unwrap());
                assert_eq!(matching[0].value.as_deref(), Some(expected.as_str()));

                let required = if matching[0].required { " (required)" } else { "" };
                let line = format!(
                    "  {} : {}{} = {}\n",
                    name, matching[0].type_label, required, expected
                );
                assert_eq!(text.matches(&line).count(), 1, "{}", line);
            }
        }
    }

    #[test]
    fn test_record_skips_absent_fields() {
        let registry = registry();
        let kind = registry.lookup("obj-model").unwrap();
        let record = Validator::new(&registry)
            .validate("obj-model", &values("src = \"chair.obj\""))
            .unwrap();

        let names: Vec<_> = render_record(kind, &record).map(|b| b.field).collect();
        assert!(names.contains(&"src".to_string()));
        assert!(!names.contains(&"id".to_string()));
        assert!(!names.contains(&"transition".to_string()));
    }

    #[test]
    fn test_html_page() {
        let registry = registry();
        let kind = registry.lookup("gltf-model").unwrap();
        let config = DocsConfig::default().with_format(OutputFormat::Html);

        let html = render_page(kind, &config).unwrap();
        assert!(html.starts_with("<section class=\"entity-kind\" id=\"kind-gltf-model\">"));
        assert!(html.contains("<h3>gltf-model</h3>"));
        assert!(html.contains("<code>skeletalAnimation</code>"));
        assert!(html.contains("<code>weight</code>"));
        assert!(html.trim_end().ends_with("</section>"));
    }

    #[test]
    fn test_json_page() {
        let registry = registry();
        let kind = registry.lookup("sphere").unwrap();
        let config = DocsConfig::default().with_format(OutputFormat::Json);

        let json: serde_json::Value =
            serde_json::from_str(&render_page(kind, &config).unwrap()).unwrap();
        assert_eq!(json["kind"], "sphere");
        assert_eq!(json["fields"][0]["field"], "position");
        assert_eq!(json["fields"][2]["type"], "number|vec3");
    }

    #[test]
    fn test_registry_one_group_per_kind() {
        let registry = registry();

        let text = render_registry(&registry, &DocsConfig::default()).unwrap();
        assert!(text.starts_with("Entity reference\n"));
        assert!(text.contains("Schema: sha256:"));
        assert_eq!(text.matches("\nFields:\n").count(), registry.len());

        let html = render_registry(
            &registry,
            &DocsConfig::default().with_format(OutputFormat::Html),
        )
        .unwrap();
        assert_eq!(html.matches("<section class=\"entity-kind\"").count(), 7);

        let mut config = DocsConfig::default().with_format(OutputFormat::Json);
        config.show_fingerprint = false;
        let json: serde_json::Value =
            serde_json::from_str(&render_registry(&registry, &config).unwrap()).unwrap();
        assert_eq!(json["kinds"].as_array().unwrap().len(), 7);
        assert!(json.get("schema").is_none());
    }

    #[test]
    fn test_registry_heading_levels() {
        let registry = registry();
        let mut config = DocsConfig::default().with_format(OutputFormat::Html);
        config.heading_level = 1;

        let html = render_registry(&registry, &config).unwrap();
        assert!(html.starts_with("<h1>Entity reference</h1>\n"));
        assert!(html.contains("<h2>box</h2>"));
        assert_eq!(html.matches("<h1>").count(), 1);
        assert_eq!(html.matches("<h2>").count(), registry.len());
    }
}
